use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use shared::{io, CurationBatch, CurationError, Config};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "curate-stories")]
#[command(about = "Select the best distinct crime stories from collected raw items")]
struct Args {
    /// JSON file with the raw stories from the source collector
    #[arg(short, long)]
    input: PathBuf,

    /// Maximum number of stories to select (defaults to CRIME_SHORTS_MAX_STORIES or 4)
    #[arg(short, long)]
    limit: Option<usize>,

    /// Where to write the curated batch (defaults to the data directory)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Exit status used when no story survived curation
const EXIT_NO_VIABLE_ITEMS: u8 = 2;

fn main() -> Result<ExitCode> {
    shared::logging::init_tracing();

    let args = Args::parse();
    let config = Config::from_env()?;
    let limit = args.limit.unwrap_or(config.max_stories);

    println!("📥 Reading raw stories from {}...", args.input.display());
    let raw = io::load_raw_stories(&args.input)?;
    println!("✓ Loaded {} raw stories", raw.len());

    println!("\n🔎 Curating stories (limit {})...", limit);
    let (stories, report) = match shared::curate_with_report(&raw, limit) {
        Ok(result) => result,
        Err(CurationError::NoViableItems { received }) => {
            println!(
                "⚠ None of the {} stories passed validation and deduplication.",
                received
            );
            return Ok(ExitCode::from(EXIT_NO_VIABLE_ITEMS));
        }
        Err(e) => return Err(e).context("Curation failed"),
    };

    println!(
        "✓ Rejected {} (too short: {}, no Hindi text: {}, not crime related: {})",
        report.rejected(),
        report.too_short,
        report.missing_script,
        report.not_crime_related
    );
    println!("✓ Removed {} near-duplicates", report.duplicates);
    println!("✓ Selected {} stories\n", report.selected);

    for story in &stories {
        println!(
            "  {}. [{}] {} (score {})",
            story.sequence_id, story.category, story.headline, story.score
        );
    }

    let now = Utc::now();
    let output = match args.output {
        Some(path) => path,
        None => io::batches_dir(&config.data_dir)?.join(io::batch_filename(now)),
    };

    let batch = CurationBatch::new(stories);
    io::save_batch(&batch, &output).context("Failed to save curated batch")?;

    println!("\n✅ Curated batch saved to: {}", output.display());

    Ok(ExitCode::SUCCESS)
}
