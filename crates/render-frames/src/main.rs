use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use shared::{
    io, render, Background, Config, CuratedStory, FontSet, FrameManifest, RenderDegradation,
};
use std::fs;
use std::io::{self as stdio, Write as _};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "render-frames")]
#[command(about = "Render curated crime stories into 1080x1920 frames for YouTube Shorts")]
struct Args {
    /// Curated batch file (if not provided, will list available batches)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Directory that relative image references are resolved against
    #[arg(short, long)]
    images_dir: Option<PathBuf>,

    /// Where to write frames and the manifest (defaults to the data directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    shared::logging::init_tracing();

    let args = Args::parse();
    let config = Config::from_env()?;

    let batch_file = match args.file {
        Some(path) => path,
        None => select_batch_file(&io::batches_dir(&config.data_dir)?)?,
    };

    println!("📖 Reading curated batch: {}", batch_file.display());
    let batch = io::load_batch(&batch_file)?;
    println!("✓ {} stories to render", batch.stories.len());

    let fonts = FontSet::load(config.headline_font.as_deref(), config.body_font.as_deref());
    for substitution in &fonts.substitutions {
        println!(
            "⚠ Font {} unavailable, using {}",
            substitution
                .requested
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(system default)".to_string()),
            substitution.substitute
        );
    }

    let output_dir = match args.output_dir {
        Some(dir) => {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            dir
        }
        None => io::frames_dir(&config.data_dir)?,
    };

    println!("\n🎨 Rendering frames...");
    let now = Utc::now();
    let mut manifest = FrameManifest::new(now);

    for story in &batch.stories {
        let background = load_background(story, args.images_dir.as_deref());

        let frame = match &background {
            Ok(Some(bytes)) => render(story, Some(Background::Encoded(bytes)), &fonts),
            Ok(None) => render(story, None, &fonts),
            Err(reason) => {
                tracing::warn!(sequence_id = story.sequence_id, "{}", reason);
                let mut frame = render(story, None, &fonts);
                frame
                    .degradations
                    .push(RenderDegradation::BackgroundUnavailable {
                        reason: reason.clone(),
                    });
                frame
            }
        };

        match io::save_frame(&frame, &output_dir, now) {
            Ok(path) => {
                let marker = if frame.is_degraded() { "⚠" } else { "✓" };
                println!("  {} {}. {}", marker, story.sequence_id, path.display());
                manifest.push(&frame, path);
            }
            Err(e) => println!("  ✗ {}. {:#}", story.sequence_id, e),
        }
    }

    if manifest.is_empty() {
        anyhow::bail!("No frames could be rendered from {}", batch_file.display());
    }

    let manifest_path = manifest.save(&output_dir)?;

    println!(
        "\n✅ Rendered {}/{} frames ({} degraded)",
        manifest.total_frames,
        batch.stories.len(),
        manifest.degraded_count()
    );
    println!("   Manifest: {}", manifest_path.display());

    Ok(())
}

/// Read the story's background image, if it has one.
///
/// Only local files can be used; fetching remote images is the collector's job.
fn load_background(story: &CuratedStory, images_dir: Option<&Path>) -> Result<Option<Vec<u8>>, String> {
    let Some(image_ref) = story.image_ref.as_deref() else {
        return Ok(None);
    };

    if image_ref.starts_with("http://") || image_ref.starts_with("https://") {
        return Err(format!("remote image {} was not downloaded", image_ref));
    }

    let path = match images_dir {
        Some(dir) if Path::new(image_ref).is_relative() => dir.join(image_ref),
        _ => PathBuf::from(image_ref),
    };

    fs::read(&path)
        .map(Some)
        .map_err(|e| format!("could not read background {}: {}", path.display(), e))
}

fn select_batch_file(dir: &Path) -> Result<PathBuf> {
    let files = io::list_batch_files(dir)?;

    if files.is_empty() {
        anyhow::bail!(
            "No curated batches found in {}. Run curate-stories first.",
            dir.display()
        );
    }

    println!("Available batches:\n");
    for (i, (path, batch)) in files.iter().enumerate() {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        println!(
            "  {}) {} ({} stories, created {})",
            i + 1,
            filename,
            batch.stories.len(),
            batch.created_at
        );
    }

    print!("\nSelect batch (1-{}): ", files.len());
    stdio::stdout().flush()?;

    let mut input = String::new();
    stdio::stdin().read_line(&mut input)?;

    let selection: usize = input
        .trim()
        .parse()
        .context("Invalid selection. Please enter a number.")?;

    if selection < 1 || selection > files.len() {
        anyhow::bail!("Selection out of range. Please choose 1-{}", files.len());
    }

    Ok(files[selection - 1].0.clone())
}
