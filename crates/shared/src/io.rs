use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

use crate::composer::RenderedFrame;
use crate::models::{CurationBatch, RawStory};

const APP_DIR: &str = "crime-shorts";

/// Get the default data directory, creating it if needed
pub fn get_default_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .context("Could not determine local data directory")?
        .join(APP_DIR);

    fs::create_dir_all(&data_dir).context("Failed to create data directory")?;

    Ok(data_dir)
}

/// Directory for curated batch files under `base`
pub fn batches_dir(base: &Path) -> Result<PathBuf> {
    let dir = base.join("batches");
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create batch directory: {}", dir.display()))?;
    Ok(dir)
}

/// Directory for rendered frames under `base`
pub fn frames_dir(base: &Path) -> Result<PathBuf> {
    let dir = base.join("frames");
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create frames directory: {}", dir.display()))?;
    Ok(dir)
}

/// Load the raw stories handed over by the source collector
pub fn load_raw_stories(filepath: &Path) -> Result<Vec<RawStory>> {
    let content = fs::read_to_string(filepath)
        .with_context(|| format!("Failed to read raw story file: {}", filepath.display()))?;

    let stories: Vec<RawStory> = serde_json::from_str(&content).with_context(|| {
        format!(
            "Failed to parse raw stories from {}. Expected a JSON array of stories.",
            filepath.display()
        )
    })?;

    Ok(stories)
}

pub fn batch_filename(created: DateTime<Utc>) -> String {
    format!("curated_stories_{}.json", created.format("%Y%m%d_%H%M%S"))
}

/// Save a curated batch as pretty JSON
pub fn save_batch(batch: &CurationBatch, filepath: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(batch).context("Failed to serialize curated batch")?;

    fs::write(filepath, json)
        .with_context(|| format!("Failed to write batch file: {}", filepath.display()))?;

    Ok(())
}

/// Load a curated batch from a JSON file
pub fn load_batch(filepath: &Path) -> Result<CurationBatch> {
    if !filepath.exists() {
        anyhow::bail!("Batch file not found: {}", filepath.display());
    }

    let content = fs::read_to_string(filepath)
        .with_context(|| format!("Failed to read batch file: {}", filepath.display()))?;

    let batch: CurationBatch = serde_json::from_str(&content).with_context(|| {
        format!(
            "Failed to parse batch JSON from {}. The file may be corrupted or not a curated batch.",
            filepath.display()
        )
    })?;

    if batch.version != CurationBatch::VERSION {
        anyhow::bail!(
            "Unsupported batch file version: {}. Expected {}. Please regenerate it with curate-stories.",
            batch.version,
            CurationBatch::VERSION
        );
    }

    if batch.stories.is_empty() {
        anyhow::bail!(
            "Batch file {} contains no stories. The file may be incomplete.",
            filepath.display()
        );
    }

    Ok(batch)
}

/// List curated batches in `dir`, newest first
pub fn list_batch_files(dir: &Path) -> Result<Vec<(PathBuf, CurationBatch)>> {
    let mut files = Vec::new();

    if dir.exists() {
        for entry in fs::read_dir(dir).context("Failed to read batch directory")? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                match load_batch(&path) {
                    Ok(batch) => files.push((path, batch)),
                    Err(e) => {
                        tracing::warn!("Could not load {}: {:#}", path.display(), e);
                    }
                }
            }
        }
    }

    files.sort_by(|a, b| {
        let time_a = DateTime::parse_from_rfc3339(&a.1.created_at).ok();
        let time_b = DateTime::parse_from_rfc3339(&b.1.created_at).ok();
        time_b.cmp(&time_a)
    });

    Ok(files)
}

pub fn frame_filename(rendered: DateTime<Utc>, sequence_id: u32) -> String {
    format!(
        "crime_story_{}_{}.png",
        rendered.format("%Y%m%d_%H%M%S"),
        sequence_id
    )
}

/// Write a rendered frame as PNG into `dir`
pub fn save_frame(frame: &RenderedFrame, dir: &Path, rendered: DateTime<Utc>) -> Result<PathBuf> {
    let filepath = dir.join(frame_filename(rendered, frame.story.sequence_id));

    frame
        .image
        .save(&filepath)
        .with_context(|| format!("Failed to write frame: {}", filepath.display()))?;

    Ok(filepath)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Category;
    use crate::models::CuratedStory;
    use crate::scorer::score;
    use chrono::TimeZone;

    fn curated(sequence_id: u32) -> CuratedStory {
        let headline = "मेरठ में चोरी का खुलासा";
        let summary = "पुलिस ने दो आरोपियों को गिरफ्तार किया है और चोरी का सामान बरामद कर लिया गया है।";
        CuratedStory {
            sequence_id,
            headline: headline.to_string(),
            summary: summary.to_string(),
            category: Category::Theft,
            source_id: "aajtak".to_string(),
            image_ref: Some("story_1.jpg".to_string()),
            captured_at: Utc.with_ymd_and_hms(2025, 11, 12, 6, 30, 0).unwrap(),
            score: score(headline, summary, true, Category::Theft),
        }
    }

    #[test]
    fn test_batch_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.json");
        let batch = CurationBatch::new(vec![curated(1), curated(2)]);

        save_batch(&batch, &path).unwrap();
        let loaded = load_batch(&path).unwrap();

        assert_eq!(loaded.version, "1.0");
        assert_eq!(loaded.stories, batch.stories);
    }

    #[test]
    fn test_batch_json_uses_snake_case_category() {
        let json = serde_json::to_string(&CurationBatch::new(vec![curated(1)])).unwrap();
        assert!(json.contains("\"category\":\"theft\""));
        assert!(json.contains("\"score\":100"));
    }

    #[test]
    fn test_load_missing_batch_fails() {
        let err = load_batch(Path::new("/nonexistent/batch.json")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_rejects_wrong_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.json");
        let mut batch = CurationBatch::new(vec![curated(1)]);
        batch.version = "0.9".to_string();
        save_batch(&batch, &path).unwrap();

        let err = load_batch(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported batch file version"));
    }

    #[test]
    fn test_load_rejects_empty_batch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        save_batch(&CurationBatch::new(Vec::new()), &path).unwrap();

        assert!(load_batch(&path).is_err());
    }

    #[test]
    fn test_list_batches_newest_first() {
        let dir = tempfile::tempdir().unwrap();

        let mut older = CurationBatch::new(vec![curated(1)]);
        older.created_at = "2025-11-10T06:00:00+00:00".to_string();
        let mut newer = CurationBatch::new(vec![curated(1)]);
        newer.created_at = "2025-11-12T06:00:00+00:00".to_string();

        save_batch(&older, &dir.path().join("a.json")).unwrap();
        save_batch(&newer, &dir.path().join("b.json")).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::write(dir.path().join("broken.json"), "{").unwrap();

        let files = list_batch_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].0.ends_with("b.json"));
    }

    #[test]
    fn test_load_raw_stories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.json");
        fs::write(
            &path,
            r#"[
                {
                    "headline": "नोएडा में फ्रॉड गैंग का ऐसे हुआ पर्दाफाश",
                    "summary": "ठगी करने वाले गिरोह का भंडाफोड़।",
                    "image_ref": "https://example.com/image1.jpg",
                    "source_id": "aajtak",
                    "captured_at": "2025-11-12T06:30:00Z"
                },
                {
                    "headline": "पुलिस ने दो को पकड़ा",
                    "source_id": "amarujala",
                    "captured_at": "2025-11-12T06:31:00Z"
                }
            ]"#,
        )
        .unwrap();

        let stories = load_raw_stories(&path).unwrap();
        assert_eq!(stories.len(), 2);
        assert_eq!(stories[0].image_ref.as_deref(), Some("https://example.com/image1.jpg"));
        assert_eq!(stories[1].summary, "");
        assert_eq!(stories[1].image_ref, None);
    }

    #[test]
    fn test_save_frame_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let frame = crate::composer::render(&curated(3), None, &crate::fonts::FontSet::builtin());
        let date = Utc.with_ymd_and_hms(2025, 11, 12, 6, 30, 0).unwrap();

        let path = save_frame(&frame, dir.path(), date).unwrap();

        assert!(path.ends_with("crime_story_20251112_063000_3.png"));
        let reloaded = image::open(&path).unwrap();
        assert_eq!(reloaded.width(), 1080);
        assert_eq!(reloaded.height(), 1920);
    }

    #[test]
    fn test_same_day_renders_do_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let frame = crate::composer::render(&curated(1), None, &crate::fonts::FontSet::builtin());
        let morning = Utc.with_ymd_and_hms(2025, 11, 12, 6, 0, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2025, 11, 12, 18, 0, 0).unwrap();

        let first = save_frame(&frame, dir.path(), morning).unwrap();
        let second = save_frame(&frame, dir.path(), evening).unwrap();

        assert_ne!(first, second);
        assert!(first.exists());
        assert!(second.exists());
    }

    #[test]
    fn test_batch_filename() {
        let date = Utc.with_ymd_and_hms(2025, 11, 12, 6, 5, 9).unwrap();
        assert_eq!(batch_filename(date), "curated_stories_20251112_060509.json");
    }
}
