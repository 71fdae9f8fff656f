use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::classifier::Category;
use crate::composer::RenderedFrame;
use crate::normalizer::char_len;

/// One rendered frame as recorded for the video encoder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub sequence_id: u32,
    pub headline: String,
    pub category: Category,
    pub source: String,
    pub summary_length: usize,
    pub has_image: bool,
    pub frame_path: PathBuf,
    pub degraded: bool,
}

/// Metadata about every frame produced in one run
#[derive(Debug, Serialize, Deserialize)]
pub struct FrameManifest {
    pub created_at: String,
    pub total_frames: usize,
    pub entries: Vec<ManifestEntry>,
}

impl FrameManifest {
    pub fn new(created: DateTime<Utc>) -> Self {
        Self {
            created_at: created.to_rfc3339(),
            total_frames: 0,
            entries: Vec::new(),
        }
    }

    /// Record `frame` as written to `frame_path`
    pub fn push(&mut self, frame: &RenderedFrame, frame_path: PathBuf) {
        let story = &frame.story;
        self.entries.push(ManifestEntry {
            sequence_id: story.sequence_id,
            headline: story.headline.clone(),
            category: story.category,
            source: story.source_id.clone(),
            summary_length: char_len(&story.summary),
            has_image: story.image_ref.is_some(),
            frame_path,
            degraded: frame.is_degraded(),
        });
        self.total_frames = self.entries.len();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn degraded_count(&self) -> usize {
        self.entries.iter().filter(|e| e.degraded).count()
    }

    pub fn filename(created: DateTime<Utc>) -> String {
        format!("frames_metadata_{}.json", created.format("%Y%m%d_%H%M%S"))
    }

    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        let created = DateTime::parse_from_rfc3339(&self.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .context("Manifest has an invalid creation timestamp")?;
        let filepath = dir.join(Self::filename(created));

        let json = serde_json::to_string_pretty(self).context("Failed to serialize frame manifest")?;
        fs::write(&filepath, json)
            .with_context(|| format!("Failed to write manifest: {}", filepath.display()))?;

        Ok(filepath)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::{render, Background};
    use crate::fonts::FontSet;
    use crate::models::CuratedStory;
    use crate::scorer::score;
    use chrono::TimeZone;

    fn story(sequence_id: u32, image_ref: Option<&str>) -> CuratedStory {
        let headline = "गाजियाबाद में दिनदहाड़े हत्या";
        let summary = "यह एक गंभीर अपराध की घटना है। पुलिस जांच में जुटी है और आरोपियों की तलाश जारी है।";
        CuratedStory {
            sequence_id,
            headline: headline.to_string(),
            summary: summary.to_string(),
            category: Category::Murder,
            source_id: "indiatoday".to_string(),
            image_ref: image_ref.map(str::to_string),
            captured_at: Utc.with_ymd_and_hms(2025, 11, 12, 6, 30, 0).unwrap(),
            score: score(headline, summary, image_ref.is_some(), Category::Murder),
        }
    }

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 12, 7, 0, 0).unwrap()
    }

    #[test]
    fn test_push_records_frame_details() {
        let fonts = FontSet::builtin();
        let mut manifest = FrameManifest::new(created());

        let clean = render(&story(1, None), None, &fonts);
        let broken = render(
            &story(2, Some("missing.jpg")),
            Some(Background::Encoded(b"")),
            &fonts,
        );
        manifest.push(&clean, PathBuf::from("frames/1.png"));
        manifest.push(&broken, PathBuf::from("frames/2.png"));

        assert_eq!(manifest.total_frames, 2);
        assert_eq!(manifest.degraded_count(), 1);
        assert_eq!(manifest.entries[0].category, Category::Murder);
        assert_eq!(manifest.entries[0].source, "indiatoday");
        assert!(!manifest.entries[0].has_image);
        assert!(manifest.entries[1].has_image);
        assert_eq!(manifest.entries[0].summary_length, char_len(&clean.story.summary));
    }

    #[test]
    fn test_save_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut manifest = FrameManifest::new(created());
        let frame = render(&story(1, None), None, &FontSet::builtin());
        manifest.push(&frame, PathBuf::from("frames/1.png"));

        let path = manifest.save(dir.path()).unwrap();

        assert!(path.ends_with("frames_metadata_20251112_070000.json"));
        let content = fs::read_to_string(&path).unwrap();
        let reloaded: FrameManifest = serde_json::from_str(&content).unwrap();
        assert_eq!(reloaded.entries, manifest.entries);
    }

    #[test]
    fn test_new_manifest_is_empty() {
        let manifest = FrameManifest::new(created());
        assert!(manifest.is_empty());
        assert_eq!(manifest.total_frames, 0);
    }
}
