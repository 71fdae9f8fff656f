use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::Category;
use crate::scorer::CurationScore;

/// An unprocessed item as delivered by the source collector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStory {
    pub headline: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub image_ref: Option<String>,
    pub source_id: String,
    pub captured_at: DateTime<Utc>,
}

impl RawStory {
    pub fn new(
        headline: impl Into<String>,
        summary: impl Into<String>,
        source_id: impl Into<String>,
        captured_at: DateTime<Utc>,
    ) -> Self {
        Self {
            headline: headline.into(),
            summary: summary.into(),
            image_ref: None,
            source_id: source_id.into(),
            captured_at,
        }
    }

    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }
}

/// A story after cleaning, classification and scoring.
///
/// `input_index` is the position in the caller's input and is the tie-break
/// for equal scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedStory {
    pub input_index: usize,
    pub headline: String,
    pub summary: String,
    pub image_ref: Option<String>,
    pub source_id: String,
    pub captured_at: DateTime<Utc>,
    pub category: Category,
    pub score: CurationScore,
}

/// A selected, finalized and validated story ready for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuratedStory {
    pub sequence_id: u32,
    pub headline: String,
    pub summary: String,
    pub category: Category,
    pub source_id: String,
    pub image_ref: Option<String>,
    pub captured_at: DateTime<Utc>,
    pub score: CurationScore,
}

/// Curated stories from one run, as written to disk
#[derive(Debug, Serialize, Deserialize)]
pub struct CurationBatch {
    pub version: String,
    pub created_at: String,
    pub stories: Vec<CuratedStory>,
}

impl CurationBatch {
    pub const VERSION: &'static str = "1.0";

    pub fn new(stories: Vec<CuratedStory>) -> Self {
        Self {
            version: Self::VERSION.to_string(),
            created_at: Utc::now().to_rfc3339(),
            stories,
        }
    }
}
