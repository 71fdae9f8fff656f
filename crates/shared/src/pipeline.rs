//! The composed curation pipeline:
//! normalize → classify/validate → dedup → score → select.

use serde::Serialize;
use tracing::{debug, info};

use crate::classifier::{classify_and_validate, Rejection};
use crate::dedup::deduplicate;
use crate::error::CurationError;
use crate::models::{CuratedStory, NormalizedStory, RawStory};
use crate::normalizer::{normalize_headline, normalize_text};
use crate::scorer::score;
use crate::selector::select;

/// How many stories each stage let through
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CurationReport {
    pub received: usize,
    pub too_short: usize,
    pub missing_script: usize,
    pub not_crime_related: usize,
    pub duplicates: usize,
    pub selected: usize,
}

impl CurationReport {
    pub fn rejected(&self) -> usize {
        self.too_short + self.missing_script + self.not_crime_related
    }

    fn record(&mut self, rejection: Rejection) {
        match rejection {
            Rejection::TooShort => self.too_short += 1,
            Rejection::MissingScript => self.missing_script += 1,
            Rejection::NotCrimeRelated => self.not_crime_related += 1,
        }
    }
}

/// Normalize, classify and score one raw story.
pub fn prepare(index: usize, raw: &RawStory) -> Result<NormalizedStory, Rejection> {
    let headline = normalize_headline(&raw.headline);
    let summary = normalize_text(&raw.summary);
    let category = classify_and_validate(&headline)?;
    let score = score(&headline, &summary, raw.image_ref.is_some(), category);

    Ok(NormalizedStory {
        input_index: index,
        headline,
        summary,
        image_ref: raw.image_ref.clone(),
        source_id: raw.source_id.clone(),
        captured_at: raw.captured_at,
        category,
        score,
    })
}

/// Select up to `limit` distinct, validated stories from `raw`.
pub fn curate(raw: &[RawStory], limit: usize) -> Result<Vec<CuratedStory>, CurationError> {
    curate_with_report(raw, limit).map(|(stories, _)| stories)
}

/// Like [`curate`], also returning per-stage counts.
pub fn curate_with_report(
    raw: &[RawStory],
    limit: usize,
) -> Result<(Vec<CuratedStory>, CurationReport), CurationError> {
    if limit == 0 {
        return Err(CurationError::InvalidLimit);
    }

    let mut report = CurationReport {
        received: raw.len(),
        ..Default::default()
    };

    let mut candidates = Vec::with_capacity(raw.len());
    for (index, story) in raw.iter().enumerate() {
        match prepare(index, story) {
            Ok(prepared) => candidates.push(prepared),
            Err(rejection) => {
                debug!(
                    index,
                    source = %story.source_id,
                    reason = %rejection,
                    "rejected story"
                );
                report.record(rejection);
            }
        }
    }

    let before_dedup = candidates.len();
    let unique = deduplicate(candidates);
    report.duplicates = before_dedup - unique.len();

    let selected = select(unique, limit);
    report.selected = selected.len();

    info!(
        received = report.received,
        rejected = report.rejected(),
        duplicates = report.duplicates,
        selected = report.selected,
        "curation finished"
    );

    if selected.is_empty() {
        return Err(CurationError::NoViableItems {
            received: report.received,
        });
    }

    Ok((selected, report))
}
