//! Ranking, summary finalization and the final validity check.

use crate::classifier::MIN_HEADLINE_CHARS;
use crate::models::{CuratedStory, NormalizedStory};
use crate::normalizer::{char_len, contains_devanagari, ELLIPSIS};

/// Summaries longer than this many words are cut
pub const SUMMARY_WORD_BUDGET: usize = 200;

/// Words kept when a summary is cut, leaving room for the ellipsis
pub const SUMMARY_KEPT_WORDS: usize = 197;

/// Minimum summary length in characters for a story to be emitted
pub const MIN_SUMMARY_CHARS: usize = 50;

/// Stands in for a missing summary
pub const FALLBACK_SUMMARY: &str = "यह एक गंभीर अपराध की घटना है।";

/// Appended to summaries that are too short to stand alone
pub const SUMMARY_CONTEXT: &str = " पुलिस जांच में जुटी है और आरोपियों की तलाश जारी है।";

/// Bound a summary by word count, or pad a thin one with generic context.
pub fn finalize_summary(summary: &str) -> String {
    let words: Vec<&str> = summary.split_whitespace().collect();

    if words.len() > SUMMARY_WORD_BUDGET {
        return format!("{}{}", words[..SUMMARY_KEPT_WORDS].join(" "), ELLIPSIS);
    }

    if char_len(summary) < MIN_SUMMARY_CHARS {
        let base = if summary.trim().is_empty() {
            FALLBACK_SUMMARY
        } else {
            summary
        };
        return format!("{}{}", base, SUMMARY_CONTEXT);
    }

    summary.to_string()
}

/// The predicate every emitted story satisfies
pub fn is_valid(headline: &str, summary: &str) -> bool {
    char_len(headline) >= MIN_HEADLINE_CHARS
        && char_len(summary) >= MIN_SUMMARY_CHARS
        && contains_devanagari(headline)
}

/// Rank stories by score and keep the best `limit` that pass validation.
///
/// The sort is stable, so equal scores keep their input order. Stories that
/// fail validation after their summary is finalized are dropped without
/// being replaced, so the result can be shorter than `limit`. Sequence ids
/// are assigned 1..=n over what remains.
pub fn select(mut stories: Vec<NormalizedStory>, limit: usize) -> Vec<CuratedStory> {
    stories.sort_by(|a, b| b.score.cmp(&a.score));

    stories
        .into_iter()
        .take(limit)
        .filter_map(|story| {
            let summary = finalize_summary(&story.summary);
            if is_valid(&story.headline, &summary) {
                Some((story, summary))
            } else {
                tracing::debug!(headline = %story.headline, "story failed final validation");
                None
            }
        })
        .zip(1u32..)
        .map(|((story, summary), sequence_id)| CuratedStory {
            sequence_id,
            headline: story.headline,
            summary,
            category: story.category,
            source_id: story.source_id,
            image_ref: story.image_ref,
            captured_at: story.captured_at,
            score: story.score,
        })
        .collect()
}
