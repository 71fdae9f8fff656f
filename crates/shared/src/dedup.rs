use std::collections::HashSet;

use crate::models::NormalizedStory;

/// Headlines at or above this similarity are treated as the same story
pub const SIMILARITY_THRESHOLD: f64 = 0.7;

/// Token-set Jaccard similarity of two headlines.
///
/// Tokens are whitespace-delimited and lower-cased. Two empty headlines
/// score 0.
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let left = token_set(a);
    let right = token_set(b);

    let union = left.union(&right).count();
    if union == 0 {
        return 0.0;
    }

    let intersection = left.intersection(&right).count();
    intersection as f64 / union as f64
}

fn token_set(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(|token| token.to_lowercase())
        .collect()
}

/// Drop near-duplicate stories, keeping the first of each cluster.
///
/// Each item is compared only against items already kept, so input order
/// decides which member of a cluster survives.
pub fn deduplicate(stories: Vec<NormalizedStory>) -> Vec<NormalizedStory> {
    let mut seen: Vec<String> = Vec::with_capacity(stories.len());
    let mut unique = Vec::with_capacity(stories.len());

    for story in stories {
        let duplicate_of = seen
            .iter()
            .find(|kept| jaccard_similarity(&story.headline, kept) >= SIMILARITY_THRESHOLD);

        match duplicate_of {
            Some(kept) => {
                tracing::debug!(
                    headline = %story.headline,
                    kept = %kept,
                    "dropping near-duplicate story"
                );
            }
            None => {
                seen.push(story.headline.clone());
                unique.push(story);
            }
        }
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Category;
    use crate::scorer::CurationScore;
    use chrono::{TimeZone, Utc};

    fn story(index: usize, headline: &str) -> NormalizedStory {
        NormalizedStory {
            input_index: index,
            headline: headline.to_string(),
            summary: String::new(),
            image_ref: None,
            source_id: "aajtak".to_string(),
            captured_at: Utc.with_ymd_and_hms(2025, 11, 12, 6, 0, 0).unwrap(),
            category: Category::General,
            score: CurationScore::default(),
        }
    }

    #[test]
    fn test_identical_headlines_score_one() {
        assert_eq!(jaccard_similarity("पुलिस ने चोर पकड़ा", "पुलिस ने चोर पकड़ा"), 1.0);
    }

    #[test]
    fn test_disjoint_headlines_score_zero() {
        assert_eq!(jaccard_similarity("a b c", "d e f"), 0.0);
    }

    #[test]
    fn test_empty_headlines_score_zero() {
        assert_eq!(jaccard_similarity("", ""), 0.0);
        assert_eq!(jaccard_similarity("   ", "a"), 0.0);
    }

    #[test]
    fn test_similarity_is_case_folded_and_set_based() {
        // {delhi, police, arrest} vs {delhi, police, arrest}
        assert_eq!(jaccard_similarity("Delhi POLICE arrest", "delhi police police arrest"), 1.0);
    }

    #[test]
    fn test_partial_overlap() {
        // intersection 3, union 5
        let score = jaccard_similarity("a b c d", "a b c e");
        assert!((score - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_drops_later_duplicate_keeps_first() {
        let stories = vec![
            story(0, "दिल्ली में बड़ी चोरी पुलिस जांच जारी"),
            story(1, "नोएडा में फ्रॉड गैंग का पर्दाफाश"),
            story(2, "दिल्ली में बड़ी चोरी पुलिस जांच"),
        ];

        let unique = deduplicate(stories);
        let indices: Vec<usize> = unique.iter().map(|s| s.input_index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // 7 shared tokens of 10 total: exactly 0.7
        let a = "t1 t2 t3 t4 t5 t6 t7 a1 a2";
        let b = "t1 t2 t3 t4 t5 t6 t7 b1";
        assert!((jaccard_similarity(a, b) - 0.7).abs() < 1e-9);

        let unique = deduplicate(vec![story(0, a), story(1, b)]);
        assert_eq!(unique.len(), 1);
    }

    #[test]
    fn test_compares_only_against_kept_items() {
        // b is a near-duplicate of a and is dropped; c resembles b but not a,
        // so c survives.
        let a = "w1 w2 w3 w4 w5 w6 w7 w8";
        let b = "w1 w2 w3 w4 w5 w6 w7 x1";
        let c = "w1 w2 w3 w4 x1 x2 x3 x4";
        assert!(jaccard_similarity(a, b) >= SIMILARITY_THRESHOLD);
        assert!(jaccard_similarity(a, c) < SIMILARITY_THRESHOLD);

        let unique = deduplicate(vec![story(0, a), story(1, b), story(2, c)]);
        let indices: Vec<usize> = unique.iter().map(|s| s.input_index).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn test_output_is_subsequence_without_close_pairs() {
        let headlines = [
            "a b c d e",
            "a b c d f",
            "g h i j k",
            "a b c d e",
            "g h i j l m",
            "n o p",
            "",
            "",
        ];
        let stories: Vec<NormalizedStory> = headlines
            .iter()
            .enumerate()
            .map(|(i, h)| story(i, h))
            .collect();

        let unique = deduplicate(stories);

        let indices: Vec<usize> = unique.iter().map(|s| s.input_index).collect();
        assert!(indices.windows(2).all(|w| w[0] < w[1]));

        for (i, left) in unique.iter().enumerate() {
            for right in unique.iter().skip(i + 1) {
                assert!(jaccard_similarity(&left.headline, &right.headline) < SIMILARITY_THRESHOLD);
            }
        }
    }
}
