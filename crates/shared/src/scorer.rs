use serde::{Deserialize, Serialize};
use std::fmt;

use crate::classifier::Category;
use crate::normalizer::char_len;

pub const HEADLINE_BAND_POINTS: u8 = 40;
pub const HEADLINE_SHORT_POINTS: u8 = 20;
pub const IMAGE_POINTS: u8 = 30;
pub const SUMMARY_POINTS: u8 = 20;
pub const CATEGORY_POINTS: u8 = 10;

/// Summaries longer than this many characters earn [`SUMMARY_POINTS`]
pub const SUMMARY_SCORE_THRESHOLD: usize = 50;

pub const MAX_SCORE: u8 = HEADLINE_BAND_POINTS + IMAGE_POINTS + SUMMARY_POINTS + CATEGORY_POINTS;

/// Quality score in `0..=100`, only meaningful as a sort key
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CurationScore(u8);

impl CurationScore {
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for CurationScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn headline_points(headline: &str) -> u8 {
    match char_len(headline) {
        20..=99 => HEADLINE_BAND_POINTS,
        10..=19 => HEADLINE_SHORT_POINTS,
        _ => 0,
    }
}

pub fn score(headline: &str, summary: &str, has_image: bool, category: Category) -> CurationScore {
    let mut total = headline_points(headline);

    if has_image {
        total += IMAGE_POINTS;
    }
    if char_len(summary) > SUMMARY_SCORE_THRESHOLD {
        total += SUMMARY_POINTS;
    }
    if category.is_specific() {
        total += CATEGORY_POINTS;
    }

    CurationScore(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(n: usize) -> String {
        "क".repeat(n)
    }

    #[test]
    fn test_full_marks() {
        let result = score(&chars(30), &chars(60), true, Category::Fraud);
        assert_eq!(result.value(), 100);
        assert_eq!(result.value(), MAX_SCORE);
    }

    #[test]
    fn test_headline_bands() {
        assert_eq!(score(&chars(9), "", false, Category::General).value(), 0);
        assert_eq!(score(&chars(10), "", false, Category::General).value(), 20);
        assert_eq!(score(&chars(19), "", false, Category::General).value(), 20);
        assert_eq!(score(&chars(20), "", false, Category::General).value(), 40);
        assert_eq!(score(&chars(99), "", false, Category::General).value(), 40);
        assert_eq!(score(&chars(100), "", false, Category::General).value(), 0);
    }

    #[test]
    fn test_summary_threshold_is_exclusive() {
        assert_eq!(score("", &chars(50), false, Category::General).value(), 0);
        assert_eq!(score("", &chars(51), false, Category::General).value(), 20);
    }

    #[test]
    fn test_image_and_category_points() {
        assert_eq!(score("", "", true, Category::General).value(), 30);
        assert_eq!(score("", "", false, Category::Murder).value(), 10);
    }

    #[test]
    fn test_scores_order_numerically() {
        let low = score(&chars(12), "", false, Category::General);
        let high = score(&chars(30), "", false, Category::General);
        assert!(high > low);
    }
}
