//! Keyword classification of headlines and the validation gate applied
//! right after it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::normalizer::{char_len, contains_devanagari};

/// Headlines shorter than this (in characters) are rejected
pub const MIN_HEADLINE_CHARS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Murder,
    Theft,
    Fraud,
    Assault,
    SexualOffense,
    Kidnapping,
    Terrorism,
    Corruption,
    General,
}

impl Category {
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Murder => "murder",
            Category::Theft => "theft",
            Category::Fraud => "fraud",
            Category::Assault => "assault",
            Category::SexualOffense => "sexual_offense",
            Category::Kidnapping => "kidnapping",
            Category::Terrorism => "terrorism",
            Category::Corruption => "corruption",
            Category::General => "general",
        }
    }

    /// Hindi label for display on frames and in manifests
    pub fn label(&self) -> &'static str {
        match self {
            Category::Murder => "हत्या",
            Category::Theft => "चोरी",
            Category::Fraud => "ठगी",
            Category::Assault => "मारपीट",
            Category::SexualOffense => "यौन अपराध",
            Category::Kidnapping => "अपहरण",
            Category::Terrorism => "आतंकवाद",
            Category::Corruption => "भ्रष्टाचार",
            Category::General => "अपराध",
        }
    }

    pub fn is_specific(&self) -> bool {
        *self != Category::General
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Keyword sets scanned top to bottom; the first category with a match wins.
///
/// "गायब" is listed under both theft and kidnapping, so it classifies as theft.
pub const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Murder,
        &["हत्या", "मर्डर", "खून", "कत्ल", "मार डाला", "मौत"],
    ),
    (Category::Theft, &["चोरी", "चोर", "चुराया", "गायब", "खोया"]),
    (
        Category::Fraud,
        &["ठगी", "धोखा", "फ्रॉड", "जालसाज", "बेईमानी"],
    ),
    (Category::Assault, &["मारपीट", "हमला", "झगड़ा", "लड़ाई"]),
    (
        Category::SexualOffense,
        &["बलात्कार", "दुष्कर्म", "छेड़छाड़"],
    ),
    (Category::Kidnapping, &["अपहरण", "बंधक", "गायब"]),
    (Category::Terrorism, &["आतंकी", "बम", "धमाका", "आतंकवाद"]),
    (Category::Corruption, &["भ्रष्टाचार", "रिश्वत", "घूस"]),
];

/// Generic crime/justice words that keep an otherwise unclassified headline
pub const CRIME_INDICATORS: &[&str] = &["पुलिस", "केस", "गिरफ्तार", "मुकदमा", "अदालत", "जेल"];

/// Why an item was dropped at the validation gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    TooShort,
    MissingScript,
    NotCrimeRelated,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::TooShort => "headline too short",
            Rejection::MissingScript => "headline has no Devanagari text",
            Rejection::NotCrimeRelated => "headline is not crime related",
        };
        f.write_str(reason)
    }
}

pub fn classify(headline: &str) -> Category {
    let lowered = headline.to_lowercase();

    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::General)
}

/// Classify a normalized headline, or explain why it can't be used.
pub fn classify_and_validate(headline: &str) -> Result<Category, Rejection> {
    if char_len(headline) < MIN_HEADLINE_CHARS {
        return Err(Rejection::TooShort);
    }

    if !contains_devanagari(headline) {
        return Err(Rejection::MissingScript);
    }

    let category = classify(headline);
    if category == Category::General
        && !CRIME_INDICATORS.iter().any(|word| headline.contains(word))
    {
        return Err(Rejection::NotCrimeRelated);
    }

    Ok(category)
}
