//! Rocket Type Classifier
//! Maps a raw funding-stage string onto one of the fixed rocket types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Coarse growth-stage bucket derived from a startup's funding round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RocketType {
    W,
    X,
    Y,
    Z,
    Unknown,
}

impl RocketType {
    /// Every label the classifier can emit.
    pub const ALL: [RocketType; 5] = [
        RocketType::W,
        RocketType::X,
        RocketType::Y,
        RocketType::Z,
        RocketType::Unknown,
    ];

    /// Labels backed by a funding-stage entry, in display order.
    pub const RANKED: [RocketType; 4] = [RocketType::W, RocketType::X, RocketType::Y, RocketType::Z];

    pub fn as_str(&self) -> &'static str {
        match self {
            RocketType::W => "W",
            RocketType::X => "X",
            RocketType::Y => "Y",
            RocketType::Z => "Z",
            RocketType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for RocketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Normalized fund level -> rocket type.
pub const FUND_LEVEL_MAPPING: [(&str, RocketType); 9] = [
    ("Pre Seed", RocketType::W),
    ("Preseed", RocketType::W),
    ("No Funding", RocketType::W),
    ("No Investment", RocketType::W),
    ("Seed", RocketType::X),
    ("Seed & Bridge", RocketType::X),
    ("Bridge", RocketType::X),
    ("Series A", RocketType::Y),
    ("Series B", RocketType::Z),
];

static FUND_LEVEL_LOOKUP: LazyLock<HashMap<&'static str, RocketType>> =
    LazyLock::new(|| FUND_LEVEL_MAPPING.into_iter().collect());

/// Text a missing cell stringifies to before normalization.
const MISSING_VALUE_TEXT: &str = "nan";

/// Trim surrounding whitespace and title-case the remainder.
///
/// A letter starts a word when the character before it is not alphabetic,
/// so `"seed & bridge"` becomes `"Seed & Bridge"` and `"PRE SEED"` becomes
/// `"Pre Seed"`.
pub fn normalize_fund_level(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    let mut at_word_start = true;

    for ch in raw.trim().chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                normalized.extend(ch.to_uppercase());
            } else {
                normalized.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            normalized.push(ch);
            at_word_start = true;
        }
    }

    normalized
}

/// Classify a funding-stage value. Unmapped values fall back to `Unknown`.
pub fn classify(raw: &str) -> RocketType {
    let normalized = normalize_fund_level(raw);
    FUND_LEVEL_LOOKUP
        .get(normalized.as_str())
        .copied()
        .unwrap_or(RocketType::Unknown)
}

/// Classify a possibly missing cell.
pub fn classify_value(raw: Option<&str>) -> RocketType {
    classify(raw.unwrap_or(MISSING_VALUE_TEXT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pre_seed_variants_share_a_label() {
        for raw in ["pre seed", "Pre Seed", "  Pre Seed  ", "PRE SEED"] {
            assert_eq!(classify(raw), RocketType::W, "input {raw:?}");
        }
        // Inner whitespace is not collapsed.
        assert_eq!(classify("pre   seed"), RocketType::Unknown);
    }

    #[test]
    fn every_table_entry_round_trips() {
        for (key, label) in FUND_LEVEL_MAPPING {
            assert_eq!(classify(key), label);
            assert_eq!(classify(&key.to_lowercase()), label);
            assert_eq!(classify(&format!("\t{}\n", key.to_uppercase())), label);
        }
    }

    #[test]
    fn unmapped_values_are_unknown() {
        assert_eq!(classify("unknown-stage"), RocketType::Unknown);
        assert_eq!(classify(""), RocketType::Unknown);
        assert_eq!(classify("Series C"), RocketType::Unknown);
        assert_eq!(classify_value(None), RocketType::Unknown);
    }

    #[test]
    fn seed_and_bridge_are_distinct_keys_with_same_label() {
        assert_eq!(classify("seed & bridge"), RocketType::X);
        assert_eq!(classify("SEED"), RocketType::X);
        assert_eq!(classify("bridge"), RocketType::X);
    }

    #[test]
    fn title_case_restarts_after_non_letters() {
        assert_eq!(normalize_fund_level("  series a "), "Series A");
        assert_eq!(normalize_fund_level("pre-seed"), "Pre-Seed");
        assert_eq!(normalize_fund_level("nO iNVESTMENT"), "No Investment");
    }

    #[test]
    fn labels_render_as_their_letters() {
        let rendered: Vec<String> = RocketType::ALL.iter().map(|l| l.to_string()).collect();
        assert_eq!(rendered, ["W", "X", "Y", "Z", "Unknown"]);
    }
}
