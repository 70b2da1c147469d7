//! Record quality scoring for duplicate resolution.
//!
//! The scorer is an explicit ordered list of named rules, each independently
//! testable, rather than inline arithmetic. A rule maps a record to an i64
//! contribution (0 when it does not apply); the score is the sum. Weights
//! are fixed constants so the documented relative ordering holds; thresholds
//! and id-suffix lists are configurable.

use serde::{Deserialize, Serialize};

use crate::core::model::EventRecord;
use crate::core::normalize::fold_dashes;

/// Largest single bonus: a hand-verified, geographically-scoped entry.
const CANONICAL_BONUS: i64 = 1_000;
/// Flat bonus for having a long description at all.
const DESC_LONG_BASE: i64 = 50;
/// Length bonus: one point per ten characters, capped.
const DESC_LONG_LENGTH_CAP: i64 = 100;
const RADIUS_BONUS: i64 = 40;
const LARGE_RADIUS_BONUS: i64 = 40;
const CASUALTIES_BONUS: i64 = 30;
const MASS_CASUALTIES_BONUS: i64 = 30;
const WIKI_BONUS: i64 = 25;
const IMAGE_BONUS: i64 = 20;
const YEAR_BONUS: i64 = 15;
/// Single years denote more precise curation than ranges.
const SINGLE_YEAR_BONUS: i64 = 10;
/// Outweighs the bonus sum a thin record can plausibly reach, but not the
/// gap genuine richness creates: a richly described record still wins
/// despite a suspicious suffix, while a thin one sinks below a bare record.
const SUSPECT_PENALTY: i64 = -200;

/// Tunable thresholds and id-suffix lists for the scoring rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreConfig {
    /// Id suffixes marking hand-verified canonical entries.
    pub canonical_suffixes: Vec<String>,

    /// Id suffixes marking auto-generated or low-confidence provenance.
    pub suspect_suffixes: Vec<String>,

    /// Radii above this (km) are materially informative.
    pub large_radius_km: f64,

    /// Casualty counts above this mark a mass-casualty event.
    pub mass_casualty_threshold: u64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            canonical_suffixes: vec!["_area".to_string()],
            suspect_suffixes: vec![
                "_new".to_string(),
                "_point".to_string(),
                "_chatgpt".to_string(),
                "_gpt".to_string(),
                "_v2".to_string(),
                "_v3".to_string(),
                "_tmp".to_string(),
                "_temp".to_string(),
            ],
            large_radius_km: 100.0,
            mass_casualty_threshold: 10_000,
        }
    }
}

/// One named scoring rule.
pub struct Rule {
    pub name: &'static str,
    apply: fn(&EventRecord, &ScoreConfig) -> i64,
}

/// The rules, in audit order. Evaluated independently and summed.
pub const RULES: &[Rule] = &[
    Rule { name: "canonical-id", apply: canonical_id },
    Rule { name: "long-description", apply: long_description },
    Rule { name: "radius", apply: radius },
    Rule { name: "casualties", apply: casualties },
    Rule { name: "wiki", apply: wiki },
    Rule { name: "image", apply: image },
    Rule { name: "year", apply: year },
    Rule { name: "suspect-id", apply: suspect_id },
];

/// Total quality score for a record; higher means keep.
pub fn score(record: &EventRecord, config: &ScoreConfig) -> i64 {
    RULES.iter().map(|rule| (rule.apply)(record, config)).sum()
}

/// Per-rule contributions that actually fired, for audit output.
pub fn breakdown(record: &EventRecord, config: &ScoreConfig) -> Vec<(&'static str, i64)> {
    RULES
        .iter()
        .map(|rule| (rule.name, (rule.apply)(record, config)))
        .filter(|(_, points)| *points != 0)
        .collect()
}

fn canonical_id(record: &EventRecord, config: &ScoreConfig) -> i64 {
    if config.canonical_suffixes.iter().any(|s| record.id.ends_with(s)) {
        CANONICAL_BONUS
    } else {
        0
    }
}

fn long_description(record: &EventRecord, _config: &ScoreConfig) -> i64 {
    match &record.desc_long {
        Some(text) if !text.trim().is_empty() => {
            let length_points = (text.chars().count() as i64 / 10).min(DESC_LONG_LENGTH_CAP);
            DESC_LONG_BASE + length_points
        }
        _ => 0,
    }
}

fn radius(record: &EventRecord, config: &ScoreConfig) -> i64 {
    match record.radius_km {
        Some(km) if km.is_finite() && km > 0.0 => {
            RADIUS_BONUS + if km > config.large_radius_km { LARGE_RADIUS_BONUS } else { 0 }
        }
        _ => 0,
    }
}

fn casualties(record: &EventRecord, config: &ScoreConfig) -> i64 {
    match record.casualties {
        Some(count) => {
            CASUALTIES_BONUS
                + if count > config.mass_casualty_threshold { MASS_CASUALTIES_BONUS } else { 0 }
        }
        None => 0,
    }
}

fn wiki(record: &EventRecord, _config: &ScoreConfig) -> i64 {
    match &record.wiki {
        Some(url) if !url.trim().is_empty() => WIKI_BONUS,
        _ => 0,
    }
}

fn image(record: &EventRecord, _config: &ScoreConfig) -> i64 {
    match &record.image {
        Some(url) if !url.trim().is_empty() => IMAGE_BONUS,
        _ => 0,
    }
}

fn year(record: &EventRecord, _config: &ScoreConfig) -> i64 {
    match &record.year {
        Some(y) if !y.trim().is_empty() => {
            YEAR_BONUS + if is_single_year(y) { SINGLE_YEAR_BONUS } else { 0 }
        }
        _ => 0,
    }
}

fn suspect_id(record: &EventRecord, config: &ScoreConfig) -> i64 {
    if config.suspect_suffixes.iter().any(|s| record.id.ends_with(s)) {
        SUSPECT_PENALTY
    } else {
        0
    }
}

/// A year string denotes a single year when, after dash folding and era
/// removal, no range separator remains. "400-bc" is a single year;
/// "1939-1945" and "2011-present" are not.
pub(crate) fn is_single_year(year: &str) -> bool {
    let folded = fold_dashes(&year.trim().to_lowercase()).replace(char::is_whitespace, "-");

    let without_era = ["-bce", "-ce", "-bc", "-ad"]
        .iter()
        .find_map(|suffix| folded.strip_suffix(suffix))
        .unwrap_or(&folded);

    !without_era.is_empty() && !without_era.contains('-')
}
