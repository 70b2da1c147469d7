//! Boundary validation for the event dataset.
//!
//! The closed schema is enforced here, at load time, instead of through the
//! repeated find-and-replace passes that let category drift accumulate in
//! the first place. Legacy category values are only ever remapped on
//! explicit request (`--fix`); validation by itself reports and refuses.

use anyhow::{Context, Result, bail};
use owo_colors::{OwoColorize, Stream};
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::instrument;

use crate::cli::{AppContext, ValidateArgs};
use crate::core::model::{EventRecord, EventType, TypeTag};
use crate::infra::config::load_config;
use crate::infra::io::{load_events, save_events};

/// Accepted year shapes: "1906", "1939-1945", "400-bc", "2011-present".
static YEAR_SHAPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,4}(?:-(?:\d{1,4}|present|ongoing))?(?:-(?:bce|bc|ad|ce))?$")
        .expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One validation finding, addressed to a record field.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub id: String,
    pub field: &'static str,
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    fn error(id: &str, field: &'static str, message: String) -> Self {
        Self { id: id.to_string(), field, severity: Severity::Error, message }
    }

    fn warning(id: &str, field: &'static str, message: String) -> Self {
        Self { id: id.to_string(), field, severity: Severity::Warning, message }
    }
}

/// Check every record against the data-model invariants.
pub fn validate(records: &[EventRecord]) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut seen_ids: HashSet<&str> = HashSet::new();

    for record in records {
        let id = record.id.as_str();

        if !seen_ids.insert(id) {
            findings.push(Finding::error(id, "id", "duplicate record id".to_string()));
        }

        if record.title.trim().is_empty() {
            findings.push(Finding::error(id, "title", "empty title".to_string()));
        }

        if let TypeTag::Unknown(raw) = &record.kind {
            let message = match EventType::remap_legacy(raw) {
                Some(target) => {
                    format!("legacy type `{raw}`; remap to `{target}` with --fix")
                }
                None => format!("type `{raw}` is outside the closed set"),
            };
            findings.push(Finding::error(id, "type", message));
        }

        if !(-90.0..=90.0).contains(&record.pos.lat) {
            findings.push(Finding::error(
                id,
                "pos",
                format!("latitude {} out of range [-90, 90]", record.pos.lat),
            ));
        }
        if !(-180.0..=180.0).contains(&record.pos.lng) {
            findings.push(Finding::error(
                id,
                "pos",
                format!("longitude {} out of range [-180, 180]", record.pos.lng),
            ));
        }

        if let Some(km) = record.radius_km
            && !(km.is_finite() && km > 0.0)
        {
            findings.push(Finding::error(id, "radiusKm", format!("radius {km} must be > 0")));
        }

        if let Some(year) = &record.year {
            let folded = crate::core::normalize::fold_dashes(&year.trim().to_lowercase());
            if !YEAR_SHAPE_RE.is_match(&folded) {
                findings.push(Finding::warning(
                    id,
                    "year",
                    format!("year `{year}` does not match a known shape"),
                ));
            }
        }
    }

    findings
}

/// Apply the legacy category remap in place. Returns one finding per change.
pub fn apply_legacy_remap(records: &mut [EventRecord]) -> Vec<Finding> {
    let mut applied = Vec::new();

    for record in records {
        if let TypeTag::Unknown(raw) = &record.kind
            && let Some(target) = EventType::remap_legacy(raw)
        {
            applied.push(Finding::warning(
                &record.id,
                "type",
                format!("remapped `{raw}` to `{target}`"),
            ));
            record.kind = TypeTag::Known(target);
        }
    }

    applied
}

pub fn has_errors(findings: &[Finding]) -> bool {
    findings.iter().any(|f| f.severity == Severity::Error)
}

#[derive(Serialize)]
struct ValidateReport<'a> {
    records: usize,
    errors: usize,
    warnings: usize,
    findings: &'a [Finding],
    fixed: &'a [Finding],
}

/// `hmap validate` entry point.
#[instrument(skip_all)]
pub fn run(args: ValidateArgs, ctx: &AppContext) -> Result<()> {
    let config = load_config().unwrap_or_default();
    let input = args.input.unwrap_or_else(|| config.dataset.clone());

    let mut records = load_events(&input)?;

    let fixed = if args.fix { apply_legacy_remap(&mut records) } else { Vec::new() };
    let findings = validate(&records);
    let errors = findings.iter().filter(|f| f.severity == Severity::Error).count();
    let warnings = findings.len() - errors;

    if args.json {
        let report = ValidateReport {
            records: records.len(),
            errors,
            warnings,
            findings: &findings,
            fixed: &fixed,
        };
        println!("{}", serde_json::to_string(&report).context("serialize validate report")?);
    } else if !ctx.quiet {
        for finding in &fixed {
            println!(
                "  {} {}: {}",
                "fixed".if_supports_color(Stream::Stdout, |s| s.cyan()),
                finding.id,
                finding.message
            );
        }
        for finding in &findings {
            let tag = match finding.severity {
                Severity::Error => {
                    "error".if_supports_color(Stream::Stdout, |s| s.red()).to_string()
                }
                Severity::Warning => {
                    "warning".if_supports_color(Stream::Stdout, |s| s.yellow()).to_string()
                }
            };
            println!("  {tag} {} [{}]: {}", finding.id, finding.field, finding.message);
        }
        println!(
            "{} records: {} error(s), {} warning(s)",
            records.len(),
            errors,
            warnings
        );
    }

    // Persist fixes even when warnings remain; errors block the write.
    if args.fix && !fixed.is_empty() && errors == 0 && !ctx.dry_run {
        let target = args.output.unwrap_or(input);
        save_events(&target, &records)?;
        if !ctx.quiet {
            println!("Wrote {} records to {}", records.len(), target.display());
        }
    }

    if errors > 0 {
        bail!("validation failed with {errors} error(s)");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::LatLng;

    fn record(id: &str, kind: &str) -> EventRecord {
        EventRecord {
            id: id.to_string(),
            kind: TypeTag::from(kind.to_string()),
            title: "Some Event".to_string(),
            country: "US".to_string(),
            pos: LatLng { lat: 10.0, lng: 20.0 },
            desc: None,
            desc_long: None,
            wiki: None,
            year: None,
            casualties: None,
            radius_km: None,
            image: None,
        }
    }

    #[test]
    fn clean_records_produce_no_findings() {
        let records = vec![record("a", "war"), record("b", "man-made-disaster")];
        assert!(validate(&records).is_empty());
    }

    #[test]
    fn legacy_types_are_errors_with_remap_hint() {
        let findings = validate(&[record("a", "culture")]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Error);
        assert!(findings[0].message.contains("archaeology"));
    }

    #[test]
    fn out_of_set_types_without_remap_are_plain_errors() {
        let findings = validate(&[record("a", "volcano")]);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("closed set"));
    }

    #[test]
    fn coordinate_bounds_are_enforced() {
        let mut bad = record("a", "war");
        bad.pos = LatLng { lat: 91.0, lng: -200.0 };
        let findings = validate(&[bad]);
        assert_eq!(findings.iter().filter(|f| f.field == "pos").count(), 2);
    }

    #[test]
    fn radius_must_be_positive_and_finite() {
        let mut zero = record("a", "war");
        zero.radius_km = Some(0.0);
        let mut nan = record("b", "war");
        nan.radius_km = Some(f64::NAN);

        assert!(has_errors(&validate(&[zero])));
        assert!(has_errors(&validate(&[nan])));
    }

    #[test]
    fn duplicate_ids_are_errors() {
        let findings = validate(&[record("same", "war"), record("same", "fire")]);
        assert!(findings.iter().any(|f| f.field == "id" && f.severity == Severity::Error));
    }

    #[test]
    fn odd_year_shapes_warn_only() {
        let mut odd = record("a", "war");
        odd.year = Some("circa 1900".to_string());
        let findings = validate(&[odd]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);

        let mut fine = record("b", "war");
        fine.year = Some("400-BC".to_string());
        assert!(validate(&[fine]).is_empty());
    }

    #[test]
    fn remap_fixes_legacy_types_in_place() {
        let mut records = vec![record("a", "culture"), record("b", "man-made disaster")];
        let applied = apply_legacy_remap(&mut records);

        assert_eq!(applied.len(), 2);
        assert_eq!(records[0].kind, TypeTag::Known(EventType::Archaeology));
        assert_eq!(records[1].kind, TypeTag::Known(EventType::Disaster));
        assert!(validate(&records).is_empty());
    }
}
