//! Deduplication of event records by normalized title.
//!
//! Records are partitioned into groups keyed by [`normalize`]; within each
//! group the highest-scoring record survives and the rest are discarded.
//! This is a pure filter: survivors are clones of inputs, nothing is
//! synthesized or mutated. Ties keep the record encountered first in input
//! order, so repeated runs are deterministic.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::cli::{AppContext, DedupeArgs};
use crate::core::model::{DatasetError, EventRecord};
use crate::core::normalize::normalize;
use crate::core::score::{ScoreConfig, breakdown, score};
use crate::infra::config::load_config;
use crate::infra::io::{load_events, save_events};

/// A record discarded in favor of a better-scoring duplicate.
#[derive(Debug, Clone, Serialize)]
pub struct DroppedRecord {
    pub id: String,
    pub kept_id: String,
    /// The normalization key the two records shared.
    pub key: String,
    pub score: i64,
    pub kept_score: i64,
}

/// Survivors plus an audit trail of what was dropped and why.
#[derive(Debug, Clone, Serialize)]
pub struct DedupeOutcome {
    pub kept: Vec<EventRecord>,
    pub dropped: Vec<DroppedRecord>,
}

/// Keep exactly one record per normalized-title group.
///
/// Total over any well-formed input, including the empty list. Records with
/// empty titles are rejected before grouping begins; normalization has no
/// defined behavior for absent titles.
#[instrument(skip_all, fields(records = records.len()))]
pub fn deduplicate(
    records: &[EventRecord],
    config: &ScoreConfig,
) -> Result<DedupeOutcome, DatasetError> {
    for record in records {
        if record.title.trim().is_empty() {
            return Err(DatasetError::EmptyTitle { id: record.id.clone() });
        }
    }

    // Insertion-ordered grouping keeps output order deterministic.
    let mut groups: IndexMap<String, Vec<usize>> = IndexMap::new();
    for (index, record) in records.iter().enumerate() {
        groups.entry(normalize(&record.title)).or_default().push(index);
    }

    let mut kept = Vec::with_capacity(groups.len());
    let mut dropped = Vec::new();

    for (key, members) in &groups {
        let scored: Vec<(usize, i64)> =
            members.iter().map(|&i| (i, score(&records[i], config))).collect();

        // Strict comparison keeps the earliest member on ties.
        let (best_index, best_score) = scored
            .iter()
            .copied()
            .fold((members[0], i64::MIN), |(bi, bs), (i, s)| if s > bs { (i, s) } else { (bi, bs) });

        kept.push(records[best_index].clone());

        for (index, member_score) in scored {
            if index == best_index {
                continue;
            }
            debug!(
                dropped = %records[index].id,
                kept = %records[best_index].id,
                key = %key,
                "discarding duplicate"
            );
            dropped.push(DroppedRecord {
                id: records[index].id.clone(),
                kept_id: records[best_index].id.clone(),
                key: key.clone(),
                score: member_score,
                kept_score: best_score,
            });
        }
    }

    Ok(DedupeOutcome { kept, dropped })
}

#[derive(Serialize)]
struct DedupeReport<'a> {
    input: usize,
    kept: usize,
    dropped: &'a [DroppedRecord],
}

/// `hmap dedupe` entry point.
#[instrument(skip_all)]
pub fn run(args: DedupeArgs, ctx: &AppContext) -> Result<()> {
    let config = load_config().unwrap_or_default();
    let input = args.input.unwrap_or_else(|| config.dataset.clone());

    let records = load_events(&input)?;
    let outcome = deduplicate(&records, &config.score)
        .with_context(|| format!("deduplicating {}", input.display()))?;

    if args.json {
        let report = DedupeReport {
            input: records.len(),
            kept: outcome.kept.len(),
            dropped: &outcome.dropped,
        };
        println!("{}", serde_json::to_string(&report).context("serialize dedupe report")?);
    } else if !ctx.quiet {
        println!(
            "{} records -> {} kept, {} dropped",
            records.len(),
            outcome.kept.len().if_supports_color(Stream::Stdout, |n| n.green()),
            outcome.dropped.len().if_supports_color(Stream::Stdout, |n| n.yellow())
        );
        for drop in &outcome.dropped {
            println!(
                "  drop {} ({}) -> keep {} ({})  [key: {}]",
                drop.id.if_supports_color(Stream::Stdout, |s| s.red()),
                drop.score,
                drop.kept_id.if_supports_color(Stream::Stdout, |s| s.green()),
                drop.kept_score,
                drop.key
            );
            if args.explain {
                print_breakdowns(&records, drop, &config.score);
            }
        }
    }

    if ctx.dry_run {
        if !ctx.quiet {
            println!(
                "{}",
                "DRY RUN: dataset not written".if_supports_color(Stream::Stdout, |s| s.yellow())
            );
        }
        return Ok(());
    }

    let target = args.output.unwrap_or(input);
    save_events(&target, &outcome.kept)?;
    if !ctx.quiet {
        println!("Wrote {} records to {}", outcome.kept.len(), target.display());
    }

    Ok(())
}

/// Per-rule score contributions for both sides of a drop decision.
fn print_breakdowns(records: &[EventRecord], drop: &DroppedRecord, config: &ScoreConfig) {
    for id in [&drop.id, &drop.kept_id] {
        if let Some(record) = records.iter().find(|r| &r.id == id) {
            let rules = breakdown(record, config)
                .iter()
                .map(|(name, points)| format!("{name}: {points}"))
                .collect::<Vec<_>>()
                .join(", ");
            println!("    {id}: {rules}");
        }
    }
}
