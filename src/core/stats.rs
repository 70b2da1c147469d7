//! Dataset statistics: category counts and field completeness.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::instrument;

use crate::cli::{AppContext, StatsArgs};
use crate::core::model::EventRecord;
use crate::infra::config::load_config;
use crate::infra::io::load_events;

#[derive(Debug, Clone, Serialize, Tabled)]
pub struct TypeCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Tabled)]
pub struct FieldCompleteness {
    pub field: &'static str,
    pub present: usize,
    pub percent: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetStats {
    pub total: usize,
    pub by_type: Vec<TypeCount>,
    pub completeness: Vec<FieldCompleteness>,
}

/// Compute per-category counts and optional-field completeness.
pub fn compute(records: &[EventRecord]) -> DatasetStats {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for record in records {
        *counts.entry(record.kind.as_str().to_string()).or_default() += 1;
    }

    let mut by_type: Vec<TypeCount> =
        counts.into_iter().map(|(category, count)| TypeCount { category, count }).collect();
    // Largest categories first; name breaks ties for stable output.
    by_type.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));

    let total = records.len();
    let field = |name: &'static str, present: usize| FieldCompleteness {
        field: name,
        present,
        percent: if total == 0 {
            "0.0%".to_string()
        } else {
            format!("{:.1}%", present as f64 * 100.0 / total as f64)
        },
    };

    let completeness = vec![
        field("desc_long", records.iter().filter(|r| r.desc_long.is_some()).count()),
        field("wiki", records.iter().filter(|r| r.wiki.is_some()).count()),
        field("image", records.iter().filter(|r| r.image.is_some()).count()),
        field("year", records.iter().filter(|r| r.year.is_some()).count()),
        field("casualties", records.iter().filter(|r| r.casualties.is_some()).count()),
        field("radiusKm", records.iter().filter(|r| r.radius_km.is_some()).count()),
    ];

    DatasetStats { total, by_type, completeness }
}

/// `hmap stats` entry point.
#[instrument(skip_all)]
pub fn run(args: StatsArgs, ctx: &AppContext) -> Result<()> {
    let config = load_config().unwrap_or_default();
    let input = args.input.unwrap_or_else(|| config.dataset.clone());

    let records = load_events(&input)?;
    let stats = compute(&records);

    if args.json {
        println!("{}", serde_json::to_string(&stats).context("serialize stats")?);
        return Ok(());
    }

    if !ctx.quiet {
        println!("{} records", stats.total);
        println!("{}", Table::new(&stats.by_type).with(Style::sharp()));
        println!("{}", Table::new(&stats.completeness).with(Style::sharp()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{LatLng, TypeTag};

    fn record(id: &str, kind: &str) -> EventRecord {
        EventRecord {
            id: id.to_string(),
            kind: TypeTag::from(kind.to_string()),
            title: "Event".to_string(),
            country: "US".to_string(),
            pos: LatLng { lat: 0.0, lng: 0.0 },
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
    fn counts_sort_by_size_then_name() {
        let records = vec![
            record("a", "war"),
            record("b", "war"),
            record("c", "fire"),
            record("d", "earthquake"),
        ];
        let stats = compute(&records);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.by_type[0].category, "war");
        assert_eq!(stats.by_type[0].count, 2);
        // fire and earthquake tie at 1; alphabetical order breaks it.
        assert_eq!(stats.by_type[1].category, "earthquake");
        assert_eq!(stats.by_type[2].category, "fire");
    }

    #[test]
    fn completeness_percentages() {
        let mut with_wiki = record("a", "war");
        with_wiki.wiki = Some("https://en.wikipedia.org/wiki/x".to_string());
        let records = vec![with_wiki, record("b", "war")];

        let stats = compute(&records);
        let wiki = stats.completeness.iter().find(|f| f.field == "wiki").unwrap();
        assert_eq!(wiki.present, 1);
        assert_eq!(wiki.percent, "50.0%");
    }

    #[test]
    fn empty_dataset_is_fine() {
        let stats = compute(&[]);
        assert_eq!(stats.total, 0);
        assert!(stats.by_type.is_empty());
        assert_eq!(stats.completeness[0].percent, "0.0%");
    }
}
