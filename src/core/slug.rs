//! URL slug generation for event pages.
//!
//! Derives a URL-safe, human-readable identifier from a title and an
//! optional year string. The generator is deterministic and idempotent:
//! feeding a generated slug back in as a title (with no year argument)
//! returns the same slug. Collision detection across the collection is the
//! caller's job; [`collisions`] supports it.

use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use owo_colors::{OwoColorize, Stream};
use regex::Regex;
use std::sync::LazyLock;
use tracing::instrument;

use crate::cli::{AppContext, SlugsArgs};
use crate::core::model::EventRecord;
use crate::core::normalize::fold_dashes;
use crate::infra::config::load_config;
use crate::infra::io::{load_events, save_json};

/// One year token: "1906", "1939-1945", "331 bc", "2011-present".
/// Applied after dash folding; era may be joined by spaces or a hyphen.
const YEAR_TOKEN: &str = r"\d{1,4}(?:\s*-\s*(?:\d{1,4}|present|ongoing))?(?:[\s-]*(?:bce|bc|ad|ce))?";

/// Trailing parenthesized year: "Battle of Gaugamela (331 BC)".
static TRAILING_PAREN_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\s*\(\s*({YEAR_TOKEN})\s*\)\s*$")).expect("valid regex")
});

/// Trailing bare year: "Battle of Hastings 1066". The separator keeps years
/// at the start of a title ("1964 Alaska Earthquake") from matching.
static TRAILING_BARE_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)(?:^|[\s,_:-])({YEAR_TOKEN})\s*$")).expect("valid regex")
});

/// Parenthesized content inside a title contributes nothing to the slug.
static PAREN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("valid regex"));

/// Trailing open-range markers in hyphen form: "-ongoing", "-present".
/// Applied after hyphenation so punctuation cannot shield a marker.
static TRAILING_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:-(?:ongoing|present|current))+$").expect("valid regex")
});

/// "NNN bc" / "NNN ad" with a space, normalized to the hyphenated form.
static ERA_SPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,4})\s+(bce|bc|ad|ce)\b").expect("valid regex"));

/// Collapse hyphen runs and strip leading/trailing hyphens.
fn collapse_hyphens(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_was_hyphen = true; // suppress a leading hyphen
    for c in s.chars() {
        if c == '-' {
            if !last_was_hyphen {
                out.push('-');
                last_was_hyphen = true;
            }
        } else {
            out.push(c);
            last_was_hyphen = false;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// Pull a trailing year/range off the title, returning the remaining title
/// text and the raw year string when one was found.
fn extract_trailing_year(title: &str) -> (String, Option<String>) {
    let folded = fold_dashes(title);

    if let Some(caps) = TRAILING_PAREN_YEAR_RE.captures(&folded) {
        let year = caps.get(1).expect("group 1").as_str().to_string();
        let rest = folded[..caps.get(0).expect("whole match").start()].to_string();
        return (rest, Some(year));
    }

    if let Some(caps) = TRAILING_BARE_YEAR_RE.captures(&folded) {
        let year_match = caps.get(1).expect("group 1");
        let rest = folded[..year_match.start()].to_string();
        return (rest, Some(year_match.as_str().to_string()));
    }

    (folded, None)
}

/// Canonical form of a year string: lowercase, plain hyphens, no internal
/// whitespace, no open-range suffix. Returns None when nothing usable
/// remains ("ongoing" alone, empty input).
fn normalize_year(year: &str) -> Option<String> {
    let folded = fold_dashes(&year.trim().to_lowercase());

    // Internal whitespace becomes a hyphen ("331 bc" -> "331-bc"),
    // then runs are collapsed.
    let hyphenated: String =
        folded.chars().map(|c| if c.is_whitespace() { '-' } else { c }).collect();
    let mut normalized = collapse_hyphens(&hyphenated);

    for suffix in ["-ongoing", "-present"] {
        if let Some(stripped) = normalized.strip_suffix(suffix) {
            normalized = stripped.to_string();
            break;
        }
    }

    if normalized.is_empty() || normalized == "ongoing" || normalized == "present" {
        None
    } else {
        Some(normalized)
    }
}

/// Slugify title text: lowercase, folded dashes, no parenthesized content,
/// no trailing open-range markers, era joined by hyphen, whitespace and
/// underscores as hyphens, `[a-z0-9-]` only, hyphen runs collapsed.
pub fn slugify(title: &str) -> String {
    let lower = fold_dashes(&title.trim().to_lowercase());
    let no_paren = PAREN_RE.replace_all(&lower, " ");
    let era = ERA_SPACE_RE.replace_all(&no_paren, "$1-$2");

    let mut out = String::with_capacity(era.len());
    for c in era.chars() {
        match c {
            'a'..='z' | '0'..='9' | '-' => out.push(c),
            c if c.is_whitespace() || c == '_' => out.push('-'),
            _ => {}
        }
    }

    let collapsed = collapse_hyphens(&out);
    let no_open = TRAILING_OPEN_RE.replace(&collapsed, "");
    collapse_hyphens(&no_open)
}

/// Generate the slug for a title and an optional year string.
///
/// The explicit `year` argument wins over a year embedded at the end of the
/// title. A title whose slug already ends with the year keeps it; a slug
/// *starting* with the year has it moved to the end instead of duplicated.
pub fn generate_slug(title: &str, year: Option<&str>) -> String {
    // Pull a trailing year out of the title so it is not slugged twice.
    let (rest, extracted) = extract_trailing_year(title);

    let effective = year
        .and_then(normalize_year)
        .or_else(|| extracted.as_deref().and_then(normalize_year));

    let slug = slugify(&rest);

    let Some(year) = effective else {
        return slug;
    };
    if slug.is_empty() {
        return year;
    }
    if slug == year || slug.ends_with(&format!("-{year}")) {
        return slug;
    }

    // A leading year moves to the end instead of appearing twice. Stripped
    // in a loop: a title can repeat its year, and one surviving copy at the
    // front would break idempotence.
    let prefix = format!("{year}-");
    let mut tail = slug.as_str();
    while let Some(stripped) = tail.strip_prefix(&prefix) {
        tail = stripped;
    }
    let composed = if tail.is_empty() || tail == year {
        year.clone()
    } else {
        format!("{tail}-{year}")
    };

    // Final cleanup pass against double hyphens at the join point.
    collapse_hyphens(&composed)
}

/// id -> slug for every record, in input order.
pub fn slug_map(records: &[EventRecord]) -> IndexMap<String, String> {
    records
        .iter()
        .map(|r| (r.id.clone(), generate_slug(&r.title, r.year.as_deref())))
        .collect()
}

/// Slugs shared by more than one record, mapped to the offending ids.
/// A non-empty result is a data defect the curator must disambiguate.
pub fn collisions(records: &[EventRecord]) -> IndexMap<String, Vec<String>> {
    let mut by_slug: IndexMap<String, Vec<String>> = IndexMap::new();
    for record in records {
        by_slug
            .entry(generate_slug(&record.title, record.year.as_deref()))
            .or_default()
            .push(record.id.clone());
    }
    by_slug.retain(|_, ids| ids.len() > 1);
    by_slug
}

#[derive(serde::Serialize)]
struct SlugsReport<'a> {
    records: usize,
    unique_slugs: usize,
    collisions: &'a IndexMap<String, Vec<String>>,
}

/// `hmap slugs` entry point.
#[instrument(skip_all)]
pub fn run(args: SlugsArgs, ctx: &AppContext) -> Result<()> {
    let config = load_config().unwrap_or_default();
    let input = args.input.unwrap_or_else(|| config.dataset.clone());

    let records = load_events(&input)?;
    let map = slug_map(&records);
    let clashes = collisions(&records);
    let unique_slugs = map.values().collect::<std::collections::HashSet<_>>().len();

    if args.json {
        let report =
            SlugsReport { records: records.len(), unique_slugs, collisions: &clashes };
        println!("{}", serde_json::to_string(&report).context("serialize slugs report")?);
    } else if !ctx.quiet {
        println!("{} records, {} unique slugs", records.len(), unique_slugs);
        for (slug, ids) in &clashes {
            println!(
                "  {} {} <- {}",
                "collision:".if_supports_color(Stream::Stdout, |s| s.red()),
                slug,
                ids.join(", ")
            );
        }
        if clashes.is_empty() {
            println!("{}", "no slug collisions".if_supports_color(Stream::Stdout, |s| s.green()));
        }
    }

    if let Some(output) = &args.output
        && !ctx.dry_run
    {
        save_json(output, &map)?;
        if !ctx.quiet {
            println!("Wrote slug map to {}", output.display());
        }
    }

    // `enforce_unique = false` downgrades collisions to report-only even
    // under --check, for datasets mid-cleanup.
    if args.check && config.slug.enforce_unique && !clashes.is_empty() {
        bail!("{} slug collision(s) found", clashes.len());
    }

    Ok(())
}
