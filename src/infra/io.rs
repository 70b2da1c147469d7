//! Dataset JSON I/O, isolated at the pipeline edges.
//!
//! The pure transformations in `core` never touch the filesystem; commands
//! load here, transform in memory, and save here. Saves go through a
//! sibling temp file that replaces the target atomically, so a failed run
//! never leaves a half-written dataset behind.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::core::model::EventRecord;

/// Load the full event collection from a JSON array file.
pub fn load_events(path: &Path) -> Result<Vec<EventRecord>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open dataset {}", path.display()))?;

    let records: Vec<EventRecord> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse dataset {}", path.display()))?;

    debug!(records = records.len(), path = %path.display(), "loaded dataset");
    Ok(records)
}

/// Serialize any value as pretty JSON, atomically replacing `path`.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    // The temp file must live on the same filesystem as the target
    // for the rename to be atomic.
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file next to {}", path.display()))?;

    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, value).context("failed to serialize JSON")?;
        writer.write_all(b"\n").context("failed to write JSON")?;
        writer.flush().context("failed to flush JSON")?;
    }

    tmp.persist(path)
        .with_context(|| format!("failed to replace {}", path.display()))?;

    debug!(path = %path.display(), "saved");
    Ok(())
}

/// Write the full event collection back to disk.
pub fn save_events(path: &Path, records: &[EventRecord]) -> Result<()> {
    save_json(path, &records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{EventType, TypeTag};
    use tempfile::TempDir;

    #[test]
    fn round_trips_the_dataset() -> Result<()> {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("events.json");

        std::fs::write(
            &path,
            r#"[{
                "id": "lisbon_quake_area",
                "type": "earthquake",
                "title": "1755 Lisbon Earthquake",
                "country": "PT",
                "pos": { "lat": 36.0, "lng": -10.0 },
                "year": "1755",
                "casualties": 50000,
                "radiusKm": 300.0
            }]"#,
        )?;

        let records = load_events(&path)?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, TypeTag::Known(EventType::Earthquake));

        let out = tmp.path().join("out.json");
        save_events(&out, &records)?;
        assert_eq!(load_events(&out)?, records);

        Ok(())
    }

    #[test]
    fn unknown_types_survive_a_round_trip() -> Result<()> {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("events.json");

        std::fs::write(
            &path,
            r#"[{
                "id": "legacy",
                "type": "culture",
                "title": "Rosetta Stone Discovery",
                "country": "EG",
                "pos": { "lat": 31.4, "lng": 30.4 }
            }]"#,
        )?;

        let records = load_events(&path)?;
        assert_eq!(records[0].kind, TypeTag::Unknown("culture".to_string()));

        save_events(&path, &records)?;
        let raw = std::fs::read_to_string(&path)?;
        assert!(raw.contains("\"culture\""));

        Ok(())
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = load_events(Path::new("does-not-exist.json")).unwrap_err();
        assert!(format!("{err:#}").contains("does-not-exist.json"));
    }
}
