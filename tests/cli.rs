//! Integration tests driving the `hmap` binary end to end.

use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;

fn hmap() -> Command {
    Command::cargo_bin("hmap").expect("binary builds")
}

const DUPLICATED: &str = r#"[
  {
    "id": "ww2",
    "type": "war",
    "title": "World War II",
    "country": "DE",
    "pos": { "lat": 52.5, "lng": 13.4 },
    "desc_long": "The deadliest conflict in human history, fought between the Allied and Axis powers across every inhabited continent.",
    "year": "1939-1945",
    "casualties": 70000000,
    "radiusKm": 8000
  },
  {
    "id": "ww2_chatgpt",
    "type": "war",
    "title": "The World War II (1939-1945)",
    "country": "DE",
    "pos": { "lat": 52.5, "lng": 13.4 }
  },
  {
    "id": "hastings",
    "type": "war",
    "title": "Battle of Hastings",
    "country": "GB",
    "pos": { "lat": 50.9, "lng": 0.5 },
    "year": "1066"
  }
]"#;

#[test]
fn dedupe_collapses_duplicates_into_output() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.child("events.json");
    input.write_str(DUPLICATED).unwrap();
    let output = tmp.child("clean.json");

    hmap()
        .current_dir(tmp.path())
        .args(["dedupe", "events.json", "-o", "clean.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 records -> 2 kept, 1 dropped"))
        .stdout(predicate::str::contains("ww2_chatgpt"));

    output.assert(predicate::str::contains("\"ww2\""));
    output.assert(predicate::str::contains("\"ww2_chatgpt\"").not());
    output.assert(predicate::str::contains("\"hastings\""));
    // Input stays untouched when -o is given.
    input.assert(predicate::str::contains("ww2_chatgpt"));
}

#[test]
fn dedupe_dry_run_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.child("events.json");
    input.write_str(DUPLICATED).unwrap();

    hmap()
        .current_dir(tmp.path())
        .args(["--dry-run", "dedupe", "events.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DRY RUN"));

    input.assert(DUPLICATED);
}

#[test]
fn dedupe_json_report_is_machine_readable() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.child("events.json");
    input.write_str(DUPLICATED).unwrap();

    let assert = hmap()
        .current_dir(tmp.path())
        .args(["dedupe", "events.json", "-o", "clean.json", "--json"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let report: serde_json::Value = serde_json::from_str(stdout.lines().next().unwrap()).unwrap();
    assert_eq!(report["input"], 3);
    assert_eq!(report["kept"], 2);
    assert_eq!(report["dropped"][0]["id"], "ww2_chatgpt");
    assert_eq!(report["dropped"][0]["kept_id"], "ww2");
}

#[test]
fn validate_fails_on_legacy_types_and_fix_repairs_them() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.child("events.json");
    input
        .write_str(
            r#"[
  {
    "id": "rosetta",
    "type": "culture",
    "title": "Rosetta Stone Discovery",
    "country": "EG",
    "pos": { "lat": 31.4, "lng": 30.4 }
  }
]"#,
        )
        .unwrap();

    hmap()
        .current_dir(tmp.path())
        .args(["validate", "events.json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("legacy type `culture`"));

    hmap()
        .current_dir(tmp.path())
        .args(["validate", "events.json", "--fix", "-o", "fixed.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("remapped `culture` to `archaeology`"));

    tmp.child("fixed.json").assert(predicate::str::contains("\"archaeology\""));

    hmap()
        .current_dir(tmp.path())
        .args(["validate", "fixed.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 error(s)"));
}

#[test]
fn validate_output_requires_fix() {
    hmap()
        .args(["validate", "events.json", "-o", "out.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--fix"));
}

#[test]
fn slugs_check_fails_on_collisions() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.child("events.json");
    input
        .write_str(
            r#"[
  {
    "id": "a",
    "type": "fire",
    "title": "Great Fire of London",
    "country": "GB",
    "pos": { "lat": 51.5, "lng": -0.1 }
  },
  {
    "id": "b",
    "type": "fire",
    "title": "Great   Fire of London!",
    "country": "GB",
    "pos": { "lat": 51.5, "lng": -0.1 }
  }
]"#,
        )
        .unwrap();

    hmap()
        .current_dir(tmp.path())
        .args(["slugs", "events.json", "--check"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("collision"))
        .stderr(predicate::str::contains("1 slug collision(s) found"));
}

#[test]
fn slugs_writes_an_id_to_slug_map() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.child("events.json");
    input.write_str(DUPLICATED).unwrap();

    hmap()
        .current_dir(tmp.path())
        .args(["slugs", "events.json", "-o", "slugs.json", "--check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no slug collisions"));

    let map = tmp.child("slugs.json");
    map.assert(predicate::str::contains("\"hastings\": \"battle-of-hastings-1066\""));
    map.assert(predicate::str::contains("\"ww2\": \"world-war-ii-1939-1945\""));
}

#[test]
fn stats_summarizes_the_dataset() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.child("events.json");
    input.write_str(DUPLICATED).unwrap();

    hmap()
        .current_dir(tmp.path())
        .args(["stats", "events.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("war"))
        .stdout(predicate::str::contains("3"));
}

#[test]
fn missing_dataset_reports_its_path() {
    let tmp = TempDir::new().unwrap();

    hmap()
        .current_dir(tmp.path())
        .args(["dedupe", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.json"));
}

#[test]
fn init_writes_a_config_file() {
    let tmp = TempDir::new().unwrap();

    hmap()
        .current_dir(tmp.path())
        .args(["init"])
        .assert()
        .success();

    tmp.child("histmap.toml").assert(predicate::str::contains("dataset"));
}
