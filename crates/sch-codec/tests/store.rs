//! Integration tests: store.
mod common;

use std::fs;
use std::sync::Arc;

use sch_codec::{CodecError, SaveOutcome, Store, StoreConfig, schematic_blueprint};
use sch_core::{Coordinate, Schematic, Vector};
use tempfile::TempDir;

use common::{Marker, registry};

fn store(dir: &std::path::Path) -> Store<Schematic> {
    Store::new(dir, schematic_blueprint(registry()))
}

fn tower(id: &str) -> Schematic {
    let mut schematic = Schematic::with_id(id, Coordinate::new(0.0, 64.0, 0.0));
    for y in 0..3 {
        schematic.add_modification(
            Arc::new(Marker::new("stone")),
            Vector::new(0.0, f64::from(y), 0.0),
        );
    }
    schematic
}

// ---------------------------------------------------------------------------
// save
// ---------------------------------------------------------------------------

#[test]
fn save_writes_id_named_pretty_json() {
    let dir = TempDir::new().unwrap();
    let store = store(dir.path());
    let outcome = store.save(&tower("tower")).unwrap();

    let path = dir.path().join("tower.json");
    assert_eq!(outcome, SaveOutcome::Written(path.clone()));
    let text = fs::read_to_string(path).unwrap();
    assert!(text.contains("\n  \"initial-position\""));
    assert!(text.ends_with('\n'));
}

#[test]
fn save_without_id_fails() {
    let dir = TempDir::new().unwrap();
    let err = store(dir.path())
        .save(&Schematic::new(Coordinate::ORIGIN))
        .unwrap_err();
    assert!(matches!(err, CodecError::MissingIdentifier { .. }));
    assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[test]
fn save_rejects_path_like_ids() {
    let dir = TempDir::new().unwrap();
    let err = store(dir.path()).save(&tower("../escape")).unwrap_err();
    assert!(matches!(err, CodecError::InvalidIdentifier(_)));
}

#[test]
fn save_keeps_existing_when_overwrite_disabled() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("tower.json"), "{}").unwrap();
    let store = store(dir.path()).with_config(StoreConfig::default().with_overwrite(false));
    let outcome = store.save(&tower("tower")).unwrap();
    assert!(matches!(outcome, SaveOutcome::Kept(_)));
    assert_eq!(fs::read_to_string(dir.path().join("tower.json")).unwrap(), "{}");
}

#[test]
fn save_all_reports_unsaveable_items() {
    let dir = TempDir::new().unwrap();
    let mut store = store(dir.path());
    store.insert(tower("a"));
    store.insert(Schematic::new(Coordinate::ORIGIN));
    store.insert(tower("b"));

    let report = store.save_all().unwrap();
    assert_eq!(report.written.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert!(!report.is_complete());
}

// ---------------------------------------------------------------------------
// load
// ---------------------------------------------------------------------------

#[test]
fn load_round_trips_saved_files() {
    let dir = TempDir::new().unwrap();
    let writer = store(dir.path());
    writer.save(&tower("north")).unwrap();
    writer.save(&tower("south")).unwrap();

    let mut reader = store(dir.path());
    let report = reader.load().unwrap();
    assert_eq!(report.loaded, 2);
    assert!(report.is_clean());
    let north = reader.get("north").unwrap();
    assert_eq!(north.len(), 3);
    assert_eq!(north.initial_position(), Coordinate::new(0.0, 64.0, 0.0));
    assert!(reader.get("east").is_none());
}

#[test]
fn load_skips_bad_files_and_keeps_going() {
    let dir = TempDir::new().unwrap();
    store(dir.path()).save(&tower("good")).unwrap();
    fs::write(dir.path().join("array.json"), "[1, 2, 3]").unwrap();
    fs::write(dir.path().join("garbage.json"), "not json").unwrap();
    fs::write(dir.path().join("shape.json"), r#"{ "modifications": [] }"#).unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let mut reader = store(dir.path());
    let report = reader.load().unwrap();
    assert_eq!(report.loaded, 1);
    assert_eq!(report.skipped.len(), 3);
    assert!(report.skipped.iter().any(|s| s.path.ends_with("array.json")));
    assert!(reader.get("good").is_some());
}

#[test]
fn load_creates_missing_directory() {
    let parent = TempDir::new().unwrap();
    let dir = parent.path().join("schematics");
    let mut reader = store(&dir);
    let report = reader.load().unwrap();
    assert_eq!(report.loaded, 0);
    assert!(dir.is_dir());
}

#[test]
fn load_leaves_missing_directory_when_configured() {
    let parent = TempDir::new().unwrap();
    let dir = parent.path().join("animations");
    let mut reader = store(&dir).with_config(StoreConfig::default().with_create_missing(false));
    reader.load().unwrap();
    assert!(!dir.exists());
}

#[test]
fn load_rejects_file_path() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("plain.json");
    fs::write(&file, "{}").unwrap();
    let err = store(&file).load().unwrap_err();
    assert!(matches!(err, CodecError::NotADirectory(_)));
}

#[test]
fn insert_replaces_same_id() {
    let dir = TempDir::new().unwrap();
    let mut store = store(dir.path());
    assert!(store.insert(tower("a")).is_none());
    let mut smaller = tower("a");
    smaller.remove_modification(0);
    assert!(store.insert(smaller).is_some());
    assert_eq!(store.len(), 1);
    assert_eq!(store.get("a").unwrap().len(), 2);
    assert!(store.remove("a").is_some());
    assert!(store.is_empty());
}
