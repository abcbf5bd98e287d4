use std::fs;

use tempfile::TempDir;

use super::common::*;
use crate::tracker::domain::ApplicationId;
use crate::tracker::storage::{ApplicationStorage, JsonFileStorage, StorageError};
use crate::tracker::store::ApplicationStore;

#[test]
fn missing_file_loads_as_nothing() {
    let dir = TempDir::new().expect("temp dir");
    let storage = JsonFileStorage::new(dir.path().join("jobApplications.json"));

    assert!(storage.load().expect("load succeeds").is_none());
}

#[test]
fn blank_file_loads_as_nothing() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("jobApplications.json");
    fs::write(&path, "  \n").expect("write blank file");

    assert!(JsonFileStorage::new(path)
        .load()
        .expect("load succeeds")
        .is_none());
}

#[test]
fn saved_collection_reloads_field_for_field() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("jobApplications.json");

    let mut store = ApplicationStore::open(JsonFileStorage::new(&path));
    let mut acme = closing_on(
        new_application("Acme", "Platform Engineer", "ACME-42"),
        date(2025, 1, 10),
    );
    acme.notes = "referred by \"Sam\"".to_string();
    store.add(acme).expect("add succeeds");
    store
        .add(new_application("Globex", "Analyst", ""))
        .expect("add succeeds");

    let reloaded = ApplicationStore::open(JsonFileStorage::new(&path));

    assert!(reloaded.load_error().is_none());
    assert_eq!(reloaded.list_all(), store.list_all());
    let first = reloaded.get(ApplicationId(1)).expect("present");
    assert_eq!(first.closing_date, Some(date(2025, 1, 10)));
    assert_eq!(first.notes, "referred by \"Sam\"");
    assert_eq!(reloaded.next_id(), Some(ApplicationId(3)));
}

#[test]
fn file_uses_camel_case_fields_and_iso_dates() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("jobApplications.json");

    let mut store = ApplicationStore::open(JsonFileStorage::new(&path));
    store
        .add(closing_on(
            new_application("Acme", "Engineer", "A-1"),
            date(2025, 1, 10),
        ))
        .expect("add succeeds");
    store
        .add(new_application("Globex", "Analyst", "G-1"))
        .expect("add succeeds");

    let raw = fs::read_to_string(&path).expect("file written");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
    let records = value.as_array().expect("top-level array");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["id"], 1);
    assert_eq!(records[0]["referenceNumber"], "A-1");
    assert_eq!(records[0]["applicationDate"], "2024-12-15");
    assert_eq!(records[0]["closingDate"], "2025-01-10");
    assert!(records[1]["closingDate"].is_null());
    assert!(raw.contains("\n  {"), "file is indented");
}

#[test]
fn corrupt_file_is_reported_and_left_in_place() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("jobApplications.json");
    fs::write(&path, "[{ this is not json").expect("write corrupt file");

    let store = ApplicationStore::open(JsonFileStorage::new(&path));

    assert!(store.is_empty());
    assert_eq!(store.next_id(), Some(ApplicationId(1)));
    assert!(matches!(
        store.load_error(),
        Some(StorageError::Parse { .. })
    ));
    assert_eq!(
        fs::read_to_string(&path).expect("still present"),
        "[{ this is not json"
    );
}

#[test]
fn save_creates_parent_directories_and_leaves_no_temp_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("nested").join("data").join("apps.json");
    let storage = JsonFileStorage::new(&path);

    storage.save(&[]).expect("save succeeds");

    assert_eq!(fs::read_to_string(&path).expect("written"), "[]");
    let leftovers: Vec<String> = fs::read_dir(path.parent().expect("parent"))
        .expect("list dir")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "unexpected temp files: {leftovers:?}");
}

#[test]
fn save_fully_rewrites_previous_contents() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("apps.json");
    fs::write(&path, "x".repeat(4096)).expect("seed file");
    let storage = JsonFileStorage::new(&path);

    storage.save(&[]).expect("save succeeds");

    assert_eq!(fs::read_to_string(&path).expect("written"), "[]");
}

#[test]
fn lock_file_is_distinct_per_data_file() {
    let dir = TempDir::new().expect("temp dir");
    let json = JsonFileStorage::new(dir.path().join("apps.json"));
    let csv = JsonFileStorage::new(dir.path().join("apps.csv"));
    let named_lock = JsonFileStorage::new(dir.path().join("apps.lock"));

    assert_eq!(json.lock_path(), dir.path().join(".apps.json.lock"));
    assert_ne!(json.lock_path(), csv.lock_path());
    assert_ne!(named_lock.lock_path(), named_lock.path());

    json.save(&[]).expect("save succeeds");
    assert!(dir.path().join(".apps.json.lock").exists());
}

#[test]
fn data_file_with_lock_extension_round_trips() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("apps.lock");

    let mut store = ApplicationStore::open(JsonFileStorage::new(&path));
    store
        .add(new_application("Acme", "Engineer", "A-1"))
        .expect("add succeeds");

    let reloaded = ApplicationStore::open(JsonFileStorage::new(&path));
    assert!(reloaded.load_error().is_none());
    assert_eq!(reloaded.list_all(), store.list_all());
}
