//! Integration tests for the file-backed task store.

use media_renamer::models::media::MediaKind;
use media_renamer::models::task::{TaskRecord, TransferMapping};
use media_renamer::services::{FileTaskStore, TaskSink};
use media_renamer::Error;
use std::path::PathBuf;
use tempfile::TempDir;
use uuid::Uuid;

#[test]
fn test_record_round_trip_uses_camel_case() {
    let temp = TempDir::new().unwrap();
    let store = FileTaskStore::new(temp.path());
    let uuid = Uuid::new_v4();

    let mut record = TaskRecord::started(uuid, "/dl/Show Name", true);
    record.name = Some("Show Name".to_string());
    record.season_id = Some(2);
    record.tmdb_id = Some(42);
    record.tmdb_type = Some(MediaKind::Tv);
    store.write_record(&record).unwrap();

    assert_eq!(store.read_record(uuid).unwrap(), record);

    let raw =
        std::fs::read_to_string(temp.path().join("tasks").join(format!("{}.json", uuid))).unwrap();
    assert!(raw.contains("\"seasonId\": 2"));
    assert!(raw.contains("\"tmdbType\": \"tv\""));
    assert!(raw.contains("\"useAi\": true"));
}

#[test]
fn test_rewrite_replaces_record() {
    let temp = TempDir::new().unwrap();
    let store = FileTaskStore::new(temp.path());
    let uuid = Uuid::new_v4();

    let mut record = TaskRecord::started(uuid, "/dl/x", false);
    store.write_record(&record).unwrap();
    record.error = Some("no processable video files".to_string());
    store.write_record(&record).unwrap();

    assert!(store.read_record(uuid).unwrap().is_failed());
}

#[test]
fn test_log_lines_append_in_order() {
    let temp = TempDir::new().unwrap();
    let store = FileTaskStore::new(temp.path());
    let uuid = Uuid::new_v4();

    assert!(store.read_log(uuid).unwrap().is_empty());
    store.append_log(uuid, "[start] /dl/x").unwrap();
    store.append_log(uuid, "[failed] Input path is empty").unwrap();

    assert_eq!(
        store.read_log(uuid).unwrap(),
        vec!["[start] /dl/x", "[failed] Input path is empty"]
    );
}

#[test]
fn test_mapping_snapshot() {
    let temp = TempDir::new().unwrap();
    let store = FileTaskStore::new(temp.path());
    let uuid = Uuid::new_v4();
    assert_eq!(store.read_mapping(uuid).unwrap(), None);

    let mut mapping = TransferMapping::new();
    mapping.insert(
        PathBuf::from("/dl/Show/S01E01.mkv"),
        PathBuf::from("/lib/Show (2020)/Season1/S01E01.mkv"),
    );
    store.write_mapping_snapshot(uuid, &mapping).unwrap();

    let loaded = store.read_mapping(uuid).unwrap().unwrap();
    assert_eq!(
        loaded.get(&PathBuf::from("/dl/Show/S01E01.mkv")),
        Some(PathBuf::from("/lib/Show (2020)/Season1/S01E01.mkv").as_path())
    );
}

#[test]
fn test_unknown_task_is_not_found() {
    let temp = TempDir::new().unwrap();
    let store = FileTaskStore::new(temp.path());

    assert!(matches!(
        store.read_record(Uuid::new_v4()),
        Err(Error::TaskNotFound(_))
    ));
}
