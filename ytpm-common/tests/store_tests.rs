//! Integration tests for the snapshot store
//!
//! Covers:
//! - First run (no state file) loads as `None`
//! - Round-trip of every field, including non-ASCII titles
//! - Corrupt state surfaces as `CorruptState`, never as a cold start
//! - Atomic overwrite leaves no temp file behind

use chrono::{TimeZone, Utc};
use tempfile::TempDir;
use ytpm_common::models::watch_url;
use ytpm_common::{Entry, Error, Snapshot, SnapshotStore, Tier};

fn sample_snapshot() -> Snapshot {
    let taken_at = Utc.with_ymd_and_hms(2025, 6, 1, 8, 30, 15).unwrap()
        + chrono::Duration::microseconds(123_456);
    Snapshot {
        playlist_id: "PLO_DkCSmTKMNMgr-JKMDV2Sw2HW59LMvc".to_string(),
        playlist_title: "會員專區 🎬".to_string(),
        total_entry_count: 57,
        taken_at,
        entries: vec![
            Entry {
                position: 1,
                id: "dQw4w9WgXcQ".to_string(),
                title: "【限免】第58集 完整版".to_string(),
                url: watch_url("dQw4w9WgXcQ"),
                tier: Tier::Open,
                observed_at: taken_at,
            },
            Entry {
                position: 2,
                id: "9bZkp7q19f0".to_string(),
                title: "第57集 會員搶先看 \"quoted\" \\ slash".to_string(),
                url: watch_url("9bZkp7q19f0"),
                tier: Tier::Restricted,
                observed_at: taken_at,
            },
        ],
    }
}

#[test]
fn test_missing_state_is_first_run() {
    let temp_dir = TempDir::new().unwrap();
    let store = SnapshotStore::new(temp_dir.path().join("playlist_state.json"));
    assert!(store.load().unwrap().is_none());
}

#[test]
fn test_round_trip_preserves_all_fields() {
    let temp_dir = TempDir::new().unwrap();
    let store = SnapshotStore::new(temp_dir.path().join("playlist_state.json"));
    let snapshot = sample_snapshot();

    store.save(&snapshot).unwrap();
    let loaded = store.load().unwrap().expect("state should exist after save");

    assert_eq!(loaded, snapshot);
    assert_eq!(loaded.entries[0].title, "【限免】第58集 完整版");
}

#[test]
fn test_saved_file_keeps_multibyte_text_readable() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("playlist_state.json");
    let store = SnapshotStore::new(&path);

    store.save(&sample_snapshot()).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("限免"));
    assert!(content.contains("\"playlistId\""));
    assert!(content.contains("\"tier\": \"OPEN\""));
    assert!(content.contains("\"tier\": \"RESTRICTED\""));
}

#[test]
fn test_save_overwrites_previous_state() {
    let temp_dir = TempDir::new().unwrap();
    let store = SnapshotStore::new(temp_dir.path().join("playlist_state.json"));

    let first = sample_snapshot();
    store.save(&first).unwrap();

    let mut second = sample_snapshot();
    second.entries.truncate(1);
    second.total_entry_count = 58;
    store.save(&second).unwrap();

    assert_eq!(store.load().unwrap(), Some(second));
}

#[test]
fn test_save_leaves_no_temp_file() {
    let temp_dir = TempDir::new().unwrap();
    let store = SnapshotStore::new(temp_dir.path().join("playlist_state.json"));

    store.save(&sample_snapshot()).unwrap();

    assert!(temp_dir.path().join("playlist_state.json").exists());
    assert!(!temp_dir.path().join("playlist_state.json.tmp").exists());
}

#[test]
fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("state").join("nested").join("playlist_state.json");
    let store = SnapshotStore::new(&path);

    store.save(&sample_snapshot()).unwrap();
    assert!(path.exists());
}

#[test]
fn test_save_failure_is_write_error() {
    let temp_dir = TempDir::new().unwrap();
    // Parent "directory" is a regular file, so the write cannot succeed
    let blocker = temp_dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let store = SnapshotStore::new(blocker.join("playlist_state.json"));

    match store.save(&sample_snapshot()) {
        Err(Error::Write { path, .. }) => assert_eq!(path, blocker.join("playlist_state.json")),
        other => panic!("expected write error, got {:?}", other),
    }
}

#[test]
fn test_malformed_json_is_corrupt_state() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("playlist_state.json");
    std::fs::write(&path, b"{\"playlistId\": \"PL1\", \"entries\": [").unwrap();

    let store = SnapshotStore::new(&path);
    assert!(matches!(store.load(), Err(Error::CorruptState { .. })));
}

#[test]
fn test_empty_file_is_corrupt_state() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("playlist_state.json");
    std::fs::write(&path, b"").unwrap();

    let store = SnapshotStore::new(&path);
    assert!(matches!(store.load(), Err(Error::CorruptState { .. })));
}

#[test]
fn test_foreign_json_shape_is_corrupt_state() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("playlist_state.json");
    // Valid JSON, but not a snapshot encoding
    std::fs::write(
        &path,
        br#"{"playlist_id": "PL1", "videos": [{"id": "a", "is_member_only": true}]}"#,
    )
    .unwrap();

    let store = SnapshotStore::new(&path);
    assert!(matches!(store.load(), Err(Error::CorruptState { .. })));
}

#[test]
fn test_unknown_tier_is_corrupt_state() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("playlist_state.json");
    let store = SnapshotStore::new(&path);
    store.save(&sample_snapshot()).unwrap();

    let content = std::fs::read_to_string(&path)
        .unwrap()
        .replace("\"RESTRICTED\"", "\"MEMBERS\"");
    std::fs::write(&path, content).unwrap();

    assert!(matches!(store.load(), Err(Error::CorruptState { .. })));
}

#[test]
fn test_invariant_violation_is_corrupt_state() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("playlist_state.json");

    let mut snapshot = sample_snapshot();
    snapshot.entries[1].id = snapshot.entries[0].id.clone();
    std::fs::write(&path, serde_json::to_vec(&snapshot).unwrap()).unwrap();

    let store = SnapshotStore::new(&path);
    match store.load() {
        Err(Error::CorruptState { reason, .. }) => assert!(reason.contains("duplicate")),
        other => panic!("expected corrupt state, got {:?}", other),
    }
}

#[test]
fn test_invalid_utf8_is_corrupt_state() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("playlist_state.json");
    std::fs::write(&path, [0xff, 0xfe, 0x00, 0x7b]).unwrap();

    let store = SnapshotStore::new(&path);
    assert!(matches!(store.load(), Err(Error::CorruptState { .. })));
}
