//! Integration tests for the record store

use std::collections::HashSet;
use std::fs;
use std::sync::Arc;
use std::thread;

use mdb_ingest::{EventStore, EventStoreConfig, Record};
use serde_json::{json, Value};
use tempfile::TempDir;

fn setup_store() -> (Arc<EventStore>, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = EventStore::open(EventStoreConfig::new(dir.path().join("data"))).unwrap();
    (Arc::new(store), dir)
}

fn record(value: Value) -> Record {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_appends_are_loaded_in_call_order() {
    let (store, _dir) = setup_store();

    let expected: Vec<Record> = (0..25)
        .map(|i| record(json!({"seq": i, "phone": format!("+1555{:04}", i)})))
        .collect();

    for (i, r) in expected.iter().enumerate() {
        assert_eq!(store.append(r.clone()).unwrap(), i + 1);
    }

    assert_eq!(store.load(), expected);
}

#[test]
fn test_latest_with_more_than_ten_records() {
    let (store, _dir) = setup_store();
    for i in 0..15 {
        store.append(record(json!({"seq": i}))).unwrap();
    }

    let all = store.load();
    let expected: Vec<Record> = all[5..].iter().rev().cloned().collect();

    assert_eq!(store.latest(10), expected);
}

#[test]
fn test_latest_with_fewer_than_ten_records() {
    let (store, _dir) = setup_store();
    for i in 0..4 {
        store.append(record(json!({"seq": i}))).unwrap();
    }

    let mut expected = store.load();
    expected.reverse();

    assert_eq!(store.latest(10), expected);
}

#[test]
fn test_clear_then_load_is_empty() {
    let (store, _dir) = setup_store();
    for i in 0..7 {
        store.append(record(json!({"seq": i}))).unwrap();
    }

    store.clear().unwrap();
    assert!(store.load().is_empty());

    // Clearing an empty collection is fine too
    store.clear().unwrap();
    assert!(store.load().is_empty());
}

#[test]
fn test_export_round_trips_to_load() {
    let (store, _dir) = setup_store();
    store
        .append(record(json!({"phone": "+1555", "nested": {"a": [1, 2, 3]}, "ok": true})))
        .unwrap();
    store.append(record(json!({"timestamp": "2024-01-01T00:00:00Z"}))).unwrap();

    let exported = store.export().unwrap();
    let parsed: Vec<Record> = serde_json::from_slice(&exported).unwrap();

    assert_eq!(parsed, store.load());
    // Pretty-printed with two-space indent
    assert!(String::from_utf8(exported).unwrap().contains("\n  {\n    \"phone\""));
}

#[test]
fn test_reopen_sees_persisted_records() {
    let dir = TempDir::new().unwrap();
    let config = EventStoreConfig::new(dir.path());

    {
        let store = EventStore::open(config.clone()).unwrap();
        store.append(record(json!({"seq": 1}))).unwrap();
        store.append(record(json!({"seq": 2}))).unwrap();
    }

    let reopened = EventStore::open(config).unwrap();
    assert_eq!(reopened.count(), 2);
}

#[test]
fn test_open_fails_when_data_dir_is_a_file() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("data");
    fs::write(&blocker, "not a directory").unwrap();

    let result = EventStore::open(EventStoreConfig::new(&blocker));
    assert!(result.is_err());
}

#[test]
fn test_concurrent_appends_lose_nothing() {
    let (store, _dir) = setup_store();
    let writers = 32;

    let handles: Vec<_> = (0..writers)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.append(record(json!({"writer": i}))).unwrap())
        })
        .collect();

    let counts: HashSet<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    // Every append saw a distinct collection length
    assert_eq!(counts, (1..=writers).collect::<HashSet<_>>());

    let writers_seen: HashSet<i64> = store
        .load()
        .iter()
        .map(|r| r.get("writer").and_then(Value::as_i64).unwrap())
        .collect();
    assert_eq!(writers_seen, (0..writers as i64).collect::<HashSet<_>>());
    assert_eq!(store.count(), writers);
}
