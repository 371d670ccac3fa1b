use std::fs;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use tempfile::TempDir;
use vizrag_core::lock::{lock_path_for, FileLock};
use vizrag_metrics::{MetricsStore, EXECUTION_PASS_RATE, NUM_SUCCESS, NUM_TRIALS, QUESTION_DIVERSITY_SCORE};

fn store_in(dir: &TempDir) -> MetricsStore {
    MetricsStore::new(dir.path().join("evaluation").join("evaluation_metrics.json"))
}

#[test]
fn missing_file_reads_as_defaults() {
    let tmp = TempDir::new().unwrap();
    let store = store_in(&tmp);
    assert!(store.load().is_empty());
    assert_eq!(store.get(NUM_TRIALS, 0.0), 0.0);
    assert_eq!(store.get("anything", 3.5), 3.5);
}

#[test]
fn outcomes_update_counters_and_pass_rate() {
    let tmp = TempDir::new().unwrap();
    let store = store_in(&tmp);
    for success in [true, false, true, true, false, false, true] {
        store.record_outcome(success);
    }
    let metrics = store.load();
    assert_eq!(metrics[NUM_TRIALS], 7.0);
    assert_eq!(metrics[NUM_SUCCESS], 4.0);
    assert!((metrics[EXECUTION_PASS_RATE] - 4.0 / 7.0).abs() < 1e-12);
}

#[test]
fn first_failure_yields_zero_pass_rate() {
    let tmp = TempDir::new().unwrap();
    let snapshot = store_in(&tmp).record_outcome(false);
    assert_eq!(snapshot[NUM_TRIALS], 1.0);
    assert_eq!(snapshot.get(NUM_SUCCESS), None);
    assert_eq!(snapshot[EXECUTION_PASS_RATE], 0.0);
}

#[test]
fn set_and_increment_return_snapshots() {
    let tmp = TempDir::new().unwrap();
    let store = store_in(&tmp);
    let snapshot = store.set("latency_ms", 12.5);
    assert_eq!(snapshot["latency_ms"], 12.5);
    store.increment("retries");
    let snapshot = store.increment("retries");
    assert_eq!(snapshot["retries"], 2.0);
    assert_eq!(snapshot["latency_ms"], 12.5);
    assert_eq!(store.load(), snapshot);
}

#[test]
fn diversity_score_is_stored() {
    let tmp = TempDir::new().unwrap();
    let store = store_in(&tmp);
    store.record_outcome(true);
    let snapshot = store.record_diversity(0.42);
    assert_eq!(snapshot[QUESTION_DIVERSITY_SCORE], 0.42);
    assert_eq!(snapshot[NUM_TRIALS], 1.0);
}

#[test]
fn corrupt_file_is_treated_as_empty() {
    let tmp = TempDir::new().unwrap();
    let store = store_in(&tmp);
    fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    fs::write(store.path(), "{ not json").unwrap();

    assert!(store.load().is_empty());
    let snapshot = store.record_outcome(true);
    assert_eq!(snapshot[NUM_TRIALS], 1.0);
    assert_eq!(store.load()[EXECUTION_PASS_RATE], 1.0);
}

#[test]
fn concurrent_increments_are_not_lost() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("metrics.json");
    let barrier = Arc::new(Barrier::new(20));

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let store = MetricsStore::new(path);
                barrier.wait();
                store.increment("counter");
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(MetricsStore::new(&path).get("counter", 0.0), 20.0);
}

#[test]
fn held_lock_skips_persisting() {
    let tmp = TempDir::new().unwrap();
    let store = store_in(&tmp).with_lock_timeout(Duration::from_millis(50), Duration::from_millis(5));
    store.record_outcome(true);

    let _held = FileLock::acquire(&lock_path_for(store.path()), Duration::from_secs(1), Duration::from_millis(5)).unwrap();
    let snapshot = store.record_outcome(false);
    assert_eq!(snapshot[NUM_TRIALS], 2.0);

    let persisted = store.load();
    assert_eq!(persisted[NUM_TRIALS], 1.0);
    assert_eq!(persisted[EXECUTION_PASS_RATE], 1.0);
}

#[test]
fn counters_are_written_as_integers() {
    let tmp = TempDir::new().unwrap();
    let store = store_in(&tmp);
    for success in [true, false, true, true, false, false, true] {
        store.record_outcome(success);
    }
    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(raw[NUM_TRIALS], serde_json::json!(7));
    assert_eq!(raw[NUM_SUCCESS], serde_json::json!(4));
    assert!(raw[NUM_TRIALS].is_u64());
    assert!(raw[EXECUTION_PASS_RATE].is_f64());
}

#[test]
fn reads_files_written_by_evaluation_scripts() {
    let tmp = TempDir::new().unwrap();
    let store = store_in(&tmp);
    fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    fs::write(store.path(), r#"{"num_trials": 3, "num_success": 1, "execution_pass_rate": 0.3333333333333333}"#).unwrap();

    let snapshot = store.record_outcome(true);
    assert_eq!(snapshot[NUM_TRIALS], 4.0);
    assert_eq!(snapshot[NUM_SUCCESS], 2.0);
    assert_eq!(snapshot[EXECUTION_PASS_RATE], 0.5);
}
