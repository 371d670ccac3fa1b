//! Durable pipeline metrics.
//!
//! A single JSON object maps metric names to numbers. Every mutation is a
//! read-modify-write of the whole file, serialized across processes by an
//! exclusive lock on `<file>.lock` and published with a temp-file rename.
//!
//! Metrics are telemetry: nothing here ever fails the caller. Unreadable or
//! corrupt files load as an empty snapshot and write failures are logged.
//!
//! Whole numbers are written as JSON integers (`"num_trials": 7`), matching
//! files written by the evaluation scripts; anything else is a float.
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::NamedTempFile;
use serde_json::{Map, Number, Value};
use thiserror::Error;

use vizrag_core::config::Settings;
use vizrag_core::lock::{lock_path_for, FileLock};

pub type Metrics = BTreeMap<String, f64>;

pub const NUM_TRIALS: &str = "num_trials";
pub const NUM_SUCCESS: &str = "num_success";
pub const EXECUTION_PASS_RATE: &str = "execution_pass_rate";
pub const QUESTION_DIVERSITY_SCORE: &str = "question_diversity_score";

const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_LOCK_POLL: Duration = Duration::from_millis(10);
// Largest magnitude below which every whole f64 is an exact i64.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

#[derive(Debug, Error)]
enum MetricsError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid metrics file: {0}")]
    Format(#[from] serde_json::Error),
}

impl MetricsError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }
}

/// `num_success / num_trials`, or 0 when there are no trials yet.
pub fn pass_rate(num_success: f64, num_trials: f64) -> f64 {
    if num_trials > 0.0 {
        num_success / num_trials
    } else {
        0.0
    }
}

#[derive(Debug, Clone)]
pub struct MetricsStore {
    path: PathBuf,
    lock_timeout: Duration,
    lock_poll: Duration,
}

impl MetricsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock_timeout: DEFAULT_LOCK_TIMEOUT, lock_poll: DEFAULT_LOCK_POLL }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.metrics_path())
            .with_lock_timeout(settings.store.lock_timeout(), settings.store.lock_poll())
    }

    pub fn with_lock_timeout(mut self, timeout: Duration, poll: Duration) -> Self {
        self.lock_timeout = timeout;
        self.lock_poll = poll;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current snapshot; empty when the file is absent, unreadable or corrupt.
    pub fn load(&self) -> Metrics {
        match self.try_load() {
            Ok(metrics) => metrics,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable metrics file");
                Metrics::new()
            }
        }
    }

    pub fn get(&self, name: &str, default: f64) -> f64 {
        self.load().get(name).copied().unwrap_or(default)
    }

    pub fn set(&self, name: &str, value: f64) -> Metrics {
        if !value.is_finite() {
            tracing::warn!(metric = name, value, "refusing to store a non-finite metric");
            return self.load();
        }
        self.update(|m| {
            m.insert(name.to_string(), value);
        })
    }

    pub fn increment(&self, name: &str) -> Metrics {
        self.update(|m| bump(m, name))
    }

    /// Count one pipeline run and refresh the pass rate, in one transaction.
    pub fn record_outcome(&self, success: bool) -> Metrics {
        self.update(|m| {
            bump(m, NUM_TRIALS);
            if success {
                bump(m, NUM_SUCCESS);
            }
            let trials = m.get(NUM_TRIALS).copied().unwrap_or(0.0);
            let successes = m.get(NUM_SUCCESS).copied().unwrap_or(0.0);
            m.insert(EXECUTION_PASS_RATE.to_string(), pass_rate(successes, trials));
        })
    }

    /// Store a diversity score computed elsewhere over past questions.
    pub fn record_diversity(&self, score: f64) -> Metrics {
        self.set(QUESTION_DIVERSITY_SCORE, score)
    }

    fn update(&self, mutate: impl FnOnce(&mut Metrics)) -> Metrics {
        let lock = FileLock::acquire(&lock_path_for(&self.path), self.lock_timeout, self.lock_poll);
        let mut metrics = self.load();
        mutate(&mut metrics);
        match lock {
            Ok(_guard) => {
                if let Err(e) = self.persist(&metrics) {
                    tracing::warn!(path = %self.path.display(), error = %e, "failed to save metrics");
                }
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "metrics update not persisted");
            }
        }
        metrics
    }

    fn try_load(&self) -> Result<Metrics, MetricsError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Metrics::new()),
            Err(e) => return Err(MetricsError::io(&self.path, e)),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn persist(&self, metrics: &Metrics) -> Result<(), MetricsError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| MetricsError::io(&dir, e))?;
        let data = serde_json::to_vec_pretty(&to_json(metrics))?;
        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| MetricsError::io(&dir, e))?;
        tmp.write_all(&data).map_err(|e| MetricsError::io(tmp.path(), e))?;
        tmp.as_file().sync_all().map_err(|e| MetricsError::io(tmp.path(), e))?;
        tmp.persist(&self.path).map_err(|e| MetricsError::io(&self.path, e.error))?;
        Ok(())
    }
}

fn bump(metrics: &mut Metrics, name: &str) {
    *metrics.entry(name.to_string()).or_insert(0.0) += 1.0;
}

fn to_json(metrics: &Metrics) -> Value {
    let object: Map<String, Value> = metrics
        .iter()
        .filter_map(|(name, value)| json_number(*value).map(|n| (name.clone(), Value::Number(n))))
        .collect();
    Value::Object(object)
}

fn json_number(value: f64) -> Option<Number> {
    if value.fract() == 0.0 && value.abs() < MAX_EXACT_INT {
        Some(Number::from(value as i64))
    } else {
        Number::from_f64(value)
    }
}
