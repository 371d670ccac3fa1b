//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars (nested keys separated by `__`, e.g. `APP_STORE__ROOT`).
//! `expand_path` expands `~` and `${VAR}` in configured paths; relative paths
//! are resolved against `base_dir` when one is set.
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Base for relative `store.root`, `corpus.path` and `metrics.path`;
    /// unset means the working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<String>,
    pub store: StoreSettings,
    pub embedding: EmbeddingSettings,
    pub corpus: CorpusSettings,
    pub retrieval: RetrievalSettings,
    pub metrics: MetricsSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Directory holding one sub-directory per collection.
    pub root: String,
    pub lock_timeout_ms: u64,
    pub lock_poll_ms: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self { root: "data/chroma_storage".to_string(), lock_timeout_ms: 10_000, lock_poll_ms: 25 }
    }
}

impl StoreSettings {
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    pub fn lock_poll(&self) -> Duration {
        Duration::from_millis(self.lock_poll_ms.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    pub kind: String,
    pub dimension: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self { kind: "hash".to_string(), dimension: 384 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusSettings {
    pub path: String,
    pub text_field: String,
    pub category_field: Option<String>,
    pub id_field: Option<String>,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            path: "data/annotations.json".to_string(),
            text_field: "general_figure_info".to_string(),
            category_field: Some("type".to_string()),
            id_field: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalSettings {
    pub collection: String,
    pub max_documents: usize,
    pub k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { collection: "c2c".to_string(), max_documents: 1000, k: 3 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSettings {
    pub path: String,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self { path: "evaluation/evaluation_metrics.json".to_string() }
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(&env_name)
    }

    pub fn load_for_env(env_name: &str) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file("config.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            other => tracing::debug!(env = other, "no environment-specific config file for this RUST_ENV"),
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.settings()?.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{key}': {e}")))
    }

    pub fn settings(&self) -> Result<Settings> {
        self.figment.extract().map_err(|e| Error::InvalidConfig(e.to_string()))
    }
}

impl Settings {
    pub fn base_dir(&self) -> PathBuf {
        self.base_dir.as_deref().map(expand_path).unwrap_or_default()
    }

    pub fn store_root(&self) -> PathBuf {
        resolve_with_base(&self.base_dir(), &self.store.root)
    }

    pub fn corpus_path(&self) -> PathBuf {
        resolve_with_base(&self.base_dir(), &self.corpus.path)
    }

    pub fn metrics_path(&self) -> PathBuf {
        resolve_with_base(&self.base_dir(), &self.metrics.path)
    }

    pub fn validate(&self) -> Result<()> {
        if self.embedding.dimension == 0 {
            return Err(Error::InvalidConfig("embedding.dimension must be positive".into()));
        }
        if self.store.lock_timeout_ms == 0 {
            return Err(Error::InvalidConfig("store.lock_timeout_ms must be positive".into()));
        }
        if self.corpus.text_field.trim().is_empty() {
            return Err(Error::InvalidConfig("corpus.text_field must not be empty".into()));
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() {
        p
    } else {
        base.join(p)
    }
}
