//! Annotation corpus loader.
//!
//! The corpus is a JSON array of records. Every record keeps its position so
//! positional ids stay stable: records that are not JSON objects are logged
//! and turned into blank entries, which the store later skips.
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::config::CorpusSettings;
use crate::error::{Error, Result};
use crate::types::CorpusEntry;

#[derive(Debug, Clone)]
pub struct CorpusLoader {
    text_field: String,
    category_field: Option<String>,
    id_field: Option<String>,
}

impl Default for CorpusLoader {
    fn default() -> Self {
        Self::from_settings(&CorpusSettings::default())
    }
}

impl CorpusLoader {
    pub fn new(text_field: impl Into<String>) -> Self {
        Self { text_field: text_field.into(), category_field: None, id_field: None }
    }

    pub fn from_settings(settings: &CorpusSettings) -> Self {
        Self {
            text_field: settings.text_field.clone(),
            category_field: settings.category_field.clone(),
            id_field: settings.id_field.clone(),
        }
    }

    pub fn with_category_field(mut self, field: impl Into<String>) -> Self {
        self.category_field = Some(field.into());
        self
    }

    pub fn with_id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = Some(field.into());
        self
    }

    pub fn load(&self, path: &Path) -> Result<Vec<CorpusEntry>> {
        let bytes = fs::read(path).map_err(|e| corpus_error(path, e.to_string()))?;
        let root: Value = serde_json::from_slice(&bytes).map_err(|e| corpus_error(path, e.to_string()))?;
        let Value::Array(records) = root else {
            return Err(corpus_error(path, "expected a JSON array of records".to_string()));
        };

        let mut entries = Vec::with_capacity(records.len());
        let mut malformed = 0usize;
        for (index, record) in records.iter().enumerate() {
            match self.parse_record(record) {
                Some(entry) => entries.push(entry),
                None => {
                    tracing::debug!(index, "skipping malformed corpus record");
                    malformed += 1;
                    entries.push(CorpusEntry::default());
                }
            }
        }
        tracing::info!(path = %path.display(), records = entries.len(), malformed, "loaded corpus");
        Ok(entries)
    }

    fn parse_record(&self, record: &Value) -> Option<CorpusEntry> {
        let object = record.as_object()?;
        let text = object.get(&self.text_field).map(render_text).unwrap_or_default();
        let category = self
            .category_field
            .as_ref()
            .and_then(|field| object.get(field))
            .map(render_text)
            .filter(|c| !c.is_empty());
        let id = self
            .id_field
            .as_ref()
            .and_then(|field| object.get(field))
            .map(render_text)
            .filter(|id| !id.trim().is_empty());
        Some(CorpusEntry { id, text, category })
    }
}

/// Strings are used verbatim; nested values are rendered as compact JSON.
fn render_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn corpus_error(path: &Path, reason: String) -> Error {
    Error::CorpusLoad { path: path.to_path_buf(), reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn nested_values_render_as_json() {
        assert_eq!(render_text(&serde_json::json!({"title": "x"})), r#"{"title":"x"}"#);
        assert_eq!(render_text(&serde_json::json!(3)), "3");
        assert_eq!(render_text(&Value::Null), "");
    }

    #[test]
    fn malformed_records_keep_their_slot() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "c.json", r#"[{"general_figure_info": "a"}, 42, {"general_figure_info": "b"}]"#);
        let entries = CorpusLoader::default().load(&path).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].text, "a");
        assert!(entries[1].is_blank());
        assert_eq!(entries[2].text, "b");
    }

    #[test]
    fn top_level_object_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "c.json", r#"{"general_figure_info": "a"}"#);
        assert!(matches!(CorpusLoader::default().load(&path), Err(Error::CorpusLoad { .. })));
    }
}
