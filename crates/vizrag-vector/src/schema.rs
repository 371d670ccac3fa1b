use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use vizrag_core::types::{Document, Meta};

pub const COLLECTION_SCHEMA_VERSION: u32 = 1;
pub const COLLECTION_FILE_NAME: &str = "collection.json";
const MAX_NAME_LEN: usize = 63;

/// On-disk form of a collection. Self-describing: name, count and dimension
/// are recoverable from the file alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedCollection {
    pub schema_version: u32,
    pub name: String,
    pub document_count: usize,
    pub dimension: usize,
    pub embedder_id: String,
    pub corpus_fingerprint: String,
    pub created_at: DateTime<Utc>,
    pub documents: Vec<PersistedDocument>,
}

/// Vectors are stored as the hex of each `f32`'s bit pattern so they reload
/// bit-identical.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedDocument {
    pub id: String,
    pub text: String,
    pub vector: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Meta>,
}

impl From<&Document> for PersistedDocument {
    fn from(doc: &Document) -> Self {
        Self { id: doc.id.clone(), text: doc.text.clone(), vector: encode_vector(&doc.vector), metadata: doc.metadata.clone() }
    }
}

impl PersistedDocument {
    pub fn decode(self) -> Option<Document> {
        let vector = decode_vector(&self.vector)?;
        Some(Document { id: self.id, text: self.text, vector, metadata: self.metadata })
    }
}

impl PersistedCollection {
    /// Whether the header describes a complete collection named `name`.
    pub fn is_valid_for(&self, name: &str) -> bool {
        self.schema_version == COLLECTION_SCHEMA_VERSION
            && self.name == name
            && self.document_count == self.documents.len()
    }

    /// Decode all documents; `None` if any vector is malformed or has the wrong length.
    pub fn decode_documents(&self) -> Option<Vec<Document>> {
        self.documents
            .iter()
            .cloned()
            .map(|d| d.decode().filter(|doc| doc.vector.len() == self.dimension))
            .collect()
    }
}

pub fn encode_vector(vector: &[f32]) -> String {
    let mut out = String::with_capacity(vector.len() * 8);
    for v in vector {
        let _ = write!(out, "{:08x}", v.to_bits());
    }
    out
}

pub fn decode_vector(hex: &str) -> Option<Vec<f32>> {
    if hex.len() % 8 != 0 || !hex.is_ascii() {
        return None;
    }
    (0..hex.len())
        .step_by(8)
        .map(|i| u32::from_str_radix(&hex[i..i + 8], 16).ok().map(f32::from_bits))
        .collect()
}

pub fn is_valid_collection_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && !name.starts_with('.')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
