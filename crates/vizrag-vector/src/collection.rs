use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use vizrag_core::types::Document;

use crate::schema::{PersistedCollection, PersistedDocument, COLLECTION_SCHEMA_VERSION};

/// A named, persisted set of embedded documents, loaded read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    name: String,
    documents: Vec<Document>,
    persisted_path: PathBuf,
    dimension: usize,
    embedder_id: String,
    corpus_fingerprint: String,
    created_at: DateTime<Utc>,
}

impl Collection {
    pub(crate) fn new(
        name: &str,
        documents: Vec<Document>,
        persisted_path: PathBuf,
        dimension: usize,
        embedder_id: &str,
        corpus_fingerprint: String,
    ) -> Self {
        Self {
            name: name.to_string(),
            documents,
            persisted_path,
            dimension,
            embedder_id: embedder_id.to_string(),
            corpus_fingerprint,
            created_at: Utc::now(),
        }
    }

    /// `None` when any stored vector fails to decode.
    pub(crate) fn from_persisted(persisted: PersistedCollection, persisted_path: PathBuf) -> Option<Self> {
        let documents = persisted.decode_documents()?;
        Some(Self {
            name: persisted.name,
            documents,
            persisted_path,
            dimension: persisted.dimension,
            embedder_id: persisted.embedder_id,
            corpus_fingerprint: persisted.corpus_fingerprint,
            created_at: persisted.created_at,
        })
    }

    pub(crate) fn to_persisted(&self) -> PersistedCollection {
        PersistedCollection {
            schema_version: COLLECTION_SCHEMA_VERSION,
            name: self.name.clone(),
            document_count: self.documents.len(),
            dimension: self.dimension,
            embedder_id: self.embedder_id.clone(),
            corpus_fingerprint: self.corpus_fingerprint.clone(),
            created_at: self.created_at,
            documents: self.documents.iter().map(PersistedDocument::from).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Documents in insertion order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(|d| d.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn persisted_path(&self) -> &Path {
        &self.persisted_path
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn embedder_id(&self) -> &str {
        &self.embedder_id
    }

    pub fn corpus_fingerprint(&self) -> &str {
        &self.corpus_fingerprint
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
