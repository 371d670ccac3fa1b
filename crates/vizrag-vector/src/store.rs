use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use vizrag_core::config::Settings;
use vizrag_core::error::{Error, Result};
use vizrag_core::lock::FileLock;
use vizrag_core::traits::Embedder;
use vizrag_core::types::{CorpusEntry, QueryResult};
use vizrag_embed::get_default_embedder;

use crate::cancel::CancellationToken;
use crate::collection::Collection;
use crate::schema::is_valid_collection_name;
use crate::search::rank;
use crate::table;
use crate::writer::{corpus_fingerprint, embed_documents, is_zero};

const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_LOCK_POLL: Duration = Duration::from_millis(25);

/// Owns the collections persisted under one root directory.
pub struct CollectionStore {
    root: PathBuf,
    embedder: Arc<dyn Embedder>,
    lock_timeout: Duration,
    lock_poll: Duration,
}

impl CollectionStore {
    pub fn new(root: impl Into<PathBuf>, embedder: Arc<dyn Embedder>) -> Self {
        Self { root: root.into(), embedder, lock_timeout: DEFAULT_LOCK_TIMEOUT, lock_poll: DEFAULT_LOCK_POLL }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let embedder = get_default_embedder(&settings.embedding).map_err(Error::Embedding)?;
        Ok(Self::new(settings.store_root(), Arc::from(embedder))
            .with_lock_timeout(settings.store.lock_timeout(), settings.store.lock_poll()))
    }

    pub fn with_lock_timeout(mut self, timeout: Duration, poll: Duration) -> Self {
        self.lock_timeout = timeout;
        self.lock_poll = poll;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    /// Load collection `name`; `Ok(None)` when it has not been created.
    pub fn open(&self, name: &str) -> Result<Option<Collection>> {
        validate_name(name)?;
        table::read_collection(&self.root, name)
    }

    /// Return collection `name`, building it from `corpus` if it does not exist.
    ///
    /// An existing collection is returned unchanged and `corpus` is ignored.
    /// Creation takes at most `max_documents` entries, skips those without
    /// embeddable content, and publishes all documents at once.
    pub fn get_or_create(&self, name: &str, corpus: &[CorpusEntry], max_documents: usize) -> Result<Collection> {
        self.get_or_create_with_cancel(name, corpus, max_documents, &CancellationToken::new())
    }

    pub fn get_or_create_with_cancel(
        &self,
        name: &str,
        corpus: &[CorpusEntry],
        max_documents: usize,
        cancel: &CancellationToken,
    ) -> Result<Collection> {
        let selected = &corpus[..corpus.len().min(max_documents)];
        if let Some(existing) = self.open(name)? {
            self.note_reuse(&existing, selected);
            return Ok(existing);
        }

        let _lock = FileLock::acquire(&table::creation_lock_path(&self.root, name), self.lock_timeout, self.lock_poll)?;
        // Another process may have finished creating it while we waited.
        if let Some(existing) = self.open(name)? {
            tracing::info!(collection = name, "collection created concurrently; reusing it");
            return Ok(existing);
        }

        tracing::info!(collection = name, entries = selected.len(), "collection not found; creating it");
        let documents = embed_documents(self.embedder.as_ref(), selected, cancel)?;
        let collection = Collection::new(
            name,
            documents,
            table::collection_file(&self.root, name),
            self.embedder.dim(),
            self.embedder.embedder_id(),
            corpus_fingerprint(selected),
        );
        let path = table::write_collection(&self.root, &collection.to_persisted())?;
        tracing::info!(collection = name, documents = collection.len(), path = %path.display(), "collection persisted");
        Ok(collection)
    }

    /// The `k` documents closest to `question`, most similar first.
    pub fn query(&self, collection: &Collection, question: &str, k: usize) -> Result<QueryResult> {
        if question.trim().is_empty() {
            return Err(Error::InvalidQuery("question is empty".into()));
        }
        if collection.is_empty() {
            tracing::debug!(collection = collection.name(), "query against empty collection");
            return Ok(QueryResult::default());
        }
        let query = self.embedder.embed_text(question).map_err(Error::Embedding)?;
        if is_zero(&query) {
            return Err(Error::InvalidQuery(format!("no embeddable content in '{question}'")));
        }
        if query.len() != collection.dimension() {
            return Err(Error::DimensionMismatch { expected: collection.dimension(), actual: query.len() });
        }
        let result = rank(collection.documents(), &query, k);
        tracing::debug!(collection = collection.name(), k, hits = result.len(), "query answered");
        Ok(result)
    }

    /// Names of all persisted collections, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        table::list_collections(&self.root)
    }

    /// Remove collection `name`. Returns whether anything was deleted.
    pub fn delete(&self, name: &str) -> Result<bool> {
        validate_name(name)?;
        let _lock = FileLock::acquire(&table::creation_lock_path(&self.root, name), self.lock_timeout, self.lock_poll)?;
        let removed = table::remove_collection(&self.root, name)?;
        if removed {
            tracing::info!(collection = name, "collection deleted");
        }
        Ok(removed)
    }

    fn note_reuse(&self, existing: &Collection, selected: &[CorpusEntry]) {
        tracing::info!(collection = existing.name(), documents = existing.len(), "collection found");
        if existing.embedder_id() != self.embedder.embedder_id() {
            tracing::warn!(
                collection = existing.name(),
                stored = existing.embedder_id(),
                current = self.embedder.embedder_id(),
                "collection was built with a different embedder"
            );
        }
        if existing.corpus_fingerprint() != corpus_fingerprint(selected) {
            tracing::warn!(collection = existing.name(), "corpus changed since the collection was built; serving the stored documents");
        }
    }
}

fn validate_name(name: &str) -> Result<()> {
    if is_valid_collection_name(name) {
        Ok(())
    } else {
        Err(Error::InvalidCollectionName(name.to_string()))
    }
}
