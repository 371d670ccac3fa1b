//! Retrieval entry point for the generation pipeline.
//!
//! [`RetrievalService`] ties the pieces together: read the annotation corpus,
//! make sure the named collection exists, and return the nearest examples
//! for a question.
use std::path::{Path, PathBuf};

use vizrag_core::config::{expand_path, CorpusSettings, RetrievalSettings, Settings};
use vizrag_core::corpus::CorpusLoader;
use vizrag_core::error::{Error, Result};
use vizrag_core::types::QueryResult;
use vizrag_vector::CollectionStore;

pub use vizrag_core::types::Example;

pub struct RetrievalService {
    store: CollectionStore,
    retrieval: RetrievalSettings,
    loader: CorpusLoader,
    corpus_path: PathBuf,
}

impl RetrievalService {
    pub fn new(store: CollectionStore, retrieval: RetrievalSettings, corpus: &CorpusSettings) -> Self {
        Self { store, retrieval, loader: CorpusLoader::from_settings(corpus), corpus_path: expand_path(&corpus.path) }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let store = CollectionStore::from_settings(settings)?;
        let mut service = Self::new(store, settings.retrieval.clone(), &settings.corpus);
        service.corpus_path = settings.corpus_path();
        Ok(service)
    }

    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    pub fn settings(&self) -> &RetrievalSettings {
        &self.retrieval
    }

    pub fn corpus_path(&self) -> &Path {
        &self.corpus_path
    }

    /// Up to `k` examples from `collection` closest to `question`.
    ///
    /// The collection is built from the corpus at `corpus_path` the first
    /// time it is requested; afterwards the stored documents are served and
    /// the corpus is only read to detect drift. A corpus that cannot be
    /// loaded fails the call before any collection is created or queried.
    pub fn retrieve(&self, question: &str, corpus_path: &Path, collection: &str, k: usize) -> Result<QueryResult> {
        if question.trim().is_empty() {
            return Err(Error::InvalidQuery("question is empty".into()));
        }
        let corpus = self.loader.load(corpus_path)?;
        tracing::debug!(corpus = %corpus_path.display(), records = corpus.len(), "corpus loaded");

        let collection = self.store.get_or_create(collection, &corpus, self.retrieval.max_documents)?;
        let result = self.store.query(&collection, question, k)?;
        tracing::info!(collection = collection.name(), k, hits = result.len(), "retrieved examples");
        Ok(result)
    }

    /// [`retrieve`](Self::retrieve) with the configured corpus, collection and `k`.
    pub fn retrieve_default(&self, question: &str) -> Result<QueryResult> {
        self.retrieve(question, &self.corpus_path, &self.retrieval.collection, self.retrieval.k)
    }
}
