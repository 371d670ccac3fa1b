//! Domain types shared by the embedding, vector and retrieval crates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type DocumentId = String;
pub type Meta = BTreeMap<String, String>;

/// Metadata key under which a corpus record's category is stored.
pub const CATEGORY_KEY: &str = "type";

/// One entry of a source corpus, before it is embedded.
///
/// - `id`: caller-supplied identifier; `None` falls back to a positional id
/// - `text`: the payload that gets embedded and returned as an example
/// - `category`: optional record type (e.g. "bar", "scatter")
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub id: Option<String>,
    pub text: String,
    pub category: Option<String>,
}

impl CorpusEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Self::default() }
    }

    pub fn with_id(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: Some(id.into()), text: text.into(), category: None }
    }

    /// True when the entry carries nothing worth indexing.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// An embedded document as stored inside a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub text: String,
    pub vector: Vec<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Meta>,
}

/// Ranked output of a nearest-neighbour query.
///
/// The four sequences are parallel: index `i` of each describes the same hit.
/// Ordered by ascending distance, ties broken by ascending id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub ids: Vec<DocumentId>,
    pub texts: Vec<String>,
    pub distances: Vec<f32>,
    pub metadatas: Vec<Option<Meta>>,
}

/// Borrowed view of a single hit in a [`QueryResult`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Example<'a> {
    pub id: &'a str,
    pub text: &'a str,
    pub distance: f32,
    pub metadata: Option<&'a Meta>,
}

impl QueryResult {
    pub fn push(&mut self, doc: &Document, distance: f32) {
        self.ids.push(doc.id.clone());
        self.texts.push(doc.text.clone());
        self.distances.push(distance);
        self.metadatas.push(doc.metadata.clone());
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Example<'_>> + '_ {
        (0..self.len()).map(move |i| Example {
            id: &self.ids[i],
            text: &self.texts[i],
            distance: self.distances[i],
            metadata: self.metadatas.get(i).and_then(Option::as_ref),
        })
    }
}
