use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;

use vizrag_core::error::{Error, Result};
use vizrag_core::traits::Embedder;
use vizrag_core::types::{CorpusEntry, Document, Meta, CATEGORY_KEY};

use crate::cancel::CancellationToken;

/// Positional id used when an entry carries none; `index` is the entry's
/// position before blank entries are filtered out.
pub fn positional_id(index: usize) -> String {
    format!("doc_{index}")
}

/// blake3 over the slice of the corpus that a collection is built from.
pub fn corpus_fingerprint(corpus: &[CorpusEntry]) -> String {
    let mut hasher = blake3::Hasher::new();
    for entry in corpus {
        for part in [entry.id.as_deref(), Some(entry.text.as_str()), entry.category.as_deref()] {
            match part {
                Some(s) => {
                    hasher.update(&(s.len() as u64).to_le_bytes());
                    hasher.update(s.as_bytes());
                }
                None => {
                    hasher.update(&u64::MAX.to_le_bytes());
                }
            }
        }
    }
    hasher.finalize().to_hex().to_string()
}

/// Embed every entry of `corpus` that has embeddable content, in order.
///
/// Blank entries, and entries the embedder maps to the zero vector (no
/// tokens, e.g. `"---"`), are skipped; the same content is rejected as a
/// query. Checks `cancel` before each document. Duplicate ids keep the first
/// indexed entry.
pub fn embed_documents(
    embedder: &dyn Embedder,
    corpus: &[CorpusEntry],
    cancel: &CancellationToken,
) -> Result<Vec<Document>> {
    let pb = ProgressBar::new(corpus.len() as u64);
    let style = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents ({percent}%)")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);

    let mut documents = Vec::with_capacity(corpus.len());
    let mut seen = HashSet::new();
    for (index, entry) in corpus.iter().enumerate() {
        if cancel.is_cancelled() {
            pb.abandon();
            tracing::info!(embedded = documents.len(), "indexing cancelled");
            return Err(Error::Cancelled);
        }
        pb.inc(1);
        if entry.is_blank() {
            continue;
        }
        let id = entry.id.clone().unwrap_or_else(|| positional_id(index));
        if seen.contains(&id) {
            tracing::warn!(%id, "duplicate document id; keeping the first entry");
            continue;
        }
        let vector = embedder.embed_text(&entry.text).map_err(Error::Embedding)?;
        if vector.len() != embedder.dim() {
            return Err(Error::DimensionMismatch { expected: embedder.dim(), actual: vector.len() });
        }
        if is_zero(&vector) {
            tracing::debug!(%id, "no embeddable content; skipping");
            continue;
        }
        seen.insert(id.clone());
        let metadata = entry.category.as_ref().map(|category| {
            let mut meta = Meta::new();
            meta.insert(CATEGORY_KEY.to_string(), category.clone());
            meta
        });
        documents.push(Document { id, text: entry.text.clone(), vector, metadata });
    }
    pb.finish_and_clear();
    Ok(documents)
}

/// The embedder's "no content" sentinel.
pub fn is_zero(vector: &[f32]) -> bool {
    vector.iter().all(|x| *x == 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_tracks_content() {
        let a = vec![CorpusEntry::new("bar chart")];
        let b = vec![CorpusEntry::new("line chart")];
        assert_eq!(corpus_fingerprint(&a), corpus_fingerprint(&a.clone()));
        assert_ne!(corpus_fingerprint(&a), corpus_fingerprint(&b));
        assert_ne!(corpus_fingerprint(&[CorpusEntry::new("ab")]), corpus_fingerprint(&[CorpusEntry::with_id("a", "b")]));
    }
}
