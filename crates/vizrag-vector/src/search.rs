use vizrag_core::types::{Document, QueryResult};
use vizrag_embed::cosine_distance;

/// Exhaustive k-nearest-neighbour ranking by cosine distance.
///
/// Ascending distance, ties broken by ascending document id; `k` is clamped
/// to the number of documents.
pub fn rank(documents: &[Document], query: &[f32], k: usize) -> QueryResult {
    let mut scored: Vec<(f32, &Document)> =
        documents.iter().map(|doc| (cosine_distance(query, &doc.vector), doc)).collect();
    scored.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.id.cmp(&b.1.id)));
    scored.truncate(k.min(documents.len()));

    let mut result = QueryResult::default();
    for (distance, doc) in scored {
        result.push(doc, distance);
    }
    result
}
