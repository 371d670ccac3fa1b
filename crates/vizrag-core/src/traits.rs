/// Turns text into fixed-length vectors.
///
/// Implementations must be deterministic: the same text always yields the
/// same vector, bit for bit. Text without embeddable content (whitespace or
/// punctuation only) maps to the zero vector; such text is never indexed and
/// is rejected as a query.
pub trait Embedder: Send + Sync {
    /// Stable identifier for the embedder and its parameters (e.g. `hash:xxh64:d384`).
    fn embedder_id(&self) -> &str;
    fn dim(&self) -> usize;
    fn embed_text(&self, text: &str) -> anyhow::Result<Vec<f32>>;

    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed_text(t)).collect()
    }
}
