//! Text embedding for the retrieval store.
//!
//! `HashEmbedder` is a deterministic feature-hashing embedder: every word and
//! word bigram is hashed with xxHash64 into a signed bucket, and the result is
//! L2-normalised. Same text in, same bits out, with no model files to load.
use anyhow::{anyhow, Result};
use std::hash::Hasher;
use twox_hash::XxHash64;

use vizrag_core::config::EmbeddingSettings;

pub use vizrag_core::traits::Embedder;

mod pool;
mod tokenize;

pub use pool::{cosine_distance, cosine_similarity, l2_normalize};
pub use tokenize::word_tokens;

const BIGRAM_WEIGHT: f32 = 0.5;

pub struct HashEmbedder {
    dim: usize,
    id: String,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(anyhow!("embedding dimension must be positive"));
        }
        Ok(Self { dim, id: format!("hash:xxh64:d{dim}") })
    }

    fn add_feature(&self, v: &mut [f32], feature: &str, weight: f32) {
        let mut hasher = XxHash64::with_seed(0);
        hasher.write(feature.as_bytes());
        let h = hasher.finish();
        let idx = (h % self.dim as u64) as usize;
        let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
        v[idx] += sign * weight;
    }
}

impl Embedder for HashEmbedder {
    fn embedder_id(&self) -> &str {
        &self.id
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let mut v = vec![0f32; self.dim];
        let tokens = tokenize::word_tokens(text);
        for token in &tokens {
            self.add_feature(&mut v, token, 1.0);
        }
        for pair in tokenize::bigrams(&tokens) {
            self.add_feature(&mut v, &pair, BIGRAM_WEIGHT);
        }
        l2_normalize(&mut v);
        Ok(v)
    }
}

pub fn get_default_embedder(settings: &EmbeddingSettings) -> Result<Box<dyn Embedder>> {
    match settings.kind.as_str() {
        "hash" => {
            let embedder = HashEmbedder::new(settings.dimension)?;
            tracing::debug!(embedder = embedder.embedder_id(), "using hash embedder");
            Ok(Box::new(embedder))
        }
        other => Err(anyhow!("unknown embedding kind '{other}'")),
    }
}
