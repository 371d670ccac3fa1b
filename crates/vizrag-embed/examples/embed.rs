use vizrag_core::config::EmbeddingSettings;
use vizrag_embed::{cosine_distance, get_default_embedder};

fn main() -> anyhow::Result<()> {
    let embedder = get_default_embedder(&EmbeddingSettings::default())?;
    let texts = vec!["bar chart of sales by region".to_string(), "histogram of film ratings".to_string()];
    let embs = embedder.embed_batch(&texts)?;
    println!("B={} dim={} id={}", embs.len(), embedder.dim(), embedder.embedder_id());
    println!("distance={:.4}", cosine_distance(&embs[0], &embs[1]));
    Ok(())
}
