use vizrag_core::config::EmbeddingSettings;
use vizrag_embed::{cosine_distance, get_default_embedder, Embedder, HashEmbedder};

#[test]
fn hash_embedder_shapes_and_determinism() {
    let embedder = get_default_embedder(&EmbeddingSettings::default()).expect("embedder");
    let texts = vec!["hello world".to_string(), "hello world".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), 384, "embedding dim is 384");

    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    // Bit-identical for the same input
    assert_eq!(v1, v2);
    let again = HashEmbedder::new(384).unwrap().embed_text("hello world").unwrap();
    assert_eq!(v1, &again);
}

#[test]
fn contentless_text_maps_to_zero_vector() {
    let embedder = HashEmbedder::new(16).unwrap();
    let v = embedder.embed_text(" \n\t ").unwrap();
    assert_eq!(v, vec![0.0; 16]);
    assert_eq!(embedder.embed_text("--- ?!").unwrap(), vec![0.0; 16], "punctuation has no tokens");
    assert_eq!(cosine_distance(&v, &embedder.embed_text("chart").unwrap()), 1.0);
}

#[test]
fn shared_vocabulary_is_closer() {
    let embedder = HashEmbedder::new(384).unwrap();
    let q = embedder.embed_text("bar chart of revenue").unwrap();
    let near = embedder.embed_text("a bar chart showing revenue per year").unwrap();
    let far = embedder.embed_text("scatter plot of penguin flipper length").unwrap();
    assert!(cosine_distance(&q, &near) < cosine_distance(&q, &far));
}

#[test]
fn distance_basics() {
    assert!(cosine_distance(&[1.0, 0.0], &[1.0, 0.0]).abs() < 1e-6);
    assert!((cosine_distance(&[1.0, 0.0], &[0.0, 1.0]) - 1.0).abs() < 1e-6);
    assert!((cosine_distance(&[1.0, 0.0], &[-1.0, 0.0]) - 2.0).abs() < 1e-6);
}

#[test]
fn unknown_kind_and_zero_dim_are_rejected() {
    let bad = EmbeddingSettings { kind: "bge-m3".to_string(), dimension: 384 };
    assert!(get_default_embedder(&bad).is_err());
    assert!(HashEmbedder::new(0).is_err());
}
