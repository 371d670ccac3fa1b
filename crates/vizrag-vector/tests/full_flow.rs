use std::sync::Arc;

use tempfile::TempDir;
use vizrag_core::types::{CorpusEntry, CATEGORY_KEY};
use vizrag_embed::HashEmbedder;
use vizrag_vector::CollectionStore;

fn annotations() -> Vec<CorpusEntry> {
    vec![
        CorpusEntry { id: None, text: "bar chart comparing revenue across regions".into(), category: Some("bar".into()) },
        CorpusEntry { id: None, text: "line chart of temperature over time".into(), category: Some("line".into()) },
        CorpusEntry { id: None, text: "   ".into(), category: None },
        CorpusEntry { id: None, text: "scatter plot of height versus weight".into(), category: Some("scatter".into()) },
        CorpusEntry { id: None, text: "histogram of exam scores".into(), category: Some("histogram".into()) },
    ]
}

#[test]
fn build_persist_reload_query() {
    let tmp = TempDir::new().expect("tmp");
    let embedder = Arc::new(HashEmbedder::new(256).unwrap());
    let store = CollectionStore::new(tmp.path(), embedder.clone());

    let created = store.get_or_create("c2c", &annotations(), 1000).expect("create");
    eprintln!("created {} documents at {}", created.len(), created.persisted_path().display());
    assert_eq!(created.len(), 4, "blank entry is skipped");
    let ids: Vec<&str> = created.ids().collect();
    assert_eq!(ids, vec!["doc_0", "doc_1", "doc_3", "doc_4"], "ids use the pre-filter position");
    assert_eq!(
        created.documents()[0].metadata.as_ref().and_then(|m| m.get(CATEGORY_KEY)).map(String::as_str),
        Some("bar")
    );
    assert!(created.persisted_path().ends_with("c2c/collection.json"));

    // A fresh store over the same root sees the same bits.
    let reopened = CollectionStore::new(tmp.path(), embedder);
    let loaded = reopened.open("c2c").expect("open").expect("exists");
    assert_eq!(loaded, created);

    let results = reopened.query(&loaded, "bar chart of revenue by region", 3).expect("query");
    assert_eq!(results.len(), 3);
    assert_eq!(results.ids[0], "doc_0");
    assert!(results.distances.windows(2).all(|w| w[0] <= w[1]));
    let top = results.iter().next().expect("top hit");
    assert!(top.text.contains("revenue"));

    assert_eq!(reopened.list().expect("list"), vec!["c2c".to_string()]);
}

#[test]
fn max_documents_limits_indexing() {
    let tmp = TempDir::new().expect("tmp");
    let store = CollectionStore::new(tmp.path(), Arc::new(HashEmbedder::new(64).unwrap()));
    let collection = store.get_or_create("limited", &annotations(), 3).expect("create");
    let ids: Vec<&str> = collection.ids().collect();
    assert_eq!(ids, vec!["doc_0", "doc_1"]);
}

#[test]
fn delete_then_rebuild() {
    let tmp = TempDir::new().expect("tmp");
    let store = CollectionStore::new(tmp.path(), Arc::new(HashEmbedder::new(64).unwrap()));
    store.get_or_create("c2c", &annotations(), 10).expect("create");

    assert!(store.delete("c2c").expect("delete"));
    assert!(!store.delete("c2c").expect("second delete is a no-op"));
    assert!(store.open("c2c").expect("open").is_none());

    let rebuilt = store.get_or_create("c2c", &[CorpusEntry::new("pie chart")], 10).expect("rebuild");
    assert_eq!(rebuilt.len(), 1);
}
