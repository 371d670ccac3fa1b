use vizrag_core::config::Config;
use vizrag_vector::CollectionStore;

fn main() -> anyhow::Result<()> {
    vizrag_core::telemetry::init_tracing();
    let settings = Config::load()?.settings()?;
    let store = CollectionStore::from_settings(&settings)?;
    println!("store root: {}", store.root().display());
    for name in store.list()? {
        if let Some(collection) = store.open(&name)? {
            println!(
                "{name}: documents={} dim={} embedder={} created_at={}",
                collection.len(),
                collection.dimension(),
                collection.embedder_id(),
                collection.created_at()
            );
        }
    }
    Ok(())
}
