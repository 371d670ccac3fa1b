//! Retrieve examples for a fixed question using `config.toml` / `APP_*` settings,
//! then record the run in the metrics file.
use vizrag_core::config::Config;
use vizrag_core::types::CATEGORY_KEY;
use vizrag_metrics::{MetricsStore, EXECUTION_PASS_RATE, NUM_TRIALS};
use vizrag_rag::RetrievalService;

const QUESTION: &str = "Show a bar chart of total sales per region";

fn main() -> anyhow::Result<()> {
    vizrag_core::telemetry::init_tracing();
    let settings = Config::load()?.settings()?;
    let service = RetrievalService::from_settings(&settings)?;
    let metrics = MetricsStore::from_settings(&settings);

    let outcome = service.retrieve_default(QUESTION);
    let snapshot = metrics.record_outcome(outcome.is_ok());
    let result = outcome?;

    println!("question: {QUESTION}");
    for (rank, example) in result.iter().enumerate() {
        let kind = example.metadata.and_then(|m| m.get(CATEGORY_KEY)).map(String::as_str).unwrap_or("-");
        println!("{}. [{}] d={:.4} type={} {}", rank + 1, example.id, example.distance, kind, example.text);
    }
    println!(
        "trials={} pass_rate={:.3}",
        snapshot.get(NUM_TRIALS).copied().unwrap_or(0.0),
        snapshot.get(EXECUTION_PASS_RATE).copied().unwrap_or(0.0)
    );
    Ok(())
}
