//! Shared building blocks for the retrieval and metrics crates: configuration,
//! the error taxonomy, domain types, the `Embedder` seam, corpus loading and
//! bounded file locks.

pub mod config;
pub mod corpus;
pub mod error;
pub mod lock;
pub mod telemetry;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
