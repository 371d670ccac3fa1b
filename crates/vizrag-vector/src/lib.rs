//! Persistent embedding collections with exhaustive nearest-neighbour search.
//!
//! ```text
//! CorpusEntry[]
//!     │  get_or_create (once, under <root>/.locks/<name>.lock)
//!     ├──> Embedder ──> Document { id, text, vector }
//!     └──> <root>/<name>/collection.json   (temp file + rename)
//!
//! question ──> Embedder ──> cosine distance vs every document ──> QueryResult
//! ```

pub mod cancel;
pub mod collection;
pub mod schema;
pub mod search;
pub mod store;
pub mod table;
pub mod writer;

pub use cancel::CancellationToken;
pub use collection::Collection;
pub use store::CollectionStore;
