//! Corpus access for the physics assistant.
//!
//! Holds the read-only passage store and flat L2 vector index, the embedding
//! providers used to query them, the passage filter pipeline, and the offline
//! ingest that builds a corpus from plain-text documents.

pub mod config;
pub mod corpus;
pub mod embeddings;
pub mod filter;
pub mod index;
pub mod ingest;
pub mod retriever;
pub mod store;
pub mod types;
pub mod vector_index;

#[cfg(test)]
mod tests;

pub use corpus::Corpus;
pub use embeddings::{create_provider, EmbeddingProvider};
pub use filter::{FilteredPassages, PassageFilterPipeline};
pub use index::FlatL2Index;
pub use ingest::{ingest_directory, IngestOptions};
pub use retriever::Retriever;
pub use store::PassageStore;
pub use types::{CorpusManifest, CorpusStats, IngestStats, Passage, RetrievalResult};
pub use vector_index::VectorIndex;
