//! Embedding providers for passages and questions.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};
