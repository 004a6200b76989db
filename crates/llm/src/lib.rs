//! Completion service integration for physrag.
//!
//! This crate provides a provider-agnostic abstraction for the language-model
//! completion collaborator.
//!
//! # Providers
//! - **Groq** / **OpenAI**: OpenAI-compatible chat completions (default: Groq)
//! - **Ollama**: Local LLM runtime
//!
//! # Example
//! ```no_run
//! use physrag_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = LlmRequest::new("QUESTION:\nWhat is the Higgs width?", "llama3.2")
//!     .with_temperature(0.0);
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{OllamaClient, OpenAiCompatClient};
pub use types::ProviderType;
