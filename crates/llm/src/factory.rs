//! LLM provider factory.
//!
//! Creates completion clients from a provider name, an optional endpoint and
//! an optional API key.

use crate::client::LlmClient;
use crate::providers::{OllamaClient, OpenAiCompatClient};
use crate::types::ProviderType;
use std::sync::Arc;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("groq", "openai", "ollama")
/// * `endpoint` - Optional custom base URL
/// * `api_key` - API key (required by groq and openai)
///
/// # Errors
/// Returns error if the provider is unknown or its API key is missing.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> Result<Arc<dyn LlmClient>, String> {
    let provider_type =
        ProviderType::parse(provider).ok_or_else(|| format!("Unknown provider: {}", provider))?;

    if !provider_type.requires_api_key() {
        let base_url = endpoint.unwrap_or(provider_type.default_endpoint());
        return Ok(Arc::new(OllamaClient::with_base_url(base_url)));
    }

    let key = api_key
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| format!("{} provider requires API key", provider_type.as_str()))?;

    let client = match endpoint {
        Some(base_url) => OpenAiCompatClient::with_base_url(provider_type, base_url, key),
        None => OpenAiCompatClient::new(provider_type, key),
    };
    Ok(Arc::new(client))
}
