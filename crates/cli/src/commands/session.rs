//! Startup wiring shared by the question-answering commands.

use physrag_chat::{ChatOrchestrator, CompletionInvoker, ConversationTurn, Role};
use physrag_core::config::{AppConfig, ProviderConfig};
use physrag_core::{AppError, AppResult};
use physrag_knowledge::{create_provider, Corpus, Retriever};
use physrag_llm::{create_client, LlmClient, OllamaClient, ProviderType};
use physrag_prompt::{load_templates, PromptComposer};
use std::sync::Arc;
use std::time::Duration;

/// Build the orchestrator from configuration.
///
/// Every failure here is a configuration error and aborts the command.
pub async fn build_orchestrator(config: &AppConfig) -> AppResult<ChatOrchestrator> {
    config.validate()?;

    let corpus = Corpus::open(&config.data_dir(), &config.embedding)?;
    let embedder = create_provider(&config.embedding).await?;
    let retriever = Retriever::new(embedder, corpus.index(), corpus.store());

    let composer = PromptComposer::new(load_templates(&config.workspace)?)?;
    let client = create_completion_client(config)?;
    let provider = client.provider_name().to_string();
    let invoker = CompletionInvoker::new(client, &config.model);

    tracing::info!(
        "Session ready: {} passages, provider {}, model {}",
        corpus.manifest().passage_count,
        provider,
        invoker.model()
    );

    Ok(ChatOrchestrator::new(retriever, composer, invoker))
}

/// Create the completion client for the active provider.
fn create_completion_client(config: &AppConfig) -> AppResult<Arc<dyn LlmClient>> {
    let provider = config.provider.to_lowercase();
    let endpoint = config.resolve_endpoint(&provider);

    if let Some(ProviderConfig::Ollama {
        timeout: Some(secs),
        ..
    }) = config.get_provider_config(&provider)
    {
        let base_url = endpoint
            .as_deref()
            .unwrap_or(ProviderType::Ollama.default_endpoint());
        let client = OllamaClient::with_base_url(base_url).with_timeout(Duration::from_secs(*secs))?;
        return Ok(Arc::new(client));
    }

    let api_key = config.resolve_api_key(&provider);
    create_client(&provider, endpoint.as_deref(), api_key.as_deref()).map_err(AppError::Config)
}

/// Render turns for the terminal: questions prefixed with `>`, fragments
/// separated by blank lines.
pub fn render_turns(turns: &[ConversationTurn]) -> String {
    turns
        .iter()
        .map(|turn| match turn.role {
            Role::User => format!("> {}", turn.content),
            Role::Assistant => turn.content.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
