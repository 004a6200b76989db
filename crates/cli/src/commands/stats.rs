//! Stats command handler.
//!
//! Shows what the corpus in the data directory holds.

use clap::Args;
use physrag_core::{config::AppConfig, AppResult};
use physrag_knowledge::Corpus;

/// Show corpus statistics
#[derive(Args, Debug)]
pub struct StatsCommand {
    /// List every source document
    #[arg(short, long)]
    pub detailed: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing stats command");
        tracing::debug!("Stats options: {:?}", self);

        let corpus = Corpus::open(&config.data_dir(), &config.embedding)?;
        let stats = corpus.stats();

        if self.json {
            let output = serde_json::json!({
                "passagesCount": stats.passages_count,
                "sourcesCount": stats.sources.len(),
                "sources": stats.sources,
                "embedding": {
                    "provider": stats.embedding.provider,
                    "model": stats.embedding.model,
                    "dimensions": stats.embedding.dimensions,
                },
                "createdAt": stats.created_at.to_rfc3339(),
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
            return Ok(());
        }

        println!("Corpus: {}", config.data_dir().display());
        println!("  Passages: {}", stats.passages_count);
        println!("  Sources: {}", stats.sources.len());
        println!(
            "  Embedding: {}/{} ({} dims)",
            stats.embedding.provider, stats.embedding.model, stats.embedding.dimensions
        );
        println!("  Created: {}", stats.created_at.format("%Y-%m-%d %H:%M:%S UTC"));

        if self.detailed {
            for source in &stats.sources {
                println!("    - {}", source);
            }
        }

        Ok(())
    }
}
