//! Ingest command handler.
//!
//! Builds the passage store, vector index and manifest from a directory of
//! plain-text documents.

use clap::Args;
use physrag_core::{config::AppConfig, AppResult};
use physrag_knowledge::{create_provider, ingest_directory, IngestOptions};
use physrag_knowledge::ingest::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use std::path::PathBuf;

/// Build the corpus from plain-text documents
#[derive(Args, Debug)]
pub struct IngestCommand {
    /// Directory of .txt / .md documents
    pub input: PathBuf,

    /// Passage window size in characters
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Overlap between consecutive windows in characters
    #[arg(long, default_value_t = DEFAULT_CHUNK_OVERLAP)]
    pub chunk_overlap: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IngestCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ingest command");
        tracing::debug!("Ingest options: {:?}", self);

        let embedder = create_provider(&config.embedding).await?;
        let options = IngestOptions {
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
        };

        let data_dir = config.data_dir();
        let stats = ingest_directory(&self.input, &data_dir, embedder.as_ref(), &options).await?;

        if self.json {
            let output = serde_json::json!({
                "dataDir": data_dir.display().to_string(),
                "sourcesCount": stats.sources_count,
                "skippedCount": stats.skipped_count,
                "passagesCount": stats.passages_count,
                "bytesProcessed": stats.bytes_processed,
                "durationSecs": stats.duration_secs,
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
        } else {
            println!(
                "Ingested {} sources ({} passages, {} bytes) in {:.2}s",
                stats.sources_count,
                stats.passages_count,
                stats.bytes_processed,
                stats.duration_secs
            );
            if stats.skipped_count > 0 {
                println!("Skipped {} empty documents", stats.skipped_count);
            }
            println!("Corpus written to {}", data_dir.display());
        }

        Ok(())
    }
}
