//! Ask command handler.
//!
//! Answers one turn, which may hold several questions, and prints the
//! resulting history.

use super::session::{build_orchestrator, render_turns};
use clap::Args;
use physrag_chat::ConversationHistory;
use physrag_core::{config::AppConfig, AppError, AppResult};
use std::path::PathBuf;

/// Answer one turn of questions
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The turn to answer; several questions may be joined with '?'
    pub turn: Option<String>,

    /// Read the turn from a file
    #[arg(short, long, conflicts_with = "turn")]
    pub file: Option<PathBuf>,

    /// Output the history as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let input = self.read_turn()?;
        let orchestrator = build_orchestrator(config).await?;

        let (history, _) = orchestrator.chat(&input, ConversationHistory::new()).await;

        if self.json {
            let output = serde_json::to_string_pretty(&history)
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", output);
        } else {
            println!("{}", render_turns(history.turns()));
        }

        Ok(())
    }

    fn read_turn(&self) -> AppResult<String> {
        if let Some(turn) = &self.turn {
            return Ok(turn.clone());
        }

        match &self.file {
            Some(path) => Ok(std::fs::read_to_string(path)?),
            None => Err(AppError::Config("No question provided".to_string())),
        }
    }
}
