//! Interactive chat command.
//!
//! Reads one turn per line from stdin. The session history lives for the
//! duration of the process.

use super::session::{build_orchestrator, render_turns};
use clap::Args;
use physrag_chat::ConversationHistory;
use physrag_core::{config::AppConfig, AppResult};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Interactive session reading turns from stdin
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Do not print the input prompt
    #[arg(long)]
    pub quiet: bool,
}

impl ChatCommand {
    /// Execute the chat command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let orchestrator = build_orchestrator(config).await?;
        let mut history = ConversationHistory::new();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            if !self.quiet {
                eprint!("physrag> ");
                std::io::stderr().flush()?;
            }

            let Some(line) = lines.next_line().await? else {
                break;
            };

            let line = line.trim();
            if is_exit(line) {
                break;
            }
            if line.is_empty() {
                continue;
            }

            let start = history.len();
            let (updated, _) = orchestrator.chat(line, history).await;
            history = updated;

            println!("{}\n", render_turns(history.since(start)));
        }

        tracing::info!("Session ended after {} turns", history.len());
        Ok(())
    }
}

fn is_exit(line: &str) -> bool {
    matches!(line.to_lowercase().as_str(), "exit" | "quit")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_exit() {
        assert!(is_exit("exit"));
        assert!(is_exit("QUIT"));
        assert!(!is_exit("What is the width?"));
    }
}
