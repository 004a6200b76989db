//! Command handlers for the physrag CLI.

pub mod ask;
pub mod chat;
pub mod ingest;
pub mod session;
pub mod stats;

pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use ingest::IngestCommand;
pub use stats::StatsCommand;
