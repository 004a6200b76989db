//! Question answering pipeline for the physics assistant.
//!
//! A user turn is split into questions; each question is classified into a
//! task type, answered from retrieved passages by one completion call, and
//! post-processed into Markdown fragments that are appended to the session
//! history. The task recorded on the latest answer decides whether the next
//! prompt carries a reset notice.

pub mod answer;
pub mod classify;
pub mod completion;
pub mod history;
pub mod orchestrator;
pub mod plot;
pub mod postprocess;
pub mod split;

#[cfg(test)]
mod testing;

pub use answer::{Answer, ConfidenceLevel, Fragment};
pub use classify::classify_task;
pub use completion::{CompletionInvoker, DEFAULT_MODEL};
pub use history::{ConversationHistory, ConversationTurn, Role};
pub use orchestrator::ChatOrchestrator;
pub use postprocess::AnswerPostProcessor;
pub use split::split_questions;
