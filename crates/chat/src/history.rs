//! Session conversation history and cross-turn task tracking.

use physrag_core::TaskType;
use serde::{Deserialize, Serialize};

/// Speaker of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry in the conversation.
///
/// Assistant turns carry the task type of the question they answer; user
/// turns never do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<TaskType>,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            task: None,
        }
    }

    pub fn assistant(content: impl Into<String>, task: TaskType) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            task: Some(task),
        }
    }
}

/// Append-only sequence of turns for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the turns produced for one question, all at once.
    pub fn append(&mut self, turns: impl IntoIterator<Item = ConversationTurn>) {
        self.turns.extend(turns);
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Turns appended at or after `start`.
    pub fn since(&self, start: usize) -> &[ConversationTurn] {
        self.turns.get(start..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Task type recorded on the most recent assistant turn.
    ///
    /// This is the only state carried between questions: the prompt composer
    /// adds the reset notice when it differs from the next question's task.
    pub fn last_task(&self) -> Option<TaskType> {
        self.turns.iter().rev().find_map(|turn| turn.task)
    }
}
