//! Answer fragments and their Markdown rendering.

use crate::history::ConversationTurn;
use physrag_core::TaskType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Heuristic label over answer quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    /// Map a score in `[0, 1]` to a level.
    pub fn from_score(score: f32) -> Self {
        if score >= 0.85 {
            Self::High
        } else if score >= 0.65 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One piece of an answer, stored as its own assistant turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Fragment {
    Text(String),
    /// Display math, without the `$$` delimiters
    Math(String),
    Image { alt: String, data_uri: String },
    /// Distinct source names, at most three
    Citation(Vec<String>),
    Confidence(ConfidenceLevel),
    Error(String),
}

impl Fragment {
    /// Render as chat Markdown.
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Math(math) => format!("$$\n{}\n$$", math),
            Self::Image { alt, data_uri } => format!("![{}]({})", alt, data_uri),
            Self::Citation(sources) => format!("**Sources:** {}", sources.join(", ")),
            Self::Confidence(level) => format!("**Confidence:** {}", level),
            Self::Error(message) => format!("**Error:** {}", message),
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image { .. })
    }
}

/// Ordered fragments produced for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub question: String,
    pub task: TaskType,
    pub fragments: Vec<Fragment>,
}

impl Answer {
    pub fn citations(&self) -> Option<&[String]> {
        self.fragments.iter().find_map(|f| match f {
            Fragment::Citation(sources) => Some(sources.as_slice()),
            _ => None,
        })
    }

    pub fn confidence(&self) -> Option<ConfidenceLevel> {
        self.fragments.iter().find_map(|f| match f {
            Fragment::Confidence(level) => Some(*level),
            _ => None,
        })
    }

    /// The user turn followed by one task-tagged assistant turn per fragment.
    pub fn into_turns(self) -> Vec<ConversationTurn> {
        let task = self.task;
        std::iter::once(ConversationTurn::user(self.question))
            .chain(
                self.fragments
                    .iter()
                    .map(|f| ConversationTurn::assistant(f.render(), task)),
            )
            .collect()
    }
}
