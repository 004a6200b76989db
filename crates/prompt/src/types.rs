//! Prompt types.

use physrag_core::TaskType;
use serde::{Deserialize, Serialize};

/// The five instruction templates, keyed by task type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSet {
    pub measurement: String,
    pub formula: String,
    pub comparison: String,
    pub theory: String,
    pub general: String,
}

impl TemplateSet {
    /// Select the instruction template for a task.
    pub fn for_task(&self, task: TaskType) -> &str {
        match task {
            TaskType::Measurement => &self.measurement,
            TaskType::Formula => &self.formula,
            TaskType::Comparison => &self.comparison,
            TaskType::Theory => &self.theory,
            TaskType::General => &self.general,
        }
    }
}

/// Partial template set read from `.physrag/prompts.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateOverrides {
    pub measurement: Option<String>,
    pub formula: Option<String>,
    pub comparison: Option<String>,
    pub theory: Option<String>,
    pub general: Option<String>,
}

/// A fully built prompt ready for the completion call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// System instruction
    pub system: String,

    /// User payload
    pub user: String,

    /// Metadata about the built prompt
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    /// Task the template was selected for
    pub task: TaskType,

    /// Whether the reset notice was prepended
    #[serde(rename = "resetNotice")]
    pub reset_notice: bool,

    /// Length of the context block in characters
    #[serde(rename = "contextChars")]
    pub context_chars: usize,
}
