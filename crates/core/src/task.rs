//! Question task types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of task types a question can be classified into.
///
/// The task type selects the instruction template, the passage filter chain
/// and the post-processing applied to the completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Measurement,
    Formula,
    Comparison,
    Theory,
    General,
}

impl TaskType {
    /// Get the canonical task name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Measurement => "measurement",
            Self::Formula => "formula",
            Self::Comparison => "comparison",
            Self::Theory => "theory",
            Self::General => "general",
        }
    }

    /// Number of passages requested from the index for this task.
    pub fn retrieval_k(&self) -> usize {
        match self {
            Self::Comparison => 8,
            _ => 5,
        }
    }

    /// Theory and general answers are generated without retrieved context
    /// and never carry citations.
    pub fn uses_context(&self) -> bool {
        !matches!(self, Self::Theory | Self::General)
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_serde_tag() {
        for task in [TaskType::Measurement, TaskType::Formula, TaskType::General] {
            let json = serde_json::to_string(&task).unwrap();
            assert_eq!(json, format!("\"{}\"", task));
        }
    }

    #[test]
    fn test_retrieval_k() {
        assert_eq!(TaskType::Comparison.retrieval_k(), 8);
        assert_eq!(TaskType::Measurement.retrieval_k(), 5);
        assert_eq!(TaskType::General.retrieval_k(), 5);
    }

    #[test]
    fn test_uses_context() {
        assert!(TaskType::Measurement.uses_context());
        assert!(TaskType::Formula.uses_context());
        assert!(TaskType::Comparison.uses_context());
        assert!(!TaskType::Theory.uses_context());
        assert!(!TaskType::General.uses_context());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&TaskType::Comparison).unwrap();
        assert_eq!(json, "\"comparison\"");
        let back: TaskType = serde_json::from_str("\"theory\"").unwrap();
        assert_eq!(back, TaskType::Theory);
    }
}
