//! Prompt composer: selects the instruction template and renders the user payload.

use crate::types::{BuiltPrompt, BuiltPromptMetadata, TemplateSet};
use handlebars::Handlebars;
use physrag_core::{AppError, AppResult, TaskType};
use std::collections::HashMap;

/// Line prepended to the user payload when the task changed since the last answer.
pub const RESET_NOTICE: &str = "IMPORTANT: NEW TASK. Do NOT repeat previous answers.\n";

const USER_PAYLOAD_TEMPLATE: &str = "{{notice}}CONTEXT:\n{{context}}\n\nQUESTION:\n{{question}}";

const PAYLOAD_NAME: &str = "payload";

/// Builds the system instruction and user payload for a question.
pub struct PromptComposer {
    templates: TemplateSet,
    registry: Handlebars<'static>,
}

impl PromptComposer {
    /// Create a composer over a template set.
    pub fn new(templates: TemplateSet) -> AppResult<Self> {
        let mut registry = Handlebars::new();

        // Disable HTML escaping for plain text
        registry.register_escape_fn(handlebars::no_escape);

        registry
            .register_template_string(PAYLOAD_NAME, USER_PAYLOAD_TEMPLATE)
            .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

        Ok(Self {
            templates,
            registry,
        })
    }

    /// Compose the prompt for one question.
    ///
    /// `previous_task` is the task recorded on the most recent assistant
    /// answer; the reset notice is added when it differs from `task`.
    pub fn compose(
        &self,
        task: TaskType,
        context: &str,
        question: &str,
        previous_task: Option<TaskType>,
    ) -> AppResult<BuiltPrompt> {
        let reset_notice = previous_task.is_some_and(|previous| previous != task);
        if reset_notice {
            tracing::debug!(
                "Task switched from {:?} to {}, adding reset notice",
                previous_task,
                task
            );
        }

        let mut variables = HashMap::new();
        variables.insert(
            "notice",
            if reset_notice { RESET_NOTICE } else { "" }.to_string(),
        );
        variables.insert("context", context.to_string());
        variables.insert("question", question.to_string());

        let user = self
            .registry
            .render(PAYLOAD_NAME, &variables)
            .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

        Ok(BuiltPrompt {
            system: self.templates.for_task(task).to_string(),
            user,
            metadata: BuiltPromptMetadata {
                task,
                reset_notice,
                context_chars: context.chars().count(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composer() -> PromptComposer {
        PromptComposer::new(TemplateSet::default()).unwrap()
    }

    #[test]
    fn test_payload_layout() {
        let built = composer()
            .compose(
                TaskType::Measurement,
                "[atlas.pdf]\nm_H = 125.09 GeV",
                "What is the mass?",
                None,
            )
            .unwrap();

        assert_eq!(
            built.user,
            "CONTEXT:\n[atlas.pdf]\nm_H = 125.09 GeV\n\nQUESTION:\nWhat is the mass?"
        );
        assert!(built.system.contains("Measurement Extraction"));
        assert!(!built.metadata.reset_notice);
    }

    #[test]
    fn test_empty_context_layout() {
        let built = composer()
            .compose(TaskType::Theory, "", "Why is the vacuum metastable?", None)
            .unwrap();

        assert_eq!(built.user, "CONTEXT:\n\n\nQUESTION:\nWhy is the vacuum metastable?");
        assert_eq!(built.metadata.context_chars, 0);
    }

    #[test]
    fn test_reset_notice_on_task_switch() {
        let built = composer()
            .compose(TaskType::Formula, "", "Plot the resonance?", Some(TaskType::Measurement))
            .unwrap();

        assert!(built.user.starts_with(RESET_NOTICE));
        assert!(built.user.contains("\nCONTEXT:\n"));
        assert!(built.metadata.reset_notice);
    }

    #[test]
    fn test_no_reset_notice_for_same_task() {
        let built = composer()
            .compose(TaskType::Formula, "", "Plot it?", Some(TaskType::Formula))
            .unwrap();

        assert!(built.user.starts_with("CONTEXT:"));
    }

    #[test]
    fn test_no_html_escaping() {
        let built = composer()
            .compose(TaskType::General, "", "Is <m_H> & \"Γ\" fine?", None)
            .unwrap();

        assert!(built.user.ends_with("Is <m_H> & \"Γ\" fine?"));
    }

    #[test]
    fn test_braces_in_question_are_literal() {
        let built = composer()
            .compose(TaskType::General, "", "What is {{context}}?", None)
            .unwrap();

        assert!(built.user.ends_with("QUESTION:\nWhat is {{context}}?"));
    }
}
