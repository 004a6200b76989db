//! Per-turn sequencing of the question pipeline.

use crate::answer::{Answer, Fragment};
use crate::classify::classify_task;
use crate::completion::CompletionInvoker;
use crate::history::ConversationHistory;
use crate::postprocess::AnswerPostProcessor;
use crate::split::split_questions;
use physrag_core::{AppResult, TaskType};
use physrag_knowledge::{PassageFilterPipeline, Retriever};
use physrag_prompt::PromptComposer;
use tracing::Instrument;

/// Drives split, classify, retrieve, filter, compose, complete and
/// post-process for every question in a turn.
///
/// All collaborators are immutable after construction, so one orchestrator
/// can serve any number of sessions.
pub struct ChatOrchestrator {
    retriever: Retriever,
    filter: PassageFilterPipeline,
    composer: PromptComposer,
    invoker: CompletionInvoker,
    postprocessor: AnswerPostProcessor,
}

impl ChatOrchestrator {
    pub fn new(retriever: Retriever, composer: PromptComposer, invoker: CompletionInvoker) -> Self {
        Self {
            retriever,
            filter: PassageFilterPipeline::new(),
            composer,
            invoker,
            postprocessor: AnswerPostProcessor::new(),
        }
    }

    /// Process one user turn.
    ///
    /// Questions run strictly in order; each sees the task recorded by the
    /// one before it. Returns the updated history and the cleared input.
    pub async fn chat(
        &self,
        input: &str,
        mut history: ConversationHistory,
    ) -> (ConversationHistory, String) {
        let questions = split_questions(input);
        tracing::info!("Processing turn with {} question(s)", questions.len());

        for question in questions {
            let answer = self.answer(&question, history.last_task()).await;
            history.append(answer.into_turns());
        }

        (history, String::new())
    }

    /// Answer a single question.
    ///
    /// A failure becomes one error fragment; nothing is returned partially.
    pub async fn answer(&self, question: &str, previous_task: Option<TaskType>) -> Answer {
        let task = classify_task(question);
        let span = tracing::info_span!("question", task = %task);

        async move {
            let fragments = match self.try_answer(question, task, previous_task).await {
                Ok(fragments) => fragments,
                Err(e) if e.is_fatal() => {
                    tracing::error!("Question failed on configuration: {}", e);
                    vec![Fragment::Error(e.to_string())]
                }
                Err(e) => {
                    tracing::warn!("Question failed: {}", e);
                    vec![Fragment::Error(e.to_string())]
                }
            };

            let answer = Answer {
                question: question.to_string(),
                task,
                fragments,
            };
            tracing::info!(
                confidence = answer.confidence().map(|c| c.as_str()),
                sources = answer.citations().map_or(0, |s| s.len()),
                "Answered question"
            );
            answer
        }
        .instrument(span)
        .await
    }

    async fn try_answer(
        &self,
        question: &str,
        task: TaskType,
        previous_task: Option<TaskType>,
    ) -> AppResult<Vec<Fragment>> {
        let retrieved = self.retriever.retrieve(question, task.retrieval_k()).await?;
        let filtered = self.filter.apply(task, question, retrieved.passages);

        let prompt = self
            .composer
            .compose(task, &filtered.context, question, previous_task)?;
        tracing::debug!(
            reset_notice = prompt.metadata.reset_notice,
            context_chars = prompt.metadata.context_chars,
            "Composed prompt"
        );

        let completion = self.invoker.invoke(&prompt).await?;
        self.postprocessor
            .process(task, &completion, &filtered.passages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::DEFAULT_MODEL;
    use crate::history::Role;
    use crate::testing::{physics_passages, retriever, ScriptedClient};
    use physrag_core::AppError;
    use physrag_prompt::{TemplateSet, RESET_NOTICE};
    use std::sync::Arc;

    async fn orchestrator(client: Arc<ScriptedClient>) -> ChatOrchestrator {
        ChatOrchestrator::new(
            retriever(physics_passages()).await,
            PromptComposer::new(TemplateSet::default()).unwrap(),
            CompletionInvoker::new(client, DEFAULT_MODEL),
        )
    }

    fn contents_after(history: &ConversationHistory, question: &str) -> Vec<String> {
        history
            .turns()
            .iter()
            .skip_while(|t| t.content != question)
            .skip(1)
            .take_while(|t| t.role == Role::Assistant)
            .map(|t| t.content.clone())
            .collect()
    }

    #[tokio::test]
    async fn test_multi_question_turn_tracks_task_switch() {
        let client = ScriptedClient::replying(&[
            r"m_H = 125.11 \pm 0.11",
            "Because the top Yukawa coupling is large.",
        ]);
        let chat = orchestrator(client.clone()).await;

        let (history, cleared) = chat
            .chat(
                "What is the Higgs boson mass? Why is the vacuum stable?",
                ConversationHistory::new(),
            )
            .await;

        assert!(cleared.is_empty());

        let requests = client.requests();
        assert_eq!(requests.len(), 2);
        assert!(!requests[0].prompt.starts_with(RESET_NOTICE));
        assert_eq!(
            requests[1].prompt,
            format!(
                "{}CONTEXT:\n\n\nQUESTION:\nWhy is the vacuum stable?",
                RESET_NOTICE
            )
        );

        let turns = history.turns();
        assert_eq!(turns[0], crate::history::ConversationTurn::user("What is the Higgs boson mass?"));
        assert_eq!(turns[1].content, "$$\nm_H = 125.11 \\pm 0.11\\ \\mathrm{GeV}\n$$");
        assert_eq!(turns[1].task, Some(TaskType::Measurement));
        assert_eq!(history.last_task(), Some(TaskType::Theory));

        let theory = contents_after(&history, "Why is the vacuum stable?");
        assert_eq!(
            theory,
            vec![
                "Because the top Yukawa coupling is large.".to_string(),
                "**Confidence:** Medium".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_same_task_across_turns_has_no_reset_notice() {
        let client = ScriptedClient::replying(&["One.", "Two."]);
        let chat = orchestrator(client.clone()).await;

        let (history, _) = chat
            .chat("Why is the vacuum stable?", ConversationHistory::new())
            .await;
        let (history, _) = chat.chat("Why is the top quark heavy?", history).await;

        let requests = client.requests();
        assert!(!requests[0].prompt.starts_with(RESET_NOTICE));
        assert!(!requests[1].prompt.starts_with(RESET_NOTICE));
        assert_eq!(history.len(), 6);
    }

    #[tokio::test]
    async fn test_failed_question_is_reported_and_later_questions_continue() {
        let client = ScriptedClient::new([
            Ok("Because.".to_string()),
            Err(AppError::Completion("rate limited".to_string())),
            Ok("It was announced in 2012.".to_string()),
        ]);
        let chat = orchestrator(client.clone()).await;

        let (history, _) = chat
            .chat(
                "Why is the vacuum stable? What is the Higgs boson mass? Who announced the discovery?",
                ConversationHistory::new(),
            )
            .await;

        assert_eq!(
            contents_after(&history, "What is the Higgs boson mass?"),
            vec!["**Error:** Completion error: rate limited".to_string()]
        );

        let failed = history
            .turns()
            .iter()
            .find(|t| t.content.starts_with("**Error:**"))
            .unwrap();
        assert_eq!(failed.task, Some(TaskType::Measurement));

        let requests = client.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests[2].prompt.starts_with(RESET_NOTICE));
        assert_eq!(history.last_task(), Some(TaskType::General));
        assert!(!contents_after(&history, "Who announced the discovery?").is_empty());
    }

    #[tokio::test]
    async fn test_formula_question_plots_and_caps_context() {
        let client = ScriptedClient::replying(&["$$P(E) = 1/((E^2-M^2)^2 + M^2\\Gamma^2)$$"]);
        let chat = orchestrator(client.clone()).await;

        let (history, _) = chat
            .chat("Plot the Breit-Wigner resonance width", ConversationHistory::new())
            .await;

        let requests = client.requests();
        assert!(requests[0].prompt.matches(".pdf]\n").count() <= 3);

        let answer = contents_after(&history, "Plot the Breit-Wigner resonance width?");
        let images = answer
            .iter()
            .filter(|c| c.starts_with("![Higgs Resonance](data:image/svg+xml;base64,"))
            .count();
        assert_eq!(images, 1);
        assert!(answer[0].starts_with("$$\n"));
        assert!(answer.last().unwrap().starts_with("**Confidence:**"));
    }

    #[tokio::test]
    async fn test_comparison_routes_to_named_experiment() {
        let client = ScriptedClient::replying(&["ATLAS reports 125.11 GeV."]);
        let chat = orchestrator(client.clone()).await;

        let (history, _) = chat
            .chat("How do the ATLAS results compare", ConversationHistory::new())
            .await;

        let prompt = &client.requests()[0].prompt;
        assert!(prompt.contains("[ATLAS_mass.pdf]\n"));
        assert!(prompt.contains("[ATLAS_mu.pdf]\n"));
        assert!(!prompt.contains("CMS_mass.pdf"));

        let answer = contents_after(&history, "How do the ATLAS results compare?");
        let sources = answer
            .iter()
            .find(|c| c.starts_with("**Sources:**"))
            .unwrap();
        assert!(sources.contains("ATLAS_mass.pdf"));
        assert!(sources.contains("ATLAS_mu.pdf"));
        assert!(!sources.contains("CMS"));
    }

    #[tokio::test]
    async fn test_empty_turn_changes_nothing() {
        let client = ScriptedClient::replying(&[]);
        let chat = orchestrator(client.clone()).await;

        let (history, cleared) = chat.chat("   ", ConversationHistory::new()).await;
        assert!(history.is_empty());
        assert!(cleared.is_empty());
        assert!(client.requests().is_empty());
    }
}
