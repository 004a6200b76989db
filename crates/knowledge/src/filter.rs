//! Passage filter pipeline: dedup, paper routing, task rules, context assembly.
//!
//! Every stage is a pure function over the previous stage's output. Rules are
//! fixed tables; matching is case-insensitive.

use crate::types::Passage;
use physrag_core::TaskType;
use std::collections::HashSet;

/// Passages sharing this many leading characters are duplicates.
pub const DEDUP_PREFIX_CHARS: usize = 300;

/// Maximum passages kept for formula questions.
pub const FORMULA_PASSAGE_LIMIT: usize = 3;

/// Experiment names that restrict retrieval to that experiment's papers.
/// Evaluated in order; the first one mentioned in the question wins.
const PAPER_ROUTES: &[&str] = &["atlas", "cms"];

/// Signal-strength markers that disqualify a measurement passage.
/// Includes both the Greek mu and the micro sign.
const MEASUREMENT_REJECT: &[&str] = &["signal strength", "\u{03bc}", "\u{00b5}", "\\hat{\\mu}"];

/// Terms a measurement passage must all contain.
const MEASUREMENT_REQUIRE: &[&str] = &["mass", "gev"];

/// Terms that disqualify a formula passage.
const FORMULA_REJECT: &[&str] = &["cross section", "branching ratio", "luminosity"];

/// Terms that, found together, mark a formula passage as a measurement.
const FORMULA_REJECT_JOINT: &[&str] = &["gev", "mass"];

/// Output of the pipeline for one question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredPassages {
    /// Surviving passages, in retrieval order
    pub passages: Vec<Passage>,

    /// Context block handed to the prompt composer
    pub context: String,
}

/// Keep the first passage per text prefix, preserving order.
pub fn deduplicate(passages: Vec<Passage>) -> Vec<Passage> {
    let mut seen = HashSet::new();
    passages
        .into_iter()
        .filter(|p| {
            let key: String = p.text.chars().take(DEDUP_PREFIX_CHARS).collect();
            seen.insert(key)
        })
        .collect()
}

/// Restrict passages to one experiment's papers when the question names it.
pub fn route_by_paper(question: &str, passages: Vec<Passage>) -> Vec<Passage> {
    let question = question.to_lowercase();

    match PAPER_ROUTES.iter().find(|paper| question.contains(*paper)) {
        Some(paper) => passages
            .into_iter()
            .filter(|p| p.source.to_lowercase().contains(paper))
            .collect(),
        None => passages,
    }
}

/// Whether a passage can support a mass measurement answer.
pub fn is_measurement_passage(text: &str) -> bool {
    let text = text.to_lowercase();
    !contains_any(&text, MEASUREMENT_REJECT) && contains_all(&text, MEASUREMENT_REQUIRE)
}

/// Whether a passage can support a formula answer.
pub fn is_formula_passage(text: &str) -> bool {
    let text = text.to_lowercase();
    !contains_any(&text, FORMULA_REJECT) && !contains_all(&text, FORMULA_REJECT_JOINT)
}

/// Apply the task-specific rule to the routed passages.
pub fn filter_for_task(task: TaskType, passages: Vec<Passage>) -> Vec<Passage> {
    match task {
        TaskType::Measurement => passages
            .into_iter()
            .filter(|p| is_measurement_passage(&p.text))
            .collect(),
        TaskType::Formula => passages
            .into_iter()
            .filter(|p| is_formula_passage(&p.text))
            .take(FORMULA_PASSAGE_LIMIT)
            .collect(),
        TaskType::Comparison | TaskType::Theory | TaskType::General => passages,
    }
}

/// Join passages as `[source]\ntext` blocks; empty for context-free tasks.
pub fn build_context(task: TaskType, passages: &[Passage]) -> String {
    if !task.uses_context() {
        return String::new();
    }

    passages
        .iter()
        .map(|p| format!("[{}]\n{}", p.source, p.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Ordered filter stages for one question.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassageFilterPipeline;

impl PassageFilterPipeline {
    pub fn new() -> Self {
        Self
    }

    /// Run all stages over retrieved passages.
    pub fn apply(&self, task: TaskType, question: &str, retrieved: Vec<Passage>) -> FilteredPassages {
        let retrieved_count = retrieved.len();
        let deduped = deduplicate(retrieved);
        let deduped_count = deduped.len();
        let routed = route_by_paper(question, deduped);
        let routed_count = routed.len();
        let passages = filter_for_task(task, routed);

        tracing::debug!(
            task = %task,
            retrieved = retrieved_count,
            deduped = deduped_count,
            routed = routed_count,
            kept = passages.len(),
            "Filtered passages"
        );

        let context = build_context(task, &passages);
        FilteredPassages { passages, context }
    }
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

fn contains_all(text: &str, needles: &[&str]) -> bool {
    needles.iter().all(|n| text.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(source: &str, text: &str) -> Passage {
        Passage::new(source, text)
    }

    #[test]
    fn test_deduplicate_by_prefix_keeps_earlier() {
        let prefix = "x".repeat(DEDUP_PREFIX_CHARS);
        let passages = vec![
            p("first.pdf", &format!("{}AAA", prefix)),
            p("other.pdf", "different"),
            p("second.pdf", &format!("{}BBB", prefix)),
        ];

        let result = deduplicate(passages);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].source, "first.pdf");
        assert_eq!(result[1].source, "other.pdf");
    }

    #[test]
    fn test_deduplicate_prefix_counts_characters() {
        // 299 multi-byte chars followed by a differing char still differ.
        let prefix = "μ".repeat(DEDUP_PREFIX_CHARS - 1);
        let passages = vec![p("a", &format!("{}1", prefix)), p("b", &format!("{}2", prefix))];
        assert_eq!(deduplicate(passages).len(), 2);
    }

    #[test]
    fn test_route_atlas() {
        let passages = vec![p("ATLAS_2023.pdf", "a"), p("CMS_2022.pdf", "b")];
        let routed = route_by_paper("What did ATLAS measure?", passages);
        assert_eq!(routed.len(), 1);
        assert_eq!(routed[0].source, "ATLAS_2023.pdf");
    }

    #[test]
    fn test_route_atlas_before_cms() {
        let passages = vec![p("cms.pdf", "a"), p("atlas.pdf", "b")];
        let routed = route_by_paper("Compare atlas and cms", passages);
        assert_eq!(routed, vec![p("atlas.pdf", "b")]);
    }

    #[test]
    fn test_route_unchanged_without_experiment() {
        let passages = vec![p("cms.pdf", "a"), p("atlas.pdf", "b")];
        assert_eq!(route_by_paper("What is the width?", passages.clone()), passages);
    }

    #[test]
    fn test_route_can_empty_the_set() {
        let routed = route_by_paper("cms result", vec![p("atlas.pdf", "a")]);
        assert!(routed.is_empty());
    }

    #[test]
    fn test_measurement_rejects_signal_strength() {
        assert!(!is_measurement_passage(
            "The signal strength is 1.02 and the mass is 125 GeV"
        ));
        assert!(!is_measurement_passage("μ = 1.0 at mass 125 GeV"));
        assert!(!is_measurement_passage("µ = 1.0 at mass 125 GeV"));
        assert!(!is_measurement_passage("\\hat{\\mu} fit, mass 125 GeV"));
    }

    #[test]
    fn test_measurement_requires_mass_and_gev() {
        assert!(is_measurement_passage("The Higgs MASS is 125.09 GeV"));
        assert!(!is_measurement_passage("The Higgs mass is 125.09"));
        assert!(!is_measurement_passage("Energy of 13 TeV, 125 GeV peak"));
    }

    #[test]
    fn test_formula_rules() {
        assert!(is_formula_passage("The Breit-Wigner width is Gamma"));
        assert!(!is_formula_passage("The cross section times branching ratio"));
        assert!(!is_formula_passage("Integrated luminosity of 139 fb-1"));
        assert!(!is_formula_passage("mass of 125 GeV"));
        assert!(is_formula_passage("a width of 4.1 MeV at the pole mass"));
    }

    #[test]
    fn test_formula_truncates_to_three() {
        let passages: Vec<Passage> = (0..6).map(|i| p(&format!("s{}", i), "resonance")).collect();
        let kept = filter_for_task(TaskType::Formula, passages);
        assert_eq!(kept.len(), FORMULA_PASSAGE_LIMIT);
        assert_eq!(kept[2].source, "s2");
    }

    #[test]
    fn test_comparison_unfiltered() {
        let passages = vec![p("a", "signal strength"), p("b", "luminosity")];
        assert_eq!(filter_for_task(TaskType::Comparison, passages.clone()), passages);
    }

    #[test]
    fn test_context_format() {
        let passages = vec![p("a.pdf", "one"), p("b.pdf", "two")];
        assert_eq!(
            build_context(TaskType::Comparison, &passages),
            "[a.pdf]\none\n[b.pdf]\ntwo"
        );
    }

    #[test]
    fn test_context_empty_for_theory_and_general() {
        let passages = vec![p("a.pdf", "one")];
        assert_eq!(build_context(TaskType::Theory, &passages), "");
        assert_eq!(build_context(TaskType::General, &passages), "");
    }

    #[test]
    fn test_pipeline_measurement() {
        let pipeline = PassageFilterPipeline::new();
        let retrieved = vec![
            p("atlas_mass.pdf", "m_H = 125.11 GeV mass"),
            p("atlas_mass.pdf", "m_H = 125.11 GeV mass"),
            p("atlas_mu.pdf", "signal strength mass GeV"),
            p("cms_mass.pdf", "mass 125.08 GeV"),
        ];

        let result = pipeline.apply(TaskType::Measurement, "What mass did ATLAS measure?", retrieved);
        assert_eq!(result.passages.len(), 1);
        assert_eq!(result.context, "[atlas_mass.pdf]\nm_H = 125.11 GeV mass");
    }

    #[test]
    fn test_pipeline_theory_keeps_passages_without_context() {
        let pipeline = PassageFilterPipeline::new();
        let result = pipeline.apply(
            TaskType::Theory,
            "Why is the vacuum metastable?",
            vec![p("a.pdf", "vacuum"), p("b.pdf", "stability")],
        );
        assert_eq!(result.passages.len(), 2);
        assert!(result.context.is_empty());
    }
}
