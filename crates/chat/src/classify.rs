//! Keyword classification of questions into task types.

use physrag_core::TaskType;

/// Ordered rules; the first rule with a matching keyword wins.
const RULES: &[(TaskType, &[&str])] = &[
    (TaskType::Comparison, &["atlas", "cms", "4l", "four-lepton"]),
    (
        TaskType::Formula,
        &["breit", "resonance", "width", "gamma", "plot", "figure", "diagram"],
    ),
    (TaskType::Theory, &["why", "mechanism", "vacuum", "stability"]),
    (TaskType::Measurement, &["mass", "measured", "gev", "uncertainty"]),
];

/// Classify a question, falling back to [`TaskType::General`].
pub fn classify_task(question: &str) -> TaskType {
    let question = question.to_lowercase();

    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| question.contains(k)))
        .map(|(task, _)| *task)
        .unwrap_or(TaskType::General)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_rule() {
        assert_eq!(classify_task("How does CMS do it?"), TaskType::Comparison);
        assert_eq!(classify_task("Plot the Breit-Wigner"), TaskType::Formula);
        assert_eq!(classify_task("What is the mechanism?"), TaskType::Theory);
        assert_eq!(classify_task("What is the uncertainty?"), TaskType::Measurement);
        assert_eq!(classify_task("Who discovered it?"), TaskType::General);
    }

    #[test]
    fn test_comparison_beats_measurement() {
        assert_eq!(
            classify_task("What mass did ATLAS report?"),
            TaskType::Comparison
        );
    }

    #[test]
    fn test_formula_beats_theory_and_measurement() {
        assert_eq!(
            classify_task("Why is the width 4.1 MeV for this mass?"),
            TaskType::Formula
        );
    }

    #[test]
    fn test_substring_matching() {
        // "4l" is matched anywhere, as is "gev" inside "TeV/GeV".
        assert_eq!(classify_task("the H->ZZ->4l channel"), TaskType::Comparison);
        assert_eq!(classify_task("in TeV/GeV units"), TaskType::Measurement);
    }
}
