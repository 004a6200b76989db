//! Turning a raw completion into answer fragments.

use crate::answer::{ConfidenceLevel, Fragment};
use crate::plot::resonance_plot;
use physrag_core::{AppResult, TaskType};
use physrag_knowledge::Passage;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// `m_H = <value> \pm <error>`, also accepting a literal `±`.
static MASS_RESULT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"m_H\s*=\s*[\d.]+\s*(?:\\pm|±)\s*[\d.]+").expect("valid mass regex")
});

static MATH_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\$\$.*?\$\$").expect("valid math regex"));

const GEV_SUFFIX: &str = r"\ \mathrm{GeV}";

/// Maximum sources listed in a citation fragment.
pub const MAX_CITED_SOURCES: usize = 3;

/// Split after `.`, `!` or `?` when followed by whitespace.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }

        let Some(&(boundary, next)) = chars.peek() else {
            break;
        };
        if !next.is_whitespace() {
            continue;
        }

        sentences.push(&text[start..boundary]);
        start = boundary;
        while let Some(&(i, w)) = chars.peek() {
            if !w.is_whitespace() {
                break;
            }
            chars.next();
            start = i + w.len_utf8();
        }
    }

    sentences.push(&text[start..]);
    sentences
}

/// Drop repeated sentences, keeping first occurrences in order.
///
/// Sentences are compared after trimming and rejoined with single spaces.
/// Applying this twice gives the same result as applying it once.
pub fn dedup_sentences(text: &str) -> String {
    let mut seen = HashSet::new();
    split_sentences(text)
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty() && seen.insert(*s))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether `text` states a mass with an uncertainty.
pub fn has_mass_result(text: &str) -> bool {
    MASS_RESULT_RE.is_match(text)
}

/// Pull the first mass result out of `text`.
///
/// Returns the result with a GeV unit suffix and the remaining text with
/// every copy of the matched result removed. Inline `$` delimiters around
/// the first match and a `GeV` unit right after it go with it.
pub fn extract_measurement(text: &str) -> Option<(String, String)> {
    let found = MASS_RESULT_RE.find(text)?;
    let formula = format!("{}{}", found.as_str(), GEV_SUFFIX);

    let (start, end) = measurement_span(text, found.start(), found.end());
    let rest = format!("{}{}", &text[..start], &text[end..])
        .replace(found.as_str(), "")
        .trim()
        .to_string();
    Some((formula, rest))
}

/// Widen `start..end` over surrounding `$` and a trailing unit.
fn measurement_span(text: &str, start: usize, end: usize) -> (usize, usize) {
    let bytes = text.as_bytes();

    let mut start = start;
    while start > 0 && bytes[start - 1] == b'$' {
        start -= 1;
    }

    let mut end = end;
    while end < bytes.len() && bytes[end] == b'$' {
        end += 1;
    }

    let tail = text[end..].trim_start_matches([' ', '\t']);
    if let Some(after) = tail.strip_prefix("GeV") {
        if !after.starts_with(|c: char| c.is_alphanumeric()) {
            end = text.len() - after.len();
        }
    }

    (start, end)
}

/// Split `text` into text and `$$..$$` math fragments, in order.
///
/// Blank text between blocks is dropped.
pub fn split_math(text: &str) -> Vec<Fragment> {
    fn push_text(fragments: &mut Vec<Fragment>, segment: &str) {
        let segment = segment.trim();
        if !segment.is_empty() {
            fragments.push(Fragment::Text(segment.to_string()));
        }
    }

    let mut fragments = Vec::new();
    let mut last = 0;

    for block in MATH_BLOCK_RE.find_iter(text) {
        push_text(&mut fragments, &text[last..block.start()]);
        let delimited = block.as_str();
        let inner = &delimited[2..delimited.len() - 2];
        fragments.push(Fragment::Math(inner.trim().to_string()));
        last = block.end();
    }
    push_text(&mut fragments, &text[last..]);

    fragments
}

/// Heuristic answer confidence.
pub fn confidence_score(passage_count: usize, answer: &str) -> f32 {
    let mut score = 0.3 + 0.1 * passage_count.min(5) as f32;
    if has_mass_result(answer) {
        score += 0.4;
    }
    score.min(1.0)
}

/// Distinct source names in first-seen order, at most three.
pub fn cited_sources(passages: &[Passage]) -> Vec<String> {
    let mut seen = HashSet::new();
    passages
        .iter()
        .filter(|p| seen.insert(p.source.as_str()))
        .take(MAX_CITED_SOURCES)
        .map(|p| p.source.clone())
        .collect()
}

/// Builds answer fragments from a completion and its filtered passages.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnswerPostProcessor;

impl AnswerPostProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Produce the ordered fragments for one question.
    ///
    /// The confidence fragment is always last. Only plot rendering can fail.
    pub fn process(
        &self,
        task: TaskType,
        completion: &str,
        passages: &[Passage],
    ) -> AppResult<Vec<Fragment>> {
        let cleaned = dedup_sentences(completion);
        let mut fragments = Vec::new();

        match (task, extract_measurement(&cleaned)) {
            (TaskType::Measurement, Some((formula, rest))) => {
                fragments.push(Fragment::Math(formula));
                if !rest.is_empty() {
                    fragments.push(Fragment::Text(rest));
                }
            }
            (TaskType::Measurement, None) => {
                tracing::debug!("No mass result in completion, passing text through");
                fragments.extend(split_math(&cleaned));
            }
            _ => fragments.extend(split_math(&cleaned)),
        }

        if task == TaskType::Formula {
            fragments.push(resonance_plot()?);
        }

        if task.uses_context() {
            let sources = cited_sources(passages);
            if !sources.is_empty() {
                fragments.push(Fragment::Citation(sources));
            }
        }

        let score = confidence_score(passages.len(), &cleaned);
        let level = ConfidenceLevel::from_score(score);
        tracing::debug!(score, %level, "Scored answer");
        fragments.push(Fragment::Confidence(level));

        Ok(fragments)
    }
}
