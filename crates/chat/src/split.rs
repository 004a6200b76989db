//! Splitting one user turn into discrete questions.

/// Split `text` on question marks, trimming each part and terminating every
/// non-empty part with `?`.
///
/// Trailing text without a question mark becomes a question too.
pub fn split_questions(text: &str) -> Vec<String> {
    text.split('?')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| format!("{}?", part))
        .collect()
}
