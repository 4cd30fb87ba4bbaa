//! Answer matching
//!
//! Canonical answers look like `"Ответ:\nПушкин. Зачёт: ..."`. The short form
//! used for matching is the first sentence without the label and trailing
//! periods; the full form is the whole answer without the label.

/// Label that opens every canonical answer
const ANSWER_LABEL: &str = "Ответ";

/// Strip the leading `Ответ` label, an optional colon and surrounding whitespace
fn strip_label(answer: &str) -> &str {
    let trimmed = answer.trim_start();
    let rest = trimmed.strip_prefix(ANSWER_LABEL).unwrap_or(trimmed);
    let rest = rest.trim_start();
    rest.strip_prefix(':').unwrap_or(rest).trim()
}

/// Full answer text shown when the user gives up
pub fn full_answer(answer: &str) -> &str {
    strip_label(answer)
}

/// Short answer used for substring matching
pub fn short_answer(answer: &str) -> &str {
    let first_sentence = answer.split(". ").next().unwrap_or(answer);
    strip_label(first_sentence).trim_end_matches('.').trim_end()
}

/// Case-insensitive substring match of the short answer against an attempt
///
/// An answer whose short form is empty never matches, although a plain
/// substring test would accept any attempt for it.
pub fn is_correct(answer: &str, attempt: &str) -> bool {
    let short = short_answer(answer);
    if short.is_empty() {
        return false;
    }
    attempt.to_lowercase().contains(&short.to_lowercase())
}
