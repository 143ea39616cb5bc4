#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure guess scoring.

/// Returns whether `input` names the `target` word.
///
/// Comparison ignores letter case and nothing else: surrounding whitespace and
/// punctuation are significant. Any string is a legal guess.
#[must_use]
pub fn evaluate(input: &str, target: &str) -> bool {
    input.to_lowercase() == target.to_lowercase()
}
