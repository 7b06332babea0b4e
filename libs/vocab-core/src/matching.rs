//! Answer and meaning comparison.

use serde::{Deserialize, Serialize};

/// Result of comparing a selected option to the correct answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub is_correct: bool,
    /// Normalized selected answer (for display).
    pub selected_normalized: String,
    /// Normalized correct answer (for display).
    pub correct_normalized: String,
}

/// Compare a selected option to the correct answer, ignoring case and
/// surrounding or repeated whitespace.
pub fn compare_answers(selected: &str, correct: &str) -> MatchResult {
    let selected_normalized = normalize_whitespace(selected);
    let correct_normalized = normalize_whitespace(correct);
    let is_correct = selected_normalized.to_lowercase() == correct_normalized.to_lowercase();

    MatchResult {
        is_correct,
        selected_normalized,
        correct_normalized,
    }
}

/// Canonical form used to detect two options that would both look correct.
///
/// Lowercases, collapses whitespace and drops trailing sentence punctuation,
/// so "To run." and "to  run" compare equal.
pub fn normalize_meaning(s: &str) -> String {
    let collapsed = normalize_whitespace(s).to_lowercase();
    collapsed
        .trim_end_matches(|c: char| matches!(c, '.' | '!' | '?' | ';' | ','))
        .trim_end()
        .to_string()
}

/// Whether two meanings are textually equivalent after normalization.
pub fn meanings_equivalent(a: &str, b: &str) -> bool {
    normalize_meaning(a) == normalize_meaning(b)
}

/// Normalize whitespace in a string (trim and collapse multiple spaces).
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
