//! Answer checking and per-item attempt summaries.
//!
//! Everything here is a pure function of its inputs.

use crate::engine::types::Attempt;

/// Articles stripped from the front of an answer before comparing
/// (English and Portuguese).
const LEADING_ARTICLES: [&str; 6] = ["the", "a", "an", "o", "os", "as"];

/// Maximum edit distance still accepted as a typo.
const TYPO_TOLERANCE: usize = 1;

/// Lowercases, trims, drops one leading article and collapses whitespace.
pub fn normalize_input(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let mut words = lowered.split_whitespace().peekable();

    if let Some(first) = words.peek() {
        if LEADING_ARTICLES.contains(first) {
            let mut rest = lowered.split_whitespace().skip(1).peekable();
            // a lone article is the answer itself, keep it
            if rest.peek().is_some() {
                return rest.collect::<Vec<_>>().join(" ");
            }
        }
    }

    words.collect::<Vec<_>>().join(" ")
}

/// Edit distance counting insertions, deletions and substitutions of
/// Unicode scalar values.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j]
            } else {
                1 + prev[j].min(prev[j + 1]).min(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// True when the input matches any accepted answer exactly or within one
/// typo, after normalization.
pub fn is_correct_answer<S: AsRef<str>>(input: &str, accepted: &[S]) -> bool {
    let normalized = normalize_input(input);

    accepted.iter().any(|answer| {
        let expected = normalize_input(answer.as_ref());
        normalized == expected || levenshtein(&normalized, &expected) <= TYPO_TOLERANCE
    })
}

/// Consecutive correct attempts counted back from the most recent one.
pub fn calculate_streak(attempts: &[Attempt]) -> u32 {
    attempts.iter().rev().take_while(|a| a.correct).count() as u32
}

pub fn calculate_accuracy(attempts: &[Attempt]) -> f64 {
    if attempts.is_empty() {
        return 0.0;
    }
    let correct = attempts.iter().filter(|a| a.correct).count();
    correct as f64 / attempts.len() as f64
}

pub fn calculate_average_time(attempts: &[Attempt]) -> u64 {
    if attempts.is_empty() {
        return 0;
    }
    let total: u64 = attempts.iter().map(|a| a.response_time_ms).sum();
    (total as f64 / attempts.len() as f64).round() as u64
}
