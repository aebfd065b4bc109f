//! Small text helpers shared by prompt builders and length checks.

use serde::{Deserialize, Serialize};

/// Whitespace-separated word count.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Truncates to at most `max_chars` characters on a char boundary.
/// Appends `...` when something was cut and `ellipsis` is set.
pub fn truncate_chars(text: &str, max_chars: usize, ellipsis: bool) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((byte_idx, _)) => {
            let mut out = text[..byte_idx].to_string();
            if ellipsis {
                out.push_str("...");
            }
            out
        }
    }
}

/// Splits on `.`, `!` and `?`, dropping empty fragments.
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Readability {
    pub words_per_sentence: f64,
    pub avg_word_length: f64,
    pub total_words: usize,
    pub total_sentences: usize,
}

/// Basic readability metrics, rounded to two decimals.
pub fn readability(text: &str) -> Readability {
    let words: Vec<&str> = text.split_whitespace().collect();
    let sentences = split_sentences(text);

    if words.is_empty() || sentences.is_empty() {
        return Readability {
            words_per_sentence: 0.0,
            avg_word_length: 0.0,
            total_words: words.len(),
            total_sentences: sentences.len(),
        };
    }

    let total_chars: usize = words.iter().map(|w| w.chars().count()).sum();
    Readability {
        words_per_sentence: round2(words.len() as f64 / sentences.len() as f64),
        avg_word_length: round2(total_chars as f64 / words.len() as f64),
        total_words: words.len(),
        total_sentences: sentences.len(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
