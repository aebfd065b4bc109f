//! ATS keyword coverage: deterministic, no LLM call.
//!
//! Extracts the most frequent meaningful words from the job profile and checks
//! which of them appear in the CV. Complements the LLM critique with a number
//! the user can track between CV revisions.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Keywords considered from the job profile.
const MAX_JOB_KEYWORDS: usize = 40;

/// Whole alphabetic words of 3+ letters; mixed tokens like `python3` or `B2B` are dropped.
static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z]{3,}\b").expect("word pattern is valid"));

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "her", "was", "one",
    "our", "out", "day", "get", "has", "him", "his", "how", "its", "may", "new", "now", "old",
    "see", "two", "who", "boy", "did", "man", "men", "put", "say", "she", "too", "use", "with",
    "have", "this", "will", "your", "from", "they", "know", "want", "been", "good", "much",
    "some", "time", "very", "when", "come", "here", "just", "like", "long", "make", "many",
    "over", "such", "take", "than", "them", "well", "were", "that", "what", "which", "their",
    "about", "would", "there", "into", "also", "more", "other", "these", "any",
];

/// A keyword with its number of occurrences in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub keyword: String,
    pub frequency: u32,
}

/// Coverage of the job profile's top keywords by the CV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtsReport {
    pub coverage_percent: u32, // 0 – 100
    pub matched: Vec<Keyword>,
    pub missing: Vec<Keyword>,
    pub recommendation: String,
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    WORD.find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|w| !STOP_WORDS.contains(&w.as_str()))
}

/// Keywords of `text`, ordered by frequency (desc) then alphabetically.
pub fn extract_keywords(text: &str) -> Vec<Keyword> {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for token in tokens(text) {
        *counts.entry(token).or_default() += 1;
    }

    let mut keywords: Vec<Keyword> = counts
        .into_iter()
        .map(|(keyword, frequency)| Keyword { keyword, frequency })
        .collect();
    keywords.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| a.keyword.cmp(&b.keyword))
    });
    keywords
}

/// Scores how many of the job profile's top keywords the CV already uses.
pub fn ats_report(job_profile: &str, cv_text: &str) -> AtsReport {
    let job_keywords: Vec<Keyword> = extract_keywords(job_profile)
        .into_iter()
        .take(MAX_JOB_KEYWORDS)
        .collect();
    let cv_tokens: HashSet<String> = tokens(cv_text).collect();

    let (matched, missing): (Vec<Keyword>, Vec<Keyword>) = job_keywords
        .into_iter()
        .partition(|k| cv_tokens.contains(&k.keyword));

    let total = matched.len() + missing.len();
    let coverage_percent = if total == 0 {
        0
    } else {
        ((matched.len() as f64 / total as f64) * 100.0).round() as u32
    };

    let recommendation = build_recommendation(coverage_percent, total, &missing);

    AtsReport {
        coverage_percent,
        matched,
        missing,
        recommendation,
    }
}

fn build_recommendation(coverage: u32, total: usize, missing: &[Keyword]) -> String {
    if total == 0 {
        return "No keywords found in the job profile, cannot score ATS coverage.".to_string();
    }

    let top_missing: Vec<&str> = missing.iter().take(5).map(|k| k.keyword.as_str()).collect();

    if coverage >= 70 {
        "Strong keyword alignment. The CV already mirrors most of the job profile's language."
            .to_string()
    } else if coverage >= 40 {
        format!(
            "Moderate keyword alignment ({coverage}%). Work in, where truthful: {}.",
            top_missing.join(", ")
        )
    } else {
        format!(
            "Weak keyword alignment ({coverage}%). An ATS may filter this CV out. Missing: {}.",
            top_missing.join(", ")
        )
    }
}
