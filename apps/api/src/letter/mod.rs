//! Motivation Letter: generation pipeline and the text utilities it relies on.

use serde::{Deserialize, Serialize};

pub mod generator;
pub mod prompts;
pub mod text;

pub use generator::{generate_letter, LetterRequest, LetterSettings};

use text::Readability;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotivationLetter {
    pub text: String,
    /// Recounted after the final humanization pass.
    pub word_count: usize,
    pub within_target: bool,
    pub readability: Readability,
}
