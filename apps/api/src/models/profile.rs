use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Candidate profile loaded from `config/user_profile.json`.
/// Every field is optional so partially filled profiles still load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub personal_info: PersonalInfo,
    pub core_background: CoreBackground,
    pub transition_elements: TransitionElements,
    pub personality_traits: PersonalityTraits,
    pub language_skills: LanguageSkills,
    pub interests: Interests,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub name: String,
    pub current_location: String,
    pub relocation_ready: bool,
    pub availability: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreBackground {
    pub primary_experience: String,
    pub international_experience: String,
    pub years_experience: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionElements {
    pub education: String,
    pub certifications: Vec<String>,
    pub strategic_projects: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalityTraits {
    pub core_traits: Vec<String>,
    pub work_style: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageSkills {
    pub fluent: Vec<String>,
    pub learning: Option<LanguageLearning>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageLearning {
    pub language: String,
    pub current_level: String,
    pub target_level: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Interests {
    pub hobbies: Vec<String>,
}

impl UserProfile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("User profile not found at {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("User profile at {} is not valid JSON", path.display()))
    }

    /// Labelled block describing the candidate, embedded in letter prompts.
    pub fn prompt_summary(&self) -> String {
        let learning = self
            .language_skills
            .learning
            .as_ref()
            .filter(|l| !l.language.is_empty())
            .map(|l| format!("{} ({} -> {})", l.language, l.current_level, l.target_level))
            .unwrap_or_default();

        let years = self
            .core_background
            .years_experience
            .map(|y| format!(" ({y} years)"))
            .unwrap_or_default();

        format!(
            "BACKGROUND: {}{}\n\
             INTERNATIONAL: {}\n\
             TRANSITION: {}\n\
             CERTIFICATIONS: {}\n\
             PROJECTS: {}\n\
             PERSONALITY: {}\n\
             WORK STYLE: {}\n\
             LANGUAGES: Fluent in {}\n\
             LEARNING: {}\n\
             INTERESTS: {}",
            self.core_background.primary_experience,
            years,
            self.core_background.international_experience,
            self.transition_elements.education,
            self.transition_elements.certifications.join(", "),
            self.transition_elements.strategic_projects.join(", "),
            self.personality_traits.core_traits.join(", "),
            self.personality_traits.work_style.join(", "),
            self.language_skills.fluent.join(", "),
            learning,
            self.interests.hobbies.join(", "),
        )
    }

    /// Availability and language sentences the letter must close with.
    /// Parts without data are left out.
    pub fn closing_statement(&self) -> String {
        let mut sentences = Vec::new();

        let availability = self.personal_info.availability.trim();
        match (availability.is_empty(), self.personal_info.relocation_ready) {
            (false, true) => sentences.push(format!(
                "I cannot wait and am open to starting {availability}, with relocation being no issue for me."
            )),
            (false, false) => sentences.push(format!(
                "I cannot wait and am open to starting {availability}."
            )),
            (true, true) => sentences.push("Relocation is no issue for me.".to_string()),
            (true, false) => {}
        }

        if !self.language_skills.fluent.is_empty() {
            let mut sentence = format!(
                "Additionally, I am fluent in {}",
                join_natural(&self.language_skills.fluent)
            );
            if let Some(learning) = self
                .language_skills
                .learning
                .as_ref()
                .filter(|l| !l.language.is_empty())
            {
                sentence.push_str(&format!(
                    ", and I am currently continuing my {} language journey at the {} level with the goal of reaching {}",
                    learning.language, learning.current_level, learning.target_level
                ));
            }
            sentence.push('.');
            sentences.push(sentence);
        }

        sentences.join(" ")
    }
}

/// "a", "a and b", "a, b, and c"
fn join_natural(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [one] => one.clone(),
        [a, b] => format!("{a} and {b}"),
        [rest @ .., last] => format!("{}, and {last}", rest.join(", ")),
    }
}
