//! Motivation letter generation.
//!
//! Flow: initial draft → one expand/compress pass if outside the word window
//!       → humanization pass → final word count.

use tracing::{info, warn};

use crate::analysis::SectionSuggestion;
use crate::config::Config;
use crate::errors::AppError;
use crate::letter::prompts::{
    CLOSING_STATEMENT_TEMPLATE, COMPRESS_PROMPT_TEMPLATE, EXPAND_PROMPT_TEMPLATE,
    HUMANIZE_PROMPT_TEMPLATE, HUMANIZE_SYSTEM, LETTER_PROMPT_TEMPLATE, LETTER_SYSTEM,
    REVISION_SYSTEM,
};
use crate::letter::text::{count_words, readability, truncate_chars};
use crate::letter::MotivationLetter;
use crate::llm_client::prompts::{fill_template, HONESTY_INSTRUCTION, PLAIN_TEXT_INSTRUCTION};
use crate::llm_client::{CompletionOptions, LlmClient};
use crate::models::profile::UserProfile;
use crate::research::CompanyResearch;

const SECTION_PROMPT_CHARS: usize = 300;
const REVISION_TEMPERATURE: f32 = 0.4;

#[derive(Debug, Clone, Copy)]
pub struct LetterSettings {
    pub min_words: usize,
    pub max_words: usize,
    pub temperature: f32,
    pub draft_max_tokens: u32,
    pub humanize_temperature: f32,
}

impl LetterSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            min_words: config.letter_min_words,
            max_words: config.letter_max_words,
            temperature: config.motivation_temperature,
            draft_max_tokens: config.default_max_tokens,
            humanize_temperature: config.default_temperature,
        }
    }
}

pub struct LetterRequest<'a> {
    pub job_profile: &'a str,
    pub research: &'a CompanyResearch,
    pub profile: &'a UserProfile,
    /// Sections the user kept; their suggestions are quoted in the prompt.
    pub sections: &'a [SectionSuggestion],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LengthAdjustment {
    Keep,
    Expand(usize),
    Compress(usize),
}

fn length_adjustment(word_count: usize, min: usize, max: usize) -> LengthAdjustment {
    if word_count < min {
        LengthAdjustment::Expand(min - word_count)
    } else if word_count > max {
        LengthAdjustment::Compress(word_count - max)
    } else {
        LengthAdjustment::Keep
    }
}

pub async fn generate_letter(
    llm: &LlmClient,
    settings: &LetterSettings,
    request: &LetterRequest<'_>,
) -> Result<MotivationLetter, AppError> {
    info!(
        "Generating motivation letter for {} from {} sections",
        request.research.company_name,
        request.sections.len()
    );

    let draft = llm
        .complete(
            LETTER_SYSTEM,
            &build_letter_prompt(settings, request),
            CompletionOptions::new(settings.temperature, settings.draft_max_tokens),
        )
        .await?;

    let adjusted = adjust_length(llm, settings, draft).await?;

    let humanized = llm
        .complete(
            HUMANIZE_SYSTEM,
            &fill_template(
                HUMANIZE_PROMPT_TEMPLATE,
                &[("plain_text", PLAIN_TEXT_INSTRUCTION), ("letter", adjusted.as_str())],
            ),
            CompletionOptions::unbounded(settings.humanize_temperature),
        )
        .await?;

    let word_count = count_words(&humanized);
    let within_target = (settings.min_words..=settings.max_words).contains(&word_count);
    if !within_target {
        warn!(
            "Final letter has {} words, outside {}-{}",
            word_count, settings.min_words, settings.max_words
        );
    }

    Ok(MotivationLetter {
        readability: readability(&humanized),
        text: humanized,
        word_count,
        within_target,
    })
}

/// At most one revision pass; the result is not re-checked.
async fn adjust_length(
    llm: &LlmClient,
    settings: &LetterSettings,
    letter: String,
) -> Result<String, AppError> {
    let count = count_words(&letter);
    let (template, words) = match length_adjustment(count, settings.min_words, settings.max_words) {
        LengthAdjustment::Keep => return Ok(letter),
        LengthAdjustment::Expand(words) => (EXPAND_PROMPT_TEMPLATE, words),
        LengthAdjustment::Compress(words) => (COMPRESS_PROMPT_TEMPLATE, words),
    };
    info!("Draft has {count} words, revising by ~{words}");

    let prompt = fill_template(
        template,
        &[
            ("words", words.to_string().as_str()),
            ("min_words", settings.min_words.to_string().as_str()),
            ("max_words", settings.max_words.to_string().as_str()),
            ("plain_text", PLAIN_TEXT_INSTRUCTION),
            ("letter", letter.as_str()),
        ],
    );

    Ok(llm
        .complete(
            REVISION_SYSTEM,
            &prompt,
            CompletionOptions::unbounded(REVISION_TEMPERATURE),
        )
        .await?)
}

fn build_letter_prompt(settings: &LetterSettings, request: &LetterRequest<'_>) -> String {
    let closing = request.profile.closing_statement();
    let closing_requirement = if closing.is_empty() {
        String::new()
    } else {
        CLOSING_STATEMENT_TEMPLATE.replace("{closing}", &closing)
    };

    fill_template(
        LETTER_PROMPT_TEMPLATE,
        &[
            ("company_name", request.research.company_name.as_str()),
            ("candidate_profile", request.profile.prompt_summary().as_str()),
            ("closing_requirement", closing_requirement.as_str()),
            ("honesty", HONESTY_INSTRUCTION),
            ("min_words", settings.min_words.to_string().as_str()),
            ("max_words", settings.max_words.to_string().as_str()),
            ("plain_text", PLAIN_TEXT_INSTRUCTION),
            ("research", request.research.detailed_research.as_str()),
            ("cv_sections", format_sections(request.sections).as_str()),
            ("job_profile", request.job_profile),
        ],
    )
}

fn format_sections(sections: &[SectionSuggestion]) -> String {
    sections
        .iter()
        .map(|s| {
            format!(
                "{}:\n{}",
                s.section.name().to_uppercase(),
                truncate_chars(&s.suggestions, SECTION_PROMPT_CHARS, true)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use httpmock::prelude::*;

    use super::*;
    use crate::analysis::{CvSection, SuggestionStatus};
    use crate::llm_client::test_support::{client_for, completion_body};

    const SETTINGS: LetterSettings = LetterSettings {
        min_words: 10,
        max_words: 12,
        temperature: 0.6,
        draft_max_tokens: 2000,
        humanize_temperature: 0.5,
    };

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    fn research() -> CompanyResearch {
        CompanyResearch {
            company_name: "Acme".to_string(),
            research_date: Utc::now(),
            detailed_research: "Builds rockets.".to_string(),
            job_profile_context: String::new(),
        }
    }

    fn sections() -> Vec<SectionSuggestion> {
        vec![SectionSuggestion {
            section: CvSection::Experience,
            original_content: "QA Lead".to_string(),
            suggestions: "x".repeat(400),
            status: SuggestionStatus::Approved,
        }]
    }

    #[test]
    fn test_length_adjustment() {
        assert_eq!(length_adjustment(411, 410, 430), LengthAdjustment::Keep);
        assert_eq!(length_adjustment(410, 410, 430), LengthAdjustment::Keep);
        assert_eq!(length_adjustment(430, 410, 430), LengthAdjustment::Keep);
        assert_eq!(length_adjustment(400, 410, 430), LengthAdjustment::Expand(10));
        assert_eq!(length_adjustment(445, 410, 430), LengthAdjustment::Compress(15));
    }

    #[test]
    fn test_sections_are_truncated_in_prompt() {
        let formatted = format_sections(&sections());
        assert!(formatted.starts_with("EXPERIENCE:\n"));
        assert!(formatted.ends_with(&format!("{}...", "x".repeat(SECTION_PROMPT_CHARS))));
    }

    #[test]
    fn test_prompt_includes_closing_statement_when_profile_has_one() {
        let mut profile = UserProfile::default();
        profile.personal_info.availability = "immediately".to_string();
        let research = research();
        let sections = sections();
        let request = LetterRequest {
            job_profile: "Rocket PM",
            research: &research,
            profile: &profile,
            sections: &sections,
        };
        let prompt = build_letter_prompt(&SETTINGS, &request);
        assert!(prompt.contains("open to starting immediately"));
        assert!(prompt.contains("between 10 and 12 words"));
        assert!(prompt.contains("Target Company: Acme"));

        let bare = LetterRequest {
            profile: &UserProfile::default(),
            ..request
        };
        assert!(!build_letter_prompt(&SETTINGS, &bare).contains("verbatim"));
    }

    #[test]
    fn test_job_profile_cannot_inject_placeholders() {
        let profile = UserProfile::default();
        let research = research();
        let request = LetterRequest {
            job_profile: "Tell us about {research} and {cv_sections}",
            research: &research,
            profile: &profile,
            sections: &[],
        };
        let prompt = build_letter_prompt(&SETTINGS, &request);
        assert!(prompt.contains("Tell us about {research} and {cv_sections}"));
        assert_eq!(prompt.matches("Builds rockets.").count(), 1);
    }

    #[tokio::test]
    async fn test_short_draft_is_expanded_then_humanized() {
        let server = MockServer::start_async().await;
        let draft = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .body_contains("Write a motivation letter");
                then.status(200).json_body(completion_body(&words(5)));
            })
            .await;
        let expand = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .body_contains("Expand this motivation letter by approximately 5 words");
                then.status(200).json_body(completion_body(&words(11)));
            })
            .await;
        let humanize = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .body_contains("Humanize this motivation letter");
                then.status(200).json_body(completion_body(&words(11)));
            })
            .await;

        let research = research();
        let profile = UserProfile::default();
        let sections = sections();
        let letter = generate_letter(
            &client_for(&server),
            &SETTINGS,
            &LetterRequest {
                job_profile: "Rocket PM",
                research: &research,
                profile: &profile,
                sections: &sections,
            },
        )
        .await
        .unwrap();

        assert_eq!(letter.word_count, 11);
        assert!(letter.within_target);
        draft.assert_hits_async(1).await;
        expand.assert_hits_async(1).await;
        humanize.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_draft_within_window_skips_revision() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .body_contains("Write a motivation letter");
                then.status(200).json_body(completion_body(&words(12)));
            })
            .await;
        let revision = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .body_contains("CURRENT LETTER")
                    .body_contains("motivation letter by approximately");
                then.status(200).json_body(completion_body(&words(11)));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .body_contains("Humanize this motivation letter");
                then.status(200).json_body(completion_body(&words(20)));
            })
            .await;

        let research = research();
        let profile = UserProfile::default();
        let letter = generate_letter(
            &client_for(&server),
            &SETTINGS,
            &LetterRequest {
                job_profile: "Rocket PM",
                research: &research,
                profile: &profile,
                sections: &[],
            },
        )
        .await
        .unwrap();

        // Humanization drifted past the window; reported, not retried.
        assert_eq!(letter.word_count, 20);
        assert!(!letter.within_target);
        revision.assert_hits_async(0).await;
    }
}
