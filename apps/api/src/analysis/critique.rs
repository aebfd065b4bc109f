//! Section-by-section CV critique and the follow-up rewrite / Q&A calls.
//!
//! Flow: extract_sections → for each canonical section (missing ones get a
//!       placeholder) → one LLM critique call → SectionSuggestion (pending).

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::prompts::{
    ASK_PROMPT_TEMPLATE, ASK_SYSTEM, CERTIFICATIONS_INSTRUCTIONS, CRITIQUE_PROMPT_TEMPLATE,
    CRITIQUE_SYSTEM, EDUCATION_INSTRUCTIONS, EXPERIENCE_INSTRUCTIONS, MODIFY_PROMPT_TEMPLATE,
    MODIFY_SYSTEM, PROFESSIONAL_PROFILE_INSTRUCTIONS, PROJECTS_INSTRUCTIONS, SKILLS_INSTRUCTIONS,
};
use crate::analysis::sections::{extract_sections, CvSection};
use crate::errors::AppError;
use crate::letter::text::truncate_chars;
use crate::llm_client::prompts::{fill_template, HONESTY_INSTRUCTION, PLAIN_TEXT_INSTRUCTION};
use crate::llm_client::{CompletionOptions, LlmClient};
use crate::models::profile::UserProfile;
use crate::research::CompanyResearch;

const CRITIQUE_MAX_TOKENS: u32 = 1500;
const JOB_PROFILE_PROMPT_CHARS: usize = 1500;
const RESEARCH_PROMPT_CHARS: usize = 1000;

const MODIFY_TEMPERATURE: f32 = 0.4;
const MODIFY_MAX_TOKENS: u32 = 1000;
const ASK_TEMPERATURE: f32 = 0.3;
const ASK_MAX_TOKENS: u32 = 500;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionStatus {
    Pending,
    Approved,
    Modified,
    Skipped,
}

/// LLM critique for one canonical section, plus the user's decision on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionSuggestion {
    pub section: CvSection,
    /// Section text from the CV, or the "not found" placeholder.
    pub original_content: String,
    pub suggestions: String,
    pub status: SuggestionStatus,
}

/// Everything a critique prompt needs besides the section itself.
pub struct AnalysisContext<'a> {
    pub job_profile: &'a str,
    pub research: &'a CompanyResearch,
    pub profile: &'a UserProfile,
    pub language: &'a str,
    pub temperature: f32,
    pub profile_target_words: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Critique
// ────────────────────────────────────────────────────────────────────────────

/// Critiques every canonical section of the CV, in canonical order.
/// Calls are sequential; the first LLM failure aborts the analysis.
pub async fn analyze_sections(
    llm: &LlmClient,
    cv_text: &str,
    ctx: &AnalysisContext<'_>,
) -> Result<Vec<SectionSuggestion>, AppError> {
    let mut found = extract_sections(cv_text);
    info!(
        "Analyzing CV: {} of {} sections found",
        found.len(),
        CvSection::ALL.len()
    );

    let user_profile = serde_json::to_string_pretty(ctx.profile)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize profile: {e}")))?;

    let mut suggestions = Vec::with_capacity(CvSection::ALL.len());
    for section in CvSection::ALL {
        let original_content = found
            .remove(&section)
            .unwrap_or_else(|| format!("[{section} section not found in CV]"));

        info!("Analyzing {section}...");
        let prompt = build_critique_prompt(section, &original_content, &user_profile, ctx);
        let text = llm
            .complete(
                CRITIQUE_SYSTEM,
                &prompt,
                CompletionOptions::new(ctx.temperature, CRITIQUE_MAX_TOKENS),
            )
            .await?;

        suggestions.push(SectionSuggestion {
            section,
            original_content,
            suggestions: text,
            status: SuggestionStatus::Pending,
        });
    }

    Ok(suggestions)
}

fn build_critique_prompt(
    section: CvSection,
    section_content: &str,
    user_profile: &str,
    ctx: &AnalysisContext<'_>,
) -> String {
    let job_profile = truncate_chars(ctx.job_profile, JOB_PROFILE_PROMPT_CHARS, true);
    let research = truncate_chars(&ctx.research.detailed_research, RESEARCH_PROMPT_CHARS, true);
    let instructions = section_instructions(section, ctx.profile, ctx.profile_target_words);

    fill_template(
        CRITIQUE_PROMPT_TEMPLATE,
        &[
            ("language", ctx.language),
            ("company_name", ctx.research.company_name.as_str()),
            ("job_profile", job_profile.as_str()),
            ("research", research.as_str()),
            ("user_profile", user_profile),
            ("section_instructions", instructions.as_str()),
            ("honesty", HONESTY_INSTRUCTION),
            ("section", section.name()),
            ("section_content", section_content),
        ],
    )
}

fn section_instructions(section: CvSection, profile: &UserProfile, target_words: usize) -> String {
    match section {
        CvSection::ProfessionalProfile => {
            PROFESSIONAL_PROFILE_INSTRUCTIONS.replace("{target_words}", &target_words.to_string())
        }
        CvSection::Experience => EXPERIENCE_INSTRUCTIONS.to_string(),
        CvSection::Education => EDUCATION_INSTRUCTIONS.to_string(),
        CvSection::Skills => SKILLS_INSTRUCTIONS.to_string(),
        CvSection::Projects => {
            let projects = &profile.transition_elements.strategic_projects;
            if projects.is_empty() {
                PROJECTS_INSTRUCTIONS.to_string()
            } else {
                format!(
                    "{PROJECTS_INSTRUCTIONS}\n- Consider the candidate's strategic projects: {}",
                    projects.join(", ")
                )
            }
        }
        CvSection::Certifications => CERTIFICATIONS_INSTRUCTIONS.to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Follow-up calls
// ────────────────────────────────────────────────────────────────────────────

/// Rewrites a section's suggestions according to the user's request.
pub async fn modify_suggestions(
    llm: &LlmClient,
    section: CvSection,
    suggestions: &str,
    request: &str,
) -> Result<String, AppError> {
    let prompt = fill_template(
        MODIFY_PROMPT_TEMPLATE,
        &[
            ("section", section.name()),
            ("plain_text", PLAIN_TEXT_INSTRUCTION),
            ("suggestions", suggestions),
            ("request", request),
        ],
    );

    Ok(llm
        .complete(
            MODIFY_SYSTEM,
            &prompt,
            CompletionOptions::new(MODIFY_TEMPERATURE, MODIFY_MAX_TOKENS),
        )
        .await?)
}

/// Answers a question about a section's suggestions.
pub async fn answer_question(
    llm: &LlmClient,
    section: CvSection,
    suggestions: &str,
    question: &str,
) -> Result<String, AppError> {
    let prompt = fill_template(
        ASK_PROMPT_TEMPLATE,
        &[
            ("section", section.name()),
            ("plain_text", PLAIN_TEXT_INSTRUCTION),
            ("suggestions", suggestions),
            ("question", question),
        ],
    );

    Ok(llm
        .complete(
            ASK_SYSTEM,
            &prompt,
            CompletionOptions::new(ASK_TEMPERATURE, ASK_MAX_TOKENS),
        )
        .await?)
}
