//! Company Research: identifies the hiring company and builds an application-oriented
//! research brief through the LLM, cached on disk per company.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::letter::text::truncate_chars;
use crate::llm_client::prompts::{fill_template, JSON_ONLY_SYSTEM};
use crate::llm_client::{strip_json_fences, CompletionOptions, LlmClient, LlmError};

pub mod cache;
pub mod prompts;

use cache::ResearchCache;
use prompts::{COMPANY_NAME_PROMPT_TEMPLATE, RESEARCH_PROMPT_TEMPLATE, RESEARCH_SYSTEM};

const UNKNOWN_COMPANY: &str = "Unknown Company";
const NAME_EXTRACTION_CHARS: usize = 1000;
const CONTEXT_CHARS: usize = 500;
const NAME_EXTRACTION_TEMPERATURE: f32 = 0.1;
const NAME_EXTRACTION_MAX_TOKENS: u32 = 60;
const RESEARCH_MAX_TOKENS: u32 = 3000;

/// Research brief for one company, as cached and as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyResearch {
    pub company_name: String,
    pub research_date: DateTime<Utc>,
    pub detailed_research: String,
    /// Opening of the job profile the research was made for.
    pub job_profile_context: String,
}

#[derive(Debug, Deserialize)]
struct CompanyNameExtraction {
    #[serde(default)]
    company_name: String,
}

#[derive(Clone)]
pub struct CompanyResearcher {
    llm: LlmClient,
    cache: ResearchCache,
    temperature: f32,
}

impl CompanyResearcher {
    pub fn new(llm: LlmClient, cache: ResearchCache, temperature: f32) -> Self {
        Self {
            llm,
            cache,
            temperature,
        }
    }

    /// Extract company → cache lookup → fresh research → cache write.
    pub async fn research_company(&self, job_profile: &str) -> Result<CompanyResearch, AppError> {
        let company_name = self.extract_company_name(job_profile).await?;

        // An unnamed company is keyed by nothing job-specific; never share it.
        let cacheable = company_name != UNKNOWN_COMPANY;
        if cacheable {
            if let Some(cached) = self.cache.get(&company_name).await {
                info!("Using cached research for {company_name}");
                return Ok(cached);
            }
        }

        info!("Researching {company_name}...");
        let research = self.perform_research(&company_name, job_profile).await?;
        if cacheable {
            self.cache.put(&research).await;
        }
        Ok(research)
    }

    /// Accepts the requested JSON object or a bare name; an empty reply is `Unknown Company`.
    pub async fn extract_company_name(&self, job_profile: &str) -> Result<String, AppError> {
        let prompt = COMPANY_NAME_PROMPT_TEMPLATE.replace(
            "{job_profile}",
            &truncate_chars(job_profile, NAME_EXTRACTION_CHARS, true),
        );

        let reply = match self
            .llm
            .complete(
                JSON_ONLY_SYSTEM,
                &prompt,
                CompletionOptions::new(NAME_EXTRACTION_TEMPERATURE, NAME_EXTRACTION_MAX_TOKENS),
            )
            .await
        {
            Ok(reply) => reply,
            Err(LlmError::EmptyContent) => String::new(),
            Err(e) => return Err(e.into()),
        };

        let raw = match serde_json::from_str::<CompanyNameExtraction>(strip_json_fences(&reply)) {
            Ok(extracted) => extracted.company_name,
            Err(e) => {
                debug!("Company name reply is not JSON ({e}), using it as plain text");
                reply
            }
        };

        Ok(clean_company_name(&raw))
    }

    async fn perform_research(
        &self,
        company_name: &str,
        job_profile: &str,
    ) -> Result<CompanyResearch, AppError> {
        let prompt = fill_template(
            RESEARCH_PROMPT_TEMPLATE,
            &[("company_name", company_name), ("job_profile", job_profile)],
        );

        let detailed_research = self
            .llm
            .complete(
                RESEARCH_SYSTEM,
                &prompt,
                CompletionOptions::new(self.temperature, RESEARCH_MAX_TOKENS),
            )
            .await?;

        Ok(CompanyResearch {
            company_name: company_name.to_string(),
            research_date: Utc::now(),
            detailed_research,
            job_profile_context: truncate_chars(job_profile, CONTEXT_CHARS, true),
        })
    }
}

fn clean_company_name(raw: &str) -> String {
    let name = raw
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '`')
        .trim();
    if name.is_empty() {
        UNKNOWN_COMPANY.to_string()
    } else {
        name.to_string()
    }
}
