use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::models::profile::UserProfile;
use crate::research::cache::ResearchCache;
use crate::research::CompanyResearcher;
use crate::session::SessionStore;
use crate::storage::ResultStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    pub config: Config,
    /// Candidate profile, loaded once at startup.
    pub profile: Arc<UserProfile>,
    pub sessions: SessionStore,
    pub researcher: CompanyResearcher,
    pub results: ResultStore,
}

impl AppState {
    pub fn new(config: Config, llm: LlmClient, profile: UserProfile) -> Self {
        let cache = ResearchCache::new(
            config.cache_dir(),
            config.cache_duration_days,
            config.cache_company_research,
        );
        let researcher = CompanyResearcher::new(llm.clone(), cache, config.research_temperature);
        let results = ResultStore::new(config.output_dir(), config.save_results_locally);

        Self {
            llm,
            profile: Arc::new(profile),
            sessions: SessionStore::new(chrono::Duration::hours(config.session_retention_hours)),
            researcher,
            results,
            config,
        }
    }

    /// Builds the state from configuration: LLM client and user profile.
    pub fn from_config(config: Config) -> Result<Self> {
        let llm = LlmClient::new(config.llm_settings())?;
        let profile = UserProfile::load(&config.user_profile_path)?;
        Ok(Self::new(config, llm, profile))
    }
}
