use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::llm_client::LlmSettings;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm_base_url: String,
    pub model_name: String,
    pub llm_api_key: Option<String>,
    pub request_timeout_secs: u64,
    pub default_temperature: f32,
    pub default_max_tokens: u32,
    pub cv_analysis_temperature: f32,
    pub motivation_temperature: f32,
    pub research_temperature: f32,
    pub max_file_size_mb: u64,
    pub letter_min_words: usize,
    pub letter_max_words: usize,
    pub profile_target_words: usize,
    pub save_results_locally: bool,
    pub cache_company_research: bool,
    pub cache_duration_days: i64,
    /// Idle time after which a session that is not running is dropped from memory.
    pub session_retention_hours: i64,
    pub data_dir: PathBuf,
    pub user_profile_path: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let llm_base_url = std::env::var("LLM_BASE_URL")
            .or_else(|_| std::env::var("LM_STUDIO_URL"))
            .unwrap_or_else(|_| "http://localhost:1234".to_string());

        let config = Config {
            llm_base_url,
            model_name: env_or("MODEL_NAME", "gpt-oss-20b"),
            llm_api_key: std::env::var("LLM_API_KEY").ok().filter(|k| !k.is_empty()),
            request_timeout_secs: parse_env("REQUEST_TIMEOUT", 300)?,
            default_temperature: parse_env("DEFAULT_TEMPERATURE", 0.5)?,
            default_max_tokens: parse_env("DEFAULT_MAX_TOKENS", 2000)?,
            cv_analysis_temperature: parse_env("CV_ANALYSIS_TEMPERATURE", 0.4)?,
            motivation_temperature: parse_env("MOTIVATION_GENERATION_TEMPERATURE", 0.6)?,
            research_temperature: parse_env("COMPANY_RESEARCH_TEMPERATURE", 0.3)?,
            max_file_size_mb: parse_env("MAX_FILE_SIZE_MB", 10)?,
            letter_min_words: parse_env("MOTIVATION_LETTER_MIN_WORDS", 410)?,
            letter_max_words: parse_env("MOTIVATION_LETTER_MAX_WORDS", 430)?,
            profile_target_words: parse_env("CV_PROFILE_TARGET_WORDS", 32)?,
            save_results_locally: parse_bool_env("SAVE_RESULTS_LOCALLY", true)?,
            cache_company_research: parse_bool_env("CACHE_COMPANY_RESEARCH", true)?,
            cache_duration_days: parse_env("CACHE_DURATION_DAYS", 7)?,
            session_retention_hours: parse_env("SESSION_RETENTION_HOURS", 24)?,
            data_dir: PathBuf::from(env_or("DATA_DIR", "data")),
            user_profile_path: PathBuf::from(env_or(
                "USER_PROFILE_PATH",
                "config/user_profile.json",
            )),
            port: parse_env("PORT", 8000)?,
            rust_log: env_or("RUST_LOG", "info"),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.letter_min_words > self.letter_max_words {
            bail!(
                "MOTIVATION_LETTER_MIN_WORDS ({}) must not exceed MOTIVATION_LETTER_MAX_WORDS ({})",
                self.letter_min_words,
                self.letter_max_words
            );
        }
        if self.cache_duration_days < 0 {
            bail!("CACHE_DURATION_DAYS must not be negative");
        }
        if self.session_retention_hours <= 0 {
            bail!("SESSION_RETENTION_HOURS must be positive");
        }
        Ok(())
    }

    pub fn max_file_size_bytes(&self) -> usize {
        (self.max_file_size_mb as usize).saturating_mul(1024 * 1024)
    }

    pub fn llm_settings(&self) -> LlmSettings {
        LlmSettings {
            base_url: self.llm_base_url.clone(),
            model: self.model_name.clone(),
            api_key: self.llm_api_key.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
            retry_base_delay: Duration::from_millis(1000),
        }
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.data_dir.join("cache")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.data_dir.join("output")
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

fn parse_bool_env(key: &str, default: bool) -> Result<bool> {
    match std::env::var(key) {
        Ok(raw) => parse_bool(&raw)
            .with_context(|| format!("Environment variable '{key}' must be true or false, got: {raw}")),
        Err(_) => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
impl Config {
    /// Config pointing at a local LLM stub and a scratch data dir.
    pub fn for_tests(llm_base_url: &str, data_dir: &std::path::Path) -> Self {
        Config {
            llm_base_url: llm_base_url.to_string(),
            model_name: "test-model".to_string(),
            llm_api_key: None,
            request_timeout_secs: 10,
            default_temperature: 0.5,
            default_max_tokens: 2000,
            cv_analysis_temperature: 0.4,
            motivation_temperature: 0.6,
            research_temperature: 0.3,
            max_file_size_mb: 1,
            letter_min_words: 410,
            letter_max_words: 430,
            profile_target_words: 32,
            save_results_locally: true,
            cache_company_research: true,
            cache_duration_days: 7,
            session_retention_hours: 24,
            data_dir: data_dir.to_path_buf(),
            user_profile_path: data_dir.join("user_profile.json"),
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}
