//! Application sessions: one per uploaded CV + job profile.
//!
//! Lifecycle:
//!   initialized → processing → waiting_approval → finalizing → completed
//!   processing / finalizing → error

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::{AtsReport, SectionSuggestion};
use crate::models::application::ApplicationResult;
use crate::research::CompanyResearch;

pub mod handlers;
pub mod interaction;
pub mod store;
pub mod validation;
pub mod workflow;

pub use store::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Initialized,
    Processing,
    WaitingApproval,
    Finalizing,
    Completed,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStep {
    WaitingForInput,
    ParsingCv,
    ResearchingCompany,
    AnalyzingCv,
    CvSectionApproval,
    GeneratingMotivationLetter,
    Done,
}

impl ProcessingStep {
    pub fn progress(self) -> u8 {
        match self {
            ProcessingStep::WaitingForInput => 0,
            ProcessingStep::ParsingCv => 30,
            ProcessingStep::ResearchingCompany => 40,
            ProcessingStep::AnalyzingCv => 60,
            ProcessingStep::CvSectionApproval => 80,
            ProcessingStep::GeneratingMotivationLetter => 90,
            ProcessingStep::Done => 100,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub status: SessionStatus,
    pub step: ProcessingStep,
    pub message: String,
    pub created_at: DateTime<Utc>,
    /// Bumped by every store update; drives eviction of idle sessions.
    pub updated_at: DateTime<Utc>,
    pub cv_text: String,
    pub job_profile: String,
    pub language: String,
    pub research: Option<CompanyResearch>,
    pub suggestions: Vec<SectionSuggestion>,
    pub ats_report: Option<AtsReport>,
    pub result: Option<ApplicationResult>,
}

/// Body of `GET /api/v1/status/:session_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatusResponse {
    pub session_id: Uuid,
    pub status: SessionStatus,
    pub current_step: ProcessingStep,
    pub progress_percentage: u8,
    pub message: String,
}

impl Session {
    pub fn new(cv_text: String, job_profile: String, language: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            status: SessionStatus::Initialized,
            step: ProcessingStep::WaitingForInput,
            message: "Session created successfully".to_string(),
            created_at: now,
            updated_at: now,
            cv_text,
            job_profile,
            language,
            research: None,
            suggestions: Vec::new(),
            ats_report: None,
            result: None,
        }
    }

    pub fn advance(&mut self, status: SessionStatus, step: ProcessingStep, message: impl Into<String>) {
        self.status = status;
        self.step = step;
        self.message = message.into();
    }

    /// Moves to `error`; the step is kept so clients see where it failed.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = SessionStatus::Error;
        self.message = message.into();
    }

    /// A background task still owns the session.
    pub fn is_running(&self) -> bool {
        matches!(
            self.status,
            SessionStatus::Processing | SessionStatus::Finalizing
        )
    }

    pub fn elapsed_secs(&self) -> f64 {
        (Utc::now() - self.created_at).num_milliseconds() as f64 / 1000.0
    }

    pub fn status_response(&self) -> SessionStatusResponse {
        SessionStatusResponse {
            session_id: self.id,
            status: self.status,
            current_step: self.step,
            progress_percentage: self.step.progress(),
            message: self.message.clone(),
        }
    }
}
