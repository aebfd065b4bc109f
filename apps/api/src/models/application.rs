use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::{AtsReport, SectionSuggestion};
use crate::letter::MotivationLetter;
use crate::research::CompanyResearch;
use crate::session::SessionStatus;

/// Complete outcome of one application session, returned by finalize and
/// persisted as `sessions/session_<id>.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationResult {
    pub session_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub status: SessionStatus,
    pub company_research: Option<CompanyResearch>,
    pub cv_suggestions: Vec<SectionSuggestion>,
    pub ats_report: Option<AtsReport>,
    pub motivation_letter: Option<MotivationLetter>,
    /// Seconds from upload to completion.
    pub processing_time_secs: Option<f64>,
    pub files_generated: Vec<String>,
}
