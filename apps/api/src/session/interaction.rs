//! Section review: approve / modify / ask / skip on one suggestion at a time.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::critique::{answer_question, modify_suggestions};
use crate::analysis::{CvSection, SectionSuggestion, SuggestionStatus};
use crate::errors::AppError;
use crate::session::validation::require_text;
use crate::session::{Session, SessionStatus};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionAction {
    Approve,
    Modify,
    Ask,
    Skip,
}

impl FromStr for InteractionAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approve" => Ok(Self::Approve),
            "modify" => Ok(Self::Modify),
            "ask" => Ok(Self::Ask),
            "skip" => Ok(Self::Skip),
            other => Err(AppError::Validation(format!(
                "Unknown action '{other}'. Use approve, modify, ask or skip"
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractionRequest {
    pub session_id: Uuid,
    pub section_name: String,
    pub action: String,
    pub modification_text: Option<String>,
    pub question: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionResponse {
    pub session_id: Uuid,
    pub section_name: CvSection,
    pub action_taken: InteractionAction,
    pub result: String,
    /// First section still pending, if any.
    pub next_section: Option<CvSection>,
    pub is_complete: bool,
}

pub fn next_section(suggestions: &[SectionSuggestion]) -> Option<CvSection> {
    suggestions
        .iter()
        .find(|s| s.status == SuggestionStatus::Pending)
        .map(|s| s.section)
}

/// Looks up the section's current suggestions, checking the session accepts interactions.
fn reviewable_suggestions(session: &Session, section: CvSection) -> Result<String, AppError> {
    if session.status != SessionStatus::WaitingApproval {
        return Err(AppError::Conflict(format!(
            "Session {} is not waiting for section approval",
            session.id
        )));
    }
    session
        .suggestions
        .iter()
        .find(|s| s.section == section)
        .map(|s| s.suggestions.clone())
        .ok_or_else(|| AppError::NotFound(format!("No suggestions for section '{section}'")))
}

/// Applies `status` (and optionally new text) to the section and reports what is left.
fn record_decision(
    session: &mut Session,
    section: CvSection,
    status: Option<SuggestionStatus>,
    new_text: Option<String>,
) -> Result<(Option<CvSection>, bool), AppError> {
    reviewable_suggestions(session, section)?;
    if let Some(entry) = session.suggestions.iter_mut().find(|s| s.section == section) {
        if let Some(status) = status {
            entry.status = status;
        }
        if let Some(text) = new_text {
            entry.suggestions = text;
        }
    }
    let next = next_section(&session.suggestions);
    Ok((next, next.is_none()))
}

pub async fn interact(
    state: &AppState,
    request: InteractionRequest,
) -> Result<InteractionResponse, AppError> {
    let session_id = request.session_id;
    let action: InteractionAction = request.action.parse()?;
    let section = CvSection::from_name(&request.section_name).ok_or_else(|| {
        AppError::NotFound(format!("Unknown CV section '{}'", request.section_name))
    })?;

    let current = state
        .sessions
        .read(session_id, |s| reviewable_suggestions(s, section))
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))??;

    // The LLM calls run without holding the session lock; a concurrent modify
    // on the same section resolves as last write wins.
    let (status, new_text, result) = match action {
        InteractionAction::Approve => (
            Some(SuggestionStatus::Approved),
            None,
            format!("Section '{section}' approved"),
        ),
        InteractionAction::Skip => (
            Some(SuggestionStatus::Skipped),
            None,
            format!("Section '{section}' skipped"),
        ),
        InteractionAction::Modify => {
            let request_text = require_text(request.modification_text.as_deref(), "modification_text")?;
            let modified = modify_suggestions(&state.llm, section, &current, request_text).await?;
            (
                Some(SuggestionStatus::Modified),
                Some(modified.clone()),
                modified,
            )
        }
        InteractionAction::Ask => {
            let question = require_text(request.question.as_deref(), "question")?;
            let answer = answer_question(&state.llm, section, &current, question).await?;
            (None, None, answer)
        }
    };

    let (next_section, is_complete) = state
        .sessions
        .update(session_id, |s| record_decision(s, section, status, new_text))
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))??;

    info!("Session {session_id}: {action:?} on {section}");

    Ok(InteractionResponse {
        session_id,
        section_name: section,
        action_taken: action,
        result,
        next_section,
        is_complete,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ProcessingStep;

    fn session_with_suggestions() -> Session {
        let mut session = Session::new("cv".into(), "job".into(), "English".into());
        session.suggestions = [CvSection::ProfessionalProfile, CvSection::Experience]
            .into_iter()
            .map(|section| SectionSuggestion {
                section,
                original_content: String::new(),
                suggestions: format!("Improve {section}"),
                status: SuggestionStatus::Pending,
            })
            .collect();
        session.advance(
            SessionStatus::WaitingApproval,
            ProcessingStep::CvSectionApproval,
            "ready",
        );
        session
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!("Approve".parse::<InteractionAction>().unwrap(), InteractionAction::Approve);
        assert_eq!(" skip ".parse::<InteractionAction>().unwrap(), InteractionAction::Skip);
        assert!(matches!(
            "delete".parse::<InteractionAction>(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_decisions_advance_next_section() {
        let mut session = session_with_suggestions();

        let (next, done) = record_decision(
            &mut session,
            CvSection::ProfessionalProfile,
            Some(SuggestionStatus::Approved),
            None,
        )
        .unwrap();
        assert_eq!(next, Some(CvSection::Experience));
        assert!(!done);

        let (next, done) = record_decision(
            &mut session,
            CvSection::Experience,
            Some(SuggestionStatus::Modified),
            Some("Rewritten".to_string()),
        )
        .unwrap();
        assert_eq!(next, None);
        assert!(done);
        assert_eq!(session.suggestions[1].suggestions, "Rewritten");
    }

    #[test]
    fn test_ask_leaves_status_unchanged() {
        let mut session = session_with_suggestions();
        let (next, _) = record_decision(&mut session, CvSection::Experience, None, None).unwrap();
        assert_eq!(next, Some(CvSection::ProfessionalProfile));
        assert_eq!(session.suggestions[1].status, SuggestionStatus::Pending);
    }

    #[test]
    fn test_interaction_requires_waiting_approval() {
        let mut session = session_with_suggestions();
        session.advance(SessionStatus::Completed, ProcessingStep::Done, "done");
        let err = reviewable_suggestions(&session, CvSection::Experience).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_section_without_suggestions_is_not_found() {
        let session = session_with_suggestions();
        let err = reviewable_suggestions(&session, CvSection::Skills).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
