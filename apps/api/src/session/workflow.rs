//! Long-running session work: background analysis after upload, and letter
//! generation on finalize. Session data is copied out before every LLM call
//! and written back afterwards.

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::analysis::critique::{analyze_sections, AnalysisContext};
use crate::analysis::keywords::ats_report;
use crate::analysis::SuggestionStatus;
use crate::errors::AppError;
use crate::letter::{generate_letter, LetterRequest, LetterSettings};
use crate::models::application::ApplicationResult;
use crate::session::{ProcessingStep, SessionStatus};
use crate::state::AppState;

fn session_not_found(session_id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {session_id} not found"))
}

/// Spawns research → critique → ATS scoring for a freshly uploaded session.
pub fn spawn_analysis(state: AppState, session_id: Uuid) {
    tokio::spawn(async move {
        if let Err(e) = run_analysis(&state, session_id).await {
            error!("Analysis failed for session {session_id}: {e}");
            state
                .sessions
                .update(session_id, |s| s.fail(format!("Processing failed: {e}")))
                .await;
        }
    });
}

async fn run_analysis(state: &AppState, session_id: Uuid) -> Result<(), AppError> {
    let (cv_text, job_profile, language) = state
        .sessions
        .update(session_id, |s| {
            s.advance(
                SessionStatus::Processing,
                ProcessingStep::ResearchingCompany,
                "Researching company",
            );
            (s.cv_text.clone(), s.job_profile.clone(), s.language.clone())
        })
        .await
        .ok_or_else(|| session_not_found(session_id))?;

    let research = state.researcher.research_company(&job_profile).await?;

    state
        .sessions
        .update(session_id, |s| {
            s.research = Some(research.clone());
            s.advance(
                SessionStatus::Processing,
                ProcessingStep::AnalyzingCv,
                "Analyzing CV sections",
            );
        })
        .await
        .ok_or_else(|| session_not_found(session_id))?;

    let ctx = AnalysisContext {
        job_profile: &job_profile,
        research: &research,
        profile: &state.profile,
        language: &language,
        temperature: state.config.cv_analysis_temperature,
        profile_target_words: state.config.profile_target_words,
    };
    let suggestions = analyze_sections(&state.llm, &cv_text, &ctx).await?;
    let ats = ats_report(&job_profile, &cv_text);
    info!(
        "Session {session_id}: {} suggestions, ATS coverage {}%",
        suggestions.len(),
        ats.coverage_percent
    );

    state
        .sessions
        .update(session_id, |s| {
            s.suggestions = suggestions;
            s.ats_report = Some(ats);
            s.advance(
                SessionStatus::WaitingApproval,
                ProcessingStep::CvSectionApproval,
                "Ready for CV section review",
            );
        })
        .await
        .ok_or_else(|| session_not_found(session_id))?;

    Ok(())
}

/// Generates the letter from every section not skipped, saves the results
/// and completes the session. Only valid from `waiting_approval`.
pub async fn finalize(state: &AppState, session_id: Uuid) -> Result<ApplicationResult, AppError> {
    let snapshot = state
        .sessions
        .update(session_id, |s| {
            if s.status != SessionStatus::WaitingApproval {
                return Err(AppError::Conflict(format!(
                    "Session {session_id} cannot be finalized while {:?}",
                    s.status
                )));
            }
            s.advance(
                SessionStatus::Finalizing,
                ProcessingStep::GeneratingMotivationLetter,
                "Generating motivation letter",
            );
            Ok(s.clone())
        })
        .await
        .ok_or_else(|| session_not_found(session_id))??;

    let outcome = async {
        let research = snapshot.research.as_ref().ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("Session {session_id} has no company research"))
        })?;
        let kept: Vec<_> = snapshot
            .suggestions
            .iter()
            .filter(|s| s.status != SuggestionStatus::Skipped)
            .cloned()
            .collect();

        let letter = generate_letter(
            &state.llm,
            &LetterSettings::from_config(&state.config),
            &LetterRequest {
                job_profile: &snapshot.job_profile,
                research,
                profile: &state.profile,
                sections: &kept,
            },
        )
        .await?;

        let mut result = ApplicationResult {
            session_id,
            timestamp: Utc::now(),
            status: SessionStatus::Completed,
            company_research: Some(research.clone()),
            cv_suggestions: snapshot.suggestions.clone(),
            ats_report: snapshot.ats_report.clone(),
            motivation_letter: Some(letter),
            processing_time_secs: Some(snapshot.elapsed_secs()),
            files_generated: Vec::new(),
        };

        if let Err(e) = state.results.save(&mut result).await {
            warn!("Could not save results for session {session_id}: {e}");
            result.files_generated.clear();
        }
        Ok::<_, AppError>(result)
    }
    .await;

    match outcome {
        Ok(result) => {
            state
                .sessions
                .update(session_id, |s| {
                    s.result = Some(result.clone());
                    s.advance(
                        SessionStatus::Completed,
                        ProcessingStep::Done,
                        "Application materials ready",
                    );
                })
                .await;
            info!("Session {session_id} completed");
            Ok(result)
        }
        Err(e) => {
            error!("Finalize failed for session {session_id}: {e}");
            state
                .sessions
                .update(session_id, |s| s.fail(format!("Letter generation failed: {e}")))
                .await;
            Err(e)
        }
    }
}
