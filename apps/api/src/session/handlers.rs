//! Axum route handlers for the Session API.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::analysis::{AtsReport, SectionSuggestion};
use crate::documents::{extract_text, DocumentKind};
use crate::errors::AppError;
use crate::models::application::ApplicationResult;
use crate::session::interaction::{interact, InteractionRequest, InteractionResponse};
use crate::session::validation::{validate_job_profile, validate_language};
use crate::session::workflow::{finalize, spawn_analysis};
use crate::session::{ProcessingStep, Session, SessionStatus, SessionStatusResponse};
use crate::state::AppState;
use crate::storage::suggestions_json;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub session_id: Uuid,
    pub status: SessionStatus,
    pub company_name: Option<String>,
    pub suggestions: Vec<SectionSuggestion>,
    pub ats_report: Option<AtsReport>,
}

struct UploadedFile {
    filename: String,
    bytes: Bytes,
}

#[derive(Default)]
struct UploadForm {
    cv_file: Option<UploadedFile>,
    job_profile_file: Option<UploadedFile>,
    job_profile_text: Option<String>,
    cv_language: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn parse_session_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("Session {raw} not found")))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::Validation(format!("Invalid multipart body: {}", err.body_text()))
    }
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().map(str::to_string);

        match (name.as_str(), filename) {
            ("cv_file", Some(filename)) => {
                let bytes = field.bytes().await.map_err(multipart_error)?;
                form.cv_file = Some(UploadedFile { filename, bytes });
            }
            ("job_profile", Some(filename)) => {
                let bytes = field.bytes().await.map_err(multipart_error)?;
                form.job_profile_file = Some(UploadedFile { filename, bytes });
            }
            ("job_profile" | "job_profile_text", None) => {
                form.job_profile_text = Some(field.text().await.map_err(multipart_error)?);
            }
            ("cv_language", _) => {
                form.cv_language = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    Ok(form)
}

fn attachment(content_type: &'static str, filename: String, body: impl Into<axum::body::Body>) -> Response {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body.into(),
    )
        .into_response()
}

/// The completed in-memory result, or `None` when the session is unknown here.
/// A session that exists but has not completed is a conflict.
async fn completed_result(
    state: &AppState,
    session_id: Uuid,
) -> Result<Option<ApplicationResult>, AppError> {
    match state.sessions.read(session_id, |s| s.result.clone()).await {
        None => Ok(None),
        Some(Some(result)) => Ok(Some(result)),
        Some(None) => Err(AppError::Conflict(format!(
            "Session {session_id} is not completed yet"
        ))),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/upload-and-process
///
/// Multipart: `cv_file`, `job_profile` (file) or `job_profile_text`, `cv_language`.
/// Extracts text, creates the session and starts background analysis.
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SessionStatusResponse>, AppError> {
    let form = read_form(multipart).await?;
    let max_bytes = state.config.max_file_size_bytes();

    let cv_file = form
        .cv_file
        .ok_or_else(|| AppError::Validation("cv_file is required".to_string()))?;
    DocumentKind::from_filename(&cv_file.filename)?;
    let language = validate_language(form.cv_language.as_deref())?;

    let job_profile = match (form.job_profile_file, form.job_profile_text) {
        (Some(file), _) => extract_text(&file.filename, file.bytes, max_bytes).await?,
        (None, Some(text)) => text,
        (None, None) => {
            return Err(AppError::Validation(
                "Provide a job_profile file or job_profile_text".to_string(),
            ))
        }
    };
    let job_profile = validate_job_profile(&job_profile)?;

    let cv_text = extract_text(&cv_file.filename, cv_file.bytes, max_bytes).await?;

    let mut session = Session::new(cv_text, job_profile, language);
    session.advance(
        SessionStatus::Processing,
        ProcessingStep::ParsingCv,
        "CV parsed, starting analysis",
    );
    let response = session.status_response();
    let session_id = session.id;
    info!("Created session {session_id} for {}", cv_file.filename);

    state.sessions.insert(session).await;
    spawn_analysis(state.clone(), session_id);

    Ok(Json(response))
}

/// GET /api/v1/status/:session_id
pub async fn handle_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionStatusResponse>, AppError> {
    let session_id = parse_session_id(&session_id)?;
    state
        .sessions
        .read(session_id, Session::status_response)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))
}

/// GET /api/v1/sessions/:session_id/suggestions
pub async fn handle_suggestions(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SuggestionsResponse>, AppError> {
    let session_id = parse_session_id(&session_id)?;
    state
        .sessions
        .read(session_id, |s| SuggestionsResponse {
            session_id,
            status: s.status,
            company_name: s.research.as_ref().map(|r| r.company_name.clone()),
            suggestions: s.suggestions.clone(),
            ats_report: s.ats_report.clone(),
        })
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))
}

/// POST /api/v1/interact
pub async fn handle_interact(
    State(state): State<AppState>,
    Json(request): Json<InteractionRequest>,
) -> Result<Json<InteractionResponse>, AppError> {
    Ok(Json(interact(&state, request).await?))
}

/// POST /api/v1/finalize/:session_id
pub async fn handle_finalize(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApplicationResult>, AppError> {
    let session_id = parse_session_id(&session_id)?;
    Ok(Json(finalize(&state, session_id).await?))
}

/// GET /api/v1/download/:session_id/motivation-letter
pub async fn handle_download_letter(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Response, AppError> {
    let session_id = parse_session_id(&session_id)?;

    let text = match completed_result(&state, session_id).await? {
        Some(result) => result.motivation_letter.map(|l| l.text),
        None => state.results.load_letter(session_id).await?,
    }
    .ok_or_else(|| AppError::NotFound(format!("No motivation letter for session {session_id}")))?;

    Ok(attachment(
        "text/plain; charset=utf-8",
        format!("motivation_letter_{session_id}.txt"),
        text,
    ))
}

/// GET /api/v1/download/:session_id/cv-suggestions
pub async fn handle_download_suggestions(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Response, AppError> {
    let session_id = parse_session_id(&session_id)?;

    let json = match completed_result(&state, session_id).await? {
        Some(result) => Some(
            suggestions_json(&result.cv_suggestions)
                .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode suggestions: {e}")))?,
        ),
        None => state.results.load_suggestions(session_id).await?,
    }
    .ok_or_else(|| AppError::NotFound(format!("No CV suggestions for session {session_id}")))?;

    Ok(attachment(
        "application/json",
        format!("cv_suggestions_{session_id}.json"),
        json,
    ))
}
