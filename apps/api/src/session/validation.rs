use crate::errors::AppError;

pub const MIN_JOB_PROFILE_CHARS: usize = 50;
pub const SUPPORTED_LANGUAGES: [&str; 4] = ["English", "German", "French", "Spanish"];
pub const DEFAULT_LANGUAGE: &str = "English";

/// Returns the trimmed job profile, or a validation error when it is too short.
pub fn validate_job_profile(text: &str) -> Result<String, AppError> {
    let trimmed = text.trim();
    let chars = trimmed.chars().count();
    if chars < MIN_JOB_PROFILE_CHARS {
        return Err(AppError::Validation(format!(
            "Job profile must be at least {MIN_JOB_PROFILE_CHARS} characters (got {chars})"
        )));
    }
    Ok(trimmed.to_string())
}

/// Resolves the CV language case-insensitively to its canonical name.
/// Missing or blank input means English.
pub fn validate_language(raw: Option<&str>) -> Result<String, AppError> {
    let requested = raw.map(str::trim).filter(|l| !l.is_empty());
    let Some(requested) = requested else {
        return Ok(DEFAULT_LANGUAGE.to_string());
    };

    SUPPORTED_LANGUAGES
        .iter()
        .find(|l| l.eq_ignore_ascii_case(requested))
        .map(|l| l.to_string())
        .ok_or_else(|| {
            AppError::Validation(format!(
                "Unsupported CV language '{requested}'. Supported: {}",
                SUPPORTED_LANGUAGES.join(", ")
            ))
        })
}

/// Returns the trimmed text of a required free-text field.
pub fn require_text<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, AppError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{field} is required for this action")))
}
