//! Document ingestion: turns uploaded CV / job profile files into plain text.
//!
//! Supported: PDF (via `pdf-extract`), DOCX (zip + WordprocessingML), TXT (UTF-8).

use std::path::Path;

use thiserror::Error;
use tracing::debug;

mod docx;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Unsupported file type: {0}. Supported: .pdf, .docx, .txt")]
    UnsupportedType(String),

    #[error("File is {size} bytes; the limit is {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("File is empty")]
    Empty,

    #[error("Could not read PDF: {0}")]
    Pdf(String),

    #[error("Could not read DOCX: {0}")]
    Docx(String),

    #[error("Text file is not valid UTF-8")]
    Encoding,
}

/// File formats accepted for CVs and job profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
}

impl DocumentKind {
    /// Resolves the kind from a file name's extension (case-insensitive).
    pub fn from_filename(filename: &str) -> Result<Self, DocumentError> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "docx" => Ok(DocumentKind::Docx),
            "txt" => Ok(DocumentKind::Txt),
            "" => Err(DocumentError::UnsupportedType("(none)".to_string())),
            other => Err(DocumentError::UnsupportedType(format!(".{other}"))),
        }
    }
}

/// Extracts normalized plain text from an uploaded file.
///
/// PDF extraction is CPU-bound and runs on the blocking pool.
pub async fn extract_text(
    filename: &str,
    bytes: bytes::Bytes,
    max_bytes: usize,
) -> Result<String, DocumentError> {
    let kind = DocumentKind::from_filename(filename)?;

    if bytes.len() > max_bytes {
        return Err(DocumentError::TooLarge {
            size: bytes.len(),
            max: max_bytes,
        });
    }
    if bytes.is_empty() {
        return Err(DocumentError::Empty);
    }

    let raw = match kind {
        DocumentKind::Txt => decode_utf8(&bytes)?,
        DocumentKind::Docx => docx::extract(&bytes)?,
        DocumentKind::Pdf => tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&bytes).map_err(|e| DocumentError::Pdf(e.to_string()))
        })
        .await
        .map_err(|e| DocumentError::Pdf(e.to_string()))??,
    };

    let text = normalize(&raw);
    if text.is_empty() {
        return Err(DocumentError::Empty);
    }

    debug!(filename, ?kind, chars = text.len(), "Extracted document text");
    Ok(text)
}

fn decode_utf8(bytes: &[u8]) -> Result<String, DocumentError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8(bytes.to_vec()).map_err(|_| DocumentError::Encoding)
}

/// CRLF → LF, trailing whitespace stripped from every line, outer blank lines removed.
fn normalize(raw: &str) -> String {
    raw.replace("\r\n", "\n")
        .replace('\r', "\n")
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
