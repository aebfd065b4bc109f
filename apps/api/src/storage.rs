//! Local result files under `<DATA_DIR>/output`.
//!
//! Layout:
//!   motivation_letters/letter_<id>.txt
//!   cv_suggestions/suggestions_<id>.json
//!   sessions/session_<id>.json

use std::io;
use std::path::{Path, PathBuf};

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::info;
use uuid::Uuid;

use crate::analysis::{SectionSuggestion, SuggestionStatus};
use crate::models::application::ApplicationResult;

const LETTERS_DIR: &str = "motivation_letters";
const SUGGESTIONS_DIR: &str = "cv_suggestions";
const SESSIONS_DIR: &str = "sessions";

#[derive(Debug, Clone)]
pub struct ResultStore {
    root: PathBuf,
    enabled: bool,
}

impl ResultStore {
    pub fn new(root: impl Into<PathBuf>, enabled: bool) -> Self {
        Self {
            root: root.into(),
            enabled,
        }
    }

    fn letter_path(&self, session_id: Uuid) -> PathBuf {
        self.root
            .join(LETTERS_DIR)
            .join(format!("letter_{session_id}.txt"))
    }

    fn suggestions_path(&self, session_id: Uuid) -> PathBuf {
        self.root
            .join(SUGGESTIONS_DIR)
            .join(format!("suggestions_{session_id}.json"))
    }

    fn session_path(&self, session_id: Uuid) -> PathBuf {
        self.root
            .join(SESSIONS_DIR)
            .join(format!("session_{session_id}.json"))
    }

    /// Writes every artifact of `result` and records the paths in
    /// `result.files_generated`. No-op when saving is disabled.
    pub async fn save(&self, result: &mut ApplicationResult) -> io::Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let id = result.session_id;
        let mut files = Vec::with_capacity(3);

        if let Some(letter) = &result.motivation_letter {
            let path = self.letter_path(id);
            write_file(&path, letter.text.as_bytes()).await?;
            files.push(path);
        }

        let path = self.suggestions_path(id);
        write_file(&path, &suggestions_json(&result.cv_suggestions)?).await?;
        files.push(path);

        let session_path = self.session_path(id);
        files.push(session_path.clone());
        result.files_generated = files.iter().map(|p| p.display().to_string()).collect();
        write_file(&session_path, &serde_json::to_vec_pretty(result)?).await?;

        info!("Saved {} result files for session {id}", files.len());
        Ok(())
    }

    pub async fn load_letter(&self, session_id: Uuid) -> io::Result<Option<String>> {
        match tokio::fs::read_to_string(self.letter_path(session_id)).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn load_suggestions(&self, session_id: Uuid) -> io::Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.suggestions_path(session_id)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

async fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await
}

/// `{"<section name>": "<suggestions>", ...}` for every section not skipped,
/// in canonical order.
pub fn suggestions_json(suggestions: &[SectionSuggestion]) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec_pretty(&KeptSuggestions(suggestions))
}

struct KeptSuggestions<'a>(&'a [SectionSuggestion]);

impl Serialize for KeptSuggestions<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for s in self.0.iter().filter(|s| s.status != SuggestionStatus::Skipped) {
            map.serialize_entry(s.section.name(), &s.suggestions)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::analysis::CvSection;
    use crate::letter::text::readability;
    use crate::letter::MotivationLetter;
    use crate::session::SessionStatus;

    fn suggestion(section: CvSection, status: SuggestionStatus) -> SectionSuggestion {
        SectionSuggestion {
            section,
            original_content: String::new(),
            suggestions: format!("Improve {section}"),
            status,
        }
    }

    fn result() -> ApplicationResult {
        ApplicationResult {
            session_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            status: SessionStatus::Completed,
            company_research: None,
            cv_suggestions: vec![
                suggestion(CvSection::Skills, SuggestionStatus::Approved),
                suggestion(CvSection::Projects, SuggestionStatus::Skipped),
                suggestion(CvSection::Certifications, SuggestionStatus::Modified),
            ],
            ats_report: None,
            motivation_letter: Some(MotivationLetter {
                text: "Hello Acme.".to_string(),
                word_count: 2,
                within_target: false,
                readability: readability("Hello Acme."),
            }),
            processing_time_secs: Some(1.5),
            files_generated: Vec::new(),
        }
    }

    #[test]
    fn test_suggestions_json_skips_skipped_and_keeps_order() {
        let bytes = suggestions_json(&result().cv_suggestions).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(!text.contains("Projects"));
        let skills = text.find("\"Skills\"").unwrap();
        let certs = text.find("\"Certifications\"").unwrap();
        assert!(skills < certs);
    }

    #[tokio::test]
    async fn test_save_writes_all_files_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path(), true);
        let mut result = result();
        let id = result.session_id;

        store.save(&mut result).await.unwrap();

        assert_eq!(result.files_generated.len(), 3);
        assert!(dir
            .path()
            .join(format!("sessions/session_{id}.json"))
            .exists());
        assert_eq!(store.load_letter(id).await.unwrap().unwrap(), "Hello Acme.");

        let suggestions: serde_json::Value =
            serde_json::from_slice(&store.load_suggestions(id).await.unwrap().unwrap()).unwrap();
        assert_eq!(suggestions["Skills"], "Improve Skills");

        let saved: ApplicationResult = serde_json::from_slice(
            &std::fs::read(dir.path().join(format!("sessions/session_{id}.json"))).unwrap(),
        )
        .unwrap();
        assert_eq!(saved.files_generated, result.files_generated);
    }

    #[tokio::test]
    async fn test_disabled_store_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path().join("output"), false);
        let mut result = result();

        store.save(&mut result).await.unwrap();

        assert!(result.files_generated.is_empty());
        assert!(!dir.path().join("output").exists());
    }

    #[tokio::test]
    async fn test_missing_files_load_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path(), true);
        assert!(store.load_letter(Uuid::new_v4()).await.unwrap().is_none());
        assert!(store.load_suggestions(Uuid::new_v4()).await.unwrap().is_none());
    }
}
