//! CV section splitting: maps free-form CV text onto the six canonical sections.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Header lines longer than this are treated as content, not headers.
const MAX_HEADER_WORDS: usize = 6;

/// The canonical CV sections, in analysis order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CvSection {
    ProfessionalProfile,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
}

impl CvSection {
    pub const ALL: [CvSection; 6] = [
        CvSection::ProfessionalProfile,
        CvSection::Experience,
        CvSection::Education,
        CvSection::Skills,
        CvSection::Projects,
        CvSection::Certifications,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CvSection::ProfessionalProfile => "Professional Profile",
            CvSection::Experience => "Experience",
            CvSection::Education => "Education",
            CvSection::Skills => "Skills",
            CvSection::Projects => "Projects",
            CvSection::Certifications => "Certifications",
        }
    }

    /// Case-insensitive lookup by display name.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }

    fn header_pattern(self) -> &'static Regex {
        &HEADER_PATTERNS[self as usize]
    }
}

impl fmt::Display for CvSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for CvSection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for CvSection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        CvSection::from_name(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown CV section: {raw}")))
    }
}

// Indexed by `CvSection as usize`.
static HEADER_PATTERNS: LazyLock<[Regex; 6]> = LazyLock::new(|| {
    [
        r"(?i)\b(professional\s+profile|profile|summary|objective)\b",
        r"(?i)\b(work\s+experience|experience|employment|career)\b",
        r"(?i)\b(education|academic|qualifications)\b",
        r"(?i)\b(technical\s+skills|skills|competencies)\b",
        r"(?i)\b(key\s+projects|notable\s+projects|projects)\b",
        r"(?i)\b(certifications?|certificates?|credentials)\b",
    ]
    .map(|p| Regex::new(p).expect("section header pattern is valid"))
});

/// Returns the section a line introduces, if it looks like a header.
fn detect_header(line: &str) -> Option<CvSection> {
    let candidate = line.trim().trim_end_matches(':').trim();
    if candidate.is_empty() || candidate.split_whitespace().count() > MAX_HEADER_WORDS {
        return None;
    }
    CvSection::ALL
        .into_iter()
        .find(|s| s.header_pattern().is_match(candidate))
}

/// Splits a CV into canonical sections.
///
/// Lines before the first header are dropped; a repeated header appends to the
/// existing section. A CV without any recognizable header is returned whole as
/// `Experience`.
pub fn extract_sections(cv_text: &str) -> BTreeMap<CvSection, String> {
    let mut sections: BTreeMap<CvSection, Vec<&str>> = BTreeMap::new();
    let mut current: Option<CvSection> = None;

    for line in cv_text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(section) = detect_header(line) {
            current = Some(section);
            sections.entry(section).or_default();
            continue;
        }
        if let Some(section) = current {
            sections.entry(section).or_default().push(line);
        }
    }

    let sections: BTreeMap<CvSection, String> = sections
        .into_iter()
        .filter(|(_, lines)| !lines.is_empty())
        .map(|(section, lines)| (section, lines.join("\n")))
        .collect();

    if sections.is_empty() {
        let whole = cv_text.trim();
        if whole.is_empty() {
            return BTreeMap::new();
        }
        return BTreeMap::from([(CvSection::Experience, whole.to_string())]);
    }

    sections
}
