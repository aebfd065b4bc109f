//! CV Analysis: section splitting, LLM critique per section and ATS keyword coverage.

pub mod critique;
pub mod keywords;
pub mod prompts;
pub mod sections;

pub use critique::{SectionSuggestion, SuggestionStatus};
pub use keywords::AtsReport;
pub use sections::CvSection;
