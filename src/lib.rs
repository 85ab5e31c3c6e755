// Exam booklet extraction: PDF questions, images and options by section
pub mod associator;
pub mod config;
pub mod content_extractor;
pub mod logging;
pub mod pdf_extraction;
pub mod sections;
pub mod segmenter;
pub mod types;
pub mod validator;

pub use config::{ExamConfig, SectionRange};
pub use content_extractor::{write_json, ContentExtractor, Extraction};
pub use sections::OrganizedContent;
pub use types::{ExtractError, QuestionBlock, QuestionOption};
pub use validator::{ContentValidator, Status, ValidationReport};
