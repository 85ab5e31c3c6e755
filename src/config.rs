// Configuration for exam extraction
use crate::types::{ExtractError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const IMAGES_DIR_NAME: &str = "extracted_images";
pub const TEXT_DIR_NAME: &str = "extracted_text";
pub const CONTENT_FILE_NAME: &str = "extracted_content.json";
pub const REPORT_FILE_NAME: &str = "validation_report.json";

pub const DEFAULT_EXPECTED_QUESTIONS: usize = 35;
pub const DEFAULT_EXPECTED_IMAGES: usize = 50;

pub const UNSORTED: &str = "UNSORTED";

pub const CONFIG_ENV_VAR: &str = "EXAM_EXTRACTOR_CONFIG";
pub const CONFIG_FILE_NAME: &str = "exam_extractor.toml";

/// An inclusive question-number range that defines a section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SectionRange {
    pub name: String,
    pub start: u32,
    pub end: u32,
}

impl SectionRange {
    pub fn new(name: impl Into<String>, start: u32, end: u32) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }

    pub fn contains(&self, number: u32) -> bool {
        self.start <= number && number <= self.end
    }

    fn overlaps(&self, other: &SectionRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExamConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_expected_questions")]
    pub expected_questions: usize,
    #[serde(default = "default_expected_images")]
    pub expected_images: usize,
    #[serde(default)]
    pub dump_text: bool,
    #[serde(default = "default_sections")]
    pub sections: Vec<SectionRange>,
}

fn default_output_dir() -> PathBuf { PathBuf::from(DEFAULT_OUTPUT_DIR) }
fn default_expected_questions() -> usize { DEFAULT_EXPECTED_QUESTIONS }
fn default_expected_images() -> usize { DEFAULT_EXPECTED_IMAGES }

pub fn default_sections() -> Vec<SectionRange> {
    vec![
        SectionRange::new("LOGICAL_REASONING", 1, 15),
        SectionRange::new("MATHEMATICS", 16, 30),
        SectionRange::new("ACHIEVER_SECTION", 31, 35),
    ]
}

impl Default for ExamConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            expected_questions: default_expected_questions(),
            expected_images: default_expected_images(),
            dump_text: false,
            sections: default_sections(),
        }
    }
}

impl ExamConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ExamConfig =
            toml::from_str(content).map_err(|e| ExtractError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ExtractError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Explicit path, then the env var, then `exam_extractor.toml` in the
    /// working directory, then built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return Self::load_from(Path::new(&path));
        }
        let local = Path::new(CONFIG_FILE_NAME);
        if local.exists() {
            return Self::load_from(local);
        }
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<()> {
        for (i, range) in self.sections.iter().enumerate() {
            if range.name.trim().is_empty() {
                return Err(ExtractError::Config("section name must not be empty".into()));
            }
            if range.name == UNSORTED {
                return Err(ExtractError::Config(format!("'{}' is a reserved section name", UNSORTED)));
            }
            if range.start > range.end {
                return Err(ExtractError::Config(format!(
                    "section '{}' starts at {} after its end {}",
                    range.name, range.start, range.end
                )));
            }
            for earlier in &self.sections[..i] {
                if earlier.name == range.name {
                    return Err(ExtractError::Config(format!("duplicate section '{}'", range.name)));
                }
                if earlier.overlaps(range) {
                    return Err(ExtractError::Config(format!(
                        "sections '{}' and '{}' overlap",
                        earlier.name, range.name
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn images_dir(&self) -> PathBuf {
        self.output_dir.join(IMAGES_DIR_NAME)
    }

    pub fn text_dir(&self) -> PathBuf {
        self.output_dir.join(TEXT_DIR_NAME)
    }

    pub fn content_path(&self) -> PathBuf {
        self.output_dir.join(CONTENT_FILE_NAME)
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(REPORT_FILE_NAME)
    }

    pub fn section_names(&self) -> Vec<String> {
        self.sections.iter().map(|s| s.name.clone()).collect()
    }
}
