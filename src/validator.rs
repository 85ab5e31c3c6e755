// Extraction quality scoring and report generation
use crate::config::ExamConfig;
use crate::sections::OrganizedContent;
use crate::types::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub const PASS_THRESHOLD: f64 = 80.0;

const TEXT_WEIGHT: f64 = 0.4;
const IMAGE_WEIGHT: f64 = 0.3;
const STRUCTURE_WEIGHT: f64 = 0.3;

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Score of a single validation pass and the issues it found.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreStep {
    pub score: f64,
    pub issues: Vec<String>,
}

impl ScoreStep {
    fn perfect() -> Self {
        Self { score: 100.0, issues: Vec::new() }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

// `numerator/denominator` share reached, in exact arithmetic
fn meets_share(count: usize, expected: usize, numerator: u128, denominator: u128) -> bool {
    denominator * count as u128 >= numerator * expected as u128
}

fn ratio_score(count: usize, expected: usize) -> f64 {
    round2(100.0 * count as f64 / expected as f64)
}

/// 100 when at least 90% of the expected questions were classified.
pub fn validate_text_extraction(content: &OrganizedContent, expected_questions: usize) -> ScoreStep {
    let count = content.classified_count();
    if meets_share(count, expected_questions, 9, 10) {
        return ScoreStep::perfect();
    }
    ScoreStep {
        score: ratio_score(count, expected_questions),
        issues: vec![format!(
            "Text Extraction: Expected ~{} questions, found {}.",
            expected_questions, count
        )],
    }
}

/// 100 when the images directory holds at least 80% of the expected files.
pub fn validate_image_extraction(images_dir: &Path, expected_images: usize) -> Result<ScoreStep> {
    if !images_dir.is_dir() {
        return Ok(ScoreStep {
            score: 0.0,
            issues: vec!["Image Extraction: No images directory found.".to_string()],
        });
    }

    let mut count = 0;
    for entry in fs::read_dir(images_dir)? {
        let path = entry?.path();
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| IMAGE_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)));
        if is_image {
            count += 1;
        }
    }
    debug!(dir = %images_dir.display(), count, "counted image files");

    if meets_share(count, expected_images, 8, 10) {
        return Ok(ScoreStep::perfect());
    }
    Ok(ScoreStep {
        score: ratio_score(count, expected_images),
        issues: vec![format!(
            "Image Extraction: Expected ~{} images, found {}.",
            expected_images, count
        )],
    })
}

/// Half for having every expected section populated, half for keeping
/// UNSORTED under 5% of the classified total.
pub fn validate_structure_accuracy(content: &OrganizedContent, expected_sections: &[String]) -> ScoreStep {
    let mut score = 0.0;
    let mut issues = Vec::new();

    let mut all_present = true;
    for name in expected_sections {
        if content.get(name).map_or(true, |blocks| blocks.is_empty()) {
            all_present = false;
            issues.push(format!("Structure Accuracy: Missing or empty section '{}'.", name));
        }
    }
    if all_present {
        score += 50.0;
    }

    let unsorted = content.unsorted().len();
    let classified = content.classified_count();
    // unsorted / classified < 0.05
    if classified > 0 && !meets_share(unsorted, classified, 1, 20) {
        score += 50.0;
    } else if unsorted > 0 {
        issues.push(format!("Structure Accuracy: {} items found in 'UNSORTED' section.", unsorted));
    } else {
        issues.push("Structure Accuracy: No classified questions found.".to_string());
    }

    ScoreStep { score, issues }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub text_extraction_score: f64,
    pub image_extraction_score: f64,
    pub structure_accuracy_score: f64,
    pub overall_score: f64,
    pub issues: Vec<String>,
}

impl ValidationResult {
    /// Weighted 40/30/30 combination; issues keep text, image, structure order.
    pub fn combine(text: ScoreStep, image: ScoreStep, structure: ScoreStep) -> Self {
        let overall = round2(
            TEXT_WEIGHT * text.score + IMAGE_WEIGHT * image.score + STRUCTURE_WEIGHT * structure.score,
        );
        let issues = [text.issues, image.issues, structure.issues].concat();
        Self {
            text_extraction_score: text.score,
            image_extraction_score: image.score,
            structure_accuracy_score: structure.score,
            overall_score: overall,
            issues,
        }
    }

    pub fn status(&self) -> Status {
        if self.overall_score >= PASS_THRESHOLD {
            Status::Pass
        } else {
            Status::Fail
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pass,
    Fail,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Pass => write!(f, "PASS"),
            Status::Fail => write!(f, "FAIL"),
        }
    }
}

pub fn generate_recommendations(result: &ValidationResult) -> Vec<String> {
    let mut recommendations = Vec::new();
    if result.overall_score < PASS_THRESHOLD {
        recommendations.push("Overall score below 80%. Review extraction process.".to_string());
    }
    if result.text_extraction_score < 90.0 {
        recommendations.push("Text extraction quality is low. Check PDF text layer or regex patterns.".to_string());
    }
    if result.image_extraction_score < 80.0 {
        recommendations.push("Image extraction quality is low. Verify image paths and extraction logic.".to_string());
    }
    if result.structure_accuracy_score < 100.0 {
        recommendations.push(
            "Structural organization is not perfect. Review sectioning logic or expected structure.".to_string(),
        );
    }
    if !result.issues.is_empty() {
        recommendations.push("Specific issues identified:".to_string());
        recommendations.extend(result.issues.iter().cloned());
    }
    if recommendations.is_empty() {
        recommendations.push("No specific recommendations. Extraction seems good.".to_string());
    }
    recommendations
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub timestamp: String,
    pub scores: ValidationResult,
    pub status: Status,
    pub recommendations: Vec<String>,
}

impl ValidationReport {
    pub fn generate(scores: ValidationResult) -> Self {
        Self {
            timestamp: chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            status: scores.status(),
            recommendations: generate_recommendations(&scores),
            scores,
        }
    }
}

pub struct ContentValidator {
    pub expected_questions: usize,
    pub expected_images: usize,
    pub expected_sections: Vec<String>,
}

impl ContentValidator {
    pub fn from_config(config: &ExamConfig) -> Self {
        Self {
            expected_questions: config.expected_questions,
            expected_images: config.expected_images,
            expected_sections: config.section_names(),
        }
    }

    pub fn validate_extraction(&self, content: &OrganizedContent, images_dir: &Path) -> Result<ValidationReport> {
        let text = validate_text_extraction(content, self.expected_questions);
        let image = validate_image_extraction(images_dir, self.expected_images)?;
        let structure = validate_structure_accuracy(content, &self.expected_sections);

        let result = ValidationResult::combine(text, image, structure);
        info!(
            text = result.text_extraction_score,
            image = result.image_extraction_score,
            structure = result.structure_accuracy_score,
            overall = result.overall_score,
            "Validation scores"
        );
        Ok(ValidationReport::generate(result))
    }
}
