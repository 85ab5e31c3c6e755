// Core types for exam extraction
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One lettered answer choice, `[A]` through `[D]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub letter: char,
    pub text: String,
}

impl QuestionOption {
    pub fn new(letter: char, text: impl Into<String>) -> Self {
        Self {
            letter,
            text: text.into(),
        }
    }
}

/// A numbered question with the images and options found for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBlock {
    /// `None` when the marker digits don't fit a u32.
    pub question_number: Option<u32>,
    pub question_text: String,
    pub images: Vec<PathBuf>,
    pub options: Vec<QuestionOption>,
}

impl QuestionBlock {
    pub fn new(question_number: Option<u32>, question_text: impl Into<String>) -> Self {
        Self {
            question_number,
            question_text: question_text.into(),
            images: Vec::new(),
            options: Vec::new(),
        }
    }
}

// Error types
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("PDF file not found at '{}'", .0.display())]
    NotFound(PathBuf),

    #[error("could not open PDF '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("page {0} not found")]
    MissingPage(usize),

    #[error("malformed PDF: {0}")]
    Malformed(String),

    #[error("unsupported image: {0}")]
    UnsupportedImage(String),

    #[error("image error: {0}")]
    ImageCodec(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not write '{}': {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
