// Extraction orchestrator: PDF pages -> question blocks -> sections
use crate::associator::associate_images_with_questions;
use crate::config::ExamConfig;
use crate::logging::truncate_text;
use crate::pdf_extraction::{extract_images_from_page, write_page_texts, PageSource, PdfDocument};
use crate::sections::{organize_by_sections, OrganizedContent};
use crate::segmenter::identify_question_blocks;
use crate::types::{ExtractError, QuestionBlock, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Outcome of extracting a document.
#[derive(Debug)]
pub enum Extraction {
    Content(OrganizedContent),
    /// The document could not be opened; `content` has every bucket empty.
    Empty {
        diagnostic: String,
        content: OrganizedContent,
    },
}

impl Extraction {
    pub fn content(&self) -> &OrganizedContent {
        match self {
            Extraction::Content(content) | Extraction::Empty { content, .. } => content,
        }
    }

    pub fn into_content(self) -> OrganizedContent {
        match self {
            Extraction::Content(content) | Extraction::Empty { content, .. } => content,
        }
    }

    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Extraction::Empty { diagnostic, .. } => Some(diagnostic.as_str()),
            Extraction::Content(_) => None,
        }
    }
}

pub struct ContentExtractor {
    config: ExamConfig,
}

impl ContentExtractor {
    pub fn new(config: ExamConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExamConfig {
        &self.config
    }

    /// Create the output directories; safe to call repeatedly.
    pub fn setup_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.config.output_dir)?;
        fs::create_dir_all(self.config.images_dir())?;
        if self.config.dump_text {
            fs::create_dir_all(self.config.text_dir())?;
        }
        Ok(())
    }

    /// Extract and classify every question of the PDF at `pdf_path`.
    ///
    /// A document that can't be opened gives `Extraction::Empty` rather
    /// than an error. Failures while processing pages are returned.
    pub fn extract_all_content(&self, pdf_path: &Path) -> Result<Extraction> {
        let document = match PdfDocument::open(pdf_path) {
            Ok(document) => document,
            Err(e @ ExtractError::Open { .. }) => {
                warn!(path = %pdf_path.display(), error = %e, "Could not open PDF");
                return Ok(Extraction::Empty {
                    diagnostic: e.to_string(),
                    content: OrganizedContent::empty(&self.config.sections),
                });
            }
            Err(e) => return Err(e),
        };

        let content = self.extract_from_source(&document)?;
        drop(document);
        Ok(Extraction::Content(content))
    }

    /// Run the page pipeline over any page source.
    pub fn extract_from_source<S: PageSource + ?Sized>(&self, source: &S) -> Result<OrganizedContent> {
        let images_dir = self.config.images_dir();
        fs::create_dir_all(&images_dir)?;

        let page_count = source.page_count();
        info!(pages = page_count, "Extracting content");

        let mut all_blocks: Vec<QuestionBlock> = Vec::new();
        let mut page_texts = Vec::new();

        for page_index in 0..page_count {
            let page_text = source.page_text(page_index)?;
            let image_refs = source.page_images(page_index)?;
            let page_images = extract_images_from_page(source, &image_refs, page_index, &images_dir);

            let question_blocks = identify_question_blocks(&page_text);
            let with_assets = associate_images_with_questions(question_blocks, &page_images);

            for block in &with_assets {
                debug!(
                    page = page_index + 1,
                    question = ?block.question_number,
                    images = block.images.len(),
                    options = block.options.len(),
                    text = %truncate_text(&block.question_text, 40),
                    "question block"
                );
            }
            info!(
                page = page_index + 1,
                questions = with_assets.len(),
                images = page_images.len(),
                skipped_images = image_refs.len() - page_images.len(),
                "Processed page"
            );

            all_blocks.extend(with_assets);
            if self.config.dump_text {
                page_texts.push(page_text);
            }
        }

        if self.config.dump_text {
            let written = write_page_texts(&self.config.text_dir(), &page_texts)?;
            info!(files = written.len(), dir = %self.config.text_dir().display(), "Wrote page text");
        }

        let organized = organize_by_sections(all_blocks, &self.config.sections);
        info!(
            classified = organized.classified_count(),
            unsorted = organized.unsorted().len(),
            "Organized questions by section"
        );
        Ok(organized)
    }
}

/// Pretty-print `value` as JSON (2-space indent, UTF-8) to `path`.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let persist = |source: std::io::Error| ExtractError::Persist {
        path: path.to_path_buf(),
        source,
    };
    let json = serde_json::to_string_pretty(value).map_err(|e| persist(e.into()))?;
    fs::write(path, json).map_err(persist)
}
