// Question and option segmentation over raw page text
use crate::types::{QuestionBlock, QuestionOption};
use once_cell::sync::Lazy;
use regex::Regex;

// A question number at a word boundary, then a dot and whitespace: "12. "
static QUESTION_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d+)\.\s+").unwrap());

// A bracketed option letter: "[A]" .. "[D]"
static OPTION_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([A-D])\]").unwrap());

/// Split one page of text into question blocks.
///
/// Each block runs from the end of its marker to the start of the next
/// marker (or end of text). Numbers are not checked for order or
/// uniqueness here.
pub fn identify_question_blocks(page_text: &str) -> Vec<QuestionBlock> {
    let markers: Vec<_> = QUESTION_MARKER.captures_iter(page_text).collect();

    markers
        .iter()
        .enumerate()
        .filter_map(|(i, caps)| {
            let marker = caps.get(0)?;
            let body_end = markers
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(page_text.len(), |m| m.start());
            let number = caps[1].parse::<u32>().ok();
            Some(QuestionBlock::new(number, page_text[marker.end()..body_end].trim()))
        })
        .collect()
}

/// Split a question's text into its lettered options, in order of appearance.
pub fn extract_options(question_text: &str) -> Vec<QuestionOption> {
    let markers: Vec<_> = OPTION_MARKER.captures_iter(question_text).collect();

    markers
        .iter()
        .enumerate()
        .filter_map(|(i, caps)| {
            let marker = caps.get(0)?;
            let letter = caps[1].chars().next()?;
            let body_end = markers
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(question_text.len(), |m| m.start());
            Some(QuestionOption::new(letter, question_text[marker.end()..body_end].trim()))
        })
        .collect()
}
