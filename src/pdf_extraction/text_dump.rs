// Raw page text dumps for inspecting what the segmenter saw
use crate::types::{ExtractError, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const COMPLETE_TEXT_FILE: &str = "complete_document_text.txt";

pub fn page_text_file_name(page_index: usize) -> String {
    format!("page_{}_text.txt", page_index + 1)
}

/// Write one file per page plus a whole-document file into `text_dir`.
pub fn write_page_texts(text_dir: &Path, pages: &[String]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(text_dir)?;
    let mut written = Vec::with_capacity(pages.len() + 1);

    for (i, text) in pages.iter().enumerate() {
        let path = text_dir.join(page_text_file_name(i));
        write(&path, &format!("=== PAGE {} ===\n\n{}", i + 1, text))?;
        written.push(path);
    }

    let rule = "=".repeat(30);
    let mut complete = String::from("=== COMPLETE DOCUMENT TEXT ===\n\n");
    for (i, text) in pages.iter().enumerate() {
        complete.push_str(&format!("\n{} PAGE {} {}\n\n", rule, i + 1, rule));
        complete.push_str(text);
    }
    let path = text_dir.join(COMPLETE_TEXT_FILE);
    write(&path, &complete)?;
    written.push(path);

    Ok(written)
}

fn write(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|source| ExtractError::Persist {
        path: path.to_path_buf(),
        source,
    })
}
