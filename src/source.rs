use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Supplies the linearized text of a document, one string per page.
pub trait PageSource {
    fn pages(&self) -> Result<Vec<String>>;
}

/// Plain-text dump of a document on disk, pages separated by form feed
/// (the layout `pdftotext` produces).
pub struct TextDocument {
    path: PathBuf,
}

impl TextDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TextDocument { path: path.into() }
    }
}

impl PageSource for TextDocument {
    fn pages(&self) -> Result<Vec<String>> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {:?}", self.path))?;
        Ok(split_pages(&raw))
    }
}

impl PageSource for [&str] {
    fn pages(&self) -> Result<Vec<String>> {
        Ok(self.iter().map(|p| p.to_string()).collect())
    }
}

pub fn split_pages(raw: &str) -> Vec<String> {
    let mut pages: Vec<String> = raw
        .replace("\r\n", "\n")
        .split('\x0c')
        .map(str::to_string)
        .collect();
    // pdftotext ends every page with a form feed
    if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
        pages.pop();
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_on_form_feed() {
        let pages = split_pages("a\nb\x0cc\r\nd\x0c");
        assert_eq!(pages, vec!["a\nb".to_string(), "c\nd".to_string()]);
    }

    #[test]
    fn single_page() {
        assert_eq!(split_pages("only"), vec!["only".to_string()]);
        assert_eq!(split_pages(""), vec![String::new()]);
    }

    #[test]
    fn in_memory_source() {
        let pages: &[&str] = &["p1", "p2"];
        assert_eq!(pages.pages().unwrap().len(), 2);
    }

    #[test]
    fn missing_file() {
        let err = TextDocument::new("tests/fixtures/does_not_exist.txt")
            .pages()
            .unwrap_err();
        assert!(format!("{:#}", err).contains("does_not_exist"));
    }
}
