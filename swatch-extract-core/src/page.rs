//! Cached per-page content.
//!
//! Page text and word positions are computed once when the document
//! is loaded and held for the whole run; the document is read-only,
//! so the cache is never invalidated.

use crate::geometry::Rect;

/// A positioned text fragment on a page, as reported by the document
/// parser. The raw display text is preserved; normalization happens
/// only at comparison time.
#[derive(Debug, Clone)]
pub struct Word {
    /// Bounding box in page coordinates
    pub rect: Rect,
    /// Raw text of the fragment, original casing intact
    pub text: String,
}

impl Word {
    /// Create a new word record
    pub fn new(rect: Rect, text: impl Into<String>) -> Self {
        Self {
            rect,
            text: text.into(),
        }
    }
}

/// Everything the labeling pipeline needs from one page
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    /// Full page text, used for series detection
    pub text: String,
    /// Positioned words, used for color label lookup
    pub words: Vec<Word>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_keeps_raw_text() {
        let word = Word::new(Rect::new(0.0, 0.0, 10.0, 10.0), "Pewter  Gray");
        assert_eq!(word.text, "Pewter  Gray");
    }

    #[test]
    fn test_page_content_default_is_empty() {
        let page = PageContent::default();
        assert!(page.text.is_empty());
        assert!(page.words.is_empty());
    }
}
