use thiserror::Error;

use crate::segment;

/// Maximum characters shown for a quote in the selection list.
pub const PREVIEW_CHARS: usize = 50;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("selection index {index} out of range ({len} selections)")]
    OutOfRange { index: usize, len: usize },
}

/// Quotes the user selected, in the order they were made. Duplicates are
/// kept; a quote has no identity beyond its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    quotes: Vec<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a selection. Blank text is ignored; returns whether it was added.
    pub fn add_selection(&mut self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        self.quotes.push(text.to_string());
        true
    }

    pub fn remove_at(&mut self, index: usize) -> Result<String, SelectionError> {
        if index >= self.quotes.len() {
            return Err(SelectionError::OutOfRange {
                index,
                len: self.quotes.len(),
            });
        }
        Ok(self.quotes.remove(index))
    }

    pub fn clear(&mut self) {
        self.quotes.clear();
    }

    /// Remove one occurrence of every quote in `sent`, first match first.
    /// Quotes added since `sent` was taken stay in place.
    pub fn remove_sent(&mut self, sent: &[String]) {
        for quote in sent {
            if let Some(pos) = self.quotes.iter().position(|q| q == quote) {
                self.quotes.remove(pos);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.quotes
    }

    /// Quotes joined with newlines, in selection order.
    pub fn joined(&self) -> String {
        self.quotes.join("\n")
    }

    /// Each quote cut to [`PREVIEW_CHARS`] characters for display.
    pub fn previews(&self) -> Vec<String> {
        self.quotes
            .iter()
            .map(|q| segment::truncate_chars(q, PREVIEW_CHARS))
            .collect()
    }
}
