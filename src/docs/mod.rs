pub mod types;

use std::ops::Range;

use crate::segment;

pub use types::{Answer, Document, PdfData, Section, Text};

impl Text {
    /// Searchable units in display order. A flat body is a single unit 0.
    pub fn units(&self) -> Vec<&str> {
        match self {
            Text::Flat(content) => vec![content.as_str()],
            Text::Sections(sections) => sections.iter().map(|s| s.content.as_str()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.units().iter().all(|unit| unit.is_empty())
    }
}

/// Where a requested page lives in the document body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageLocation<'a> {
    /// Section whose page range contains the page.
    Section { index: usize, section: &'a Section },
    /// Page of a flat body, split on `<br>` markers. `range` is the page's
    /// byte range within the flat body (unit 0).
    FlatPage {
        number: u32,
        content: &'a str,
        range: Range<usize>,
    },
}

impl Document {
    /// Build a document from a `get_pdf` payload. Non-empty `sections` win
    /// over `text_content`; a missing title falls back to `requested_title`.
    pub fn from_pdf_data(data: PdfData, requested_title: &str) -> Self {
        let body = match data.sections {
            Some(sections) if !sections.is_empty() => Text::Sections(sections),
            _ => Text::Flat(data.text_content.unwrap_or_default()),
        };

        Self {
            title: data
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| requested_title.to_string()),
            author: data.author.filter(|a| !a.is_empty()),
            filename: data.filename,
            body,
        }
    }

    /// Highest page number: the largest `end_page` for sectioned bodies, the
    /// number of non-blank `<br>`-separated pages for flat ones.
    pub fn total_pages(&self) -> u32 {
        match &self.body {
            Text::Sections(sections) => sections.iter().map(|s| s.end_page).max().unwrap_or(0),
            Text::Flat(content) => segment::split_pages(content).len() as u32,
        }
    }

    /// Locate a 1-based page. Out-of-range pages yield `None`.
    pub fn locate_page(&self, page: u32) -> Option<PageLocation<'_>> {
        if page == 0 || page > self.total_pages() {
            return None;
        }

        match &self.body {
            Text::Sections(sections) => sections
                .iter()
                .enumerate()
                .find(|(_, s)| s.start_page <= page && s.end_page >= page)
                .map(|(index, section)| PageLocation::Section { index, section }),
            Text::Flat(body) => segment::page_ranges(body)
                .into_iter()
                .nth(page as usize - 1)
                .map(|range| PageLocation::FlatPage {
                    number: page,
                    content: &body[range.clone()],
                    range,
                }),
        }
    }

    pub fn section_count(&self) -> usize {
        self.body.units().len()
    }
}
