use tracing::info;

use quote_reader::docs::PageLocation;
use quote_reader::{segment, ReaderBackend, ReaderPage, Text};

use crate::view;

/// Load a document and summarize it.
pub async fn open<B: ReaderBackend>(page: &mut ReaderPage, backend: &B, title: &str) -> String {
    info!(title, "opening document");
    page.load(backend, title).await;

    if let Some(message) = page.error() {
        return format!("Could not open '{}': {}", title, message);
    }
    let Some(doc) = page.document() else {
        return format!("Could not open '{}'", title);
    };

    let mut out = format!("Opened **{}**", doc.title);
    if let Some(author) = &doc.author {
        out.push_str(&format!(" by {}", author));
    }
    out.push_str(&format!(
        "\nFilename: {}\nSections: {} | Pages: {}",
        doc.filename,
        doc.section_count(),
        doc.total_pages()
    ));
    out
}

/// Show the section (or flat page) holding page `n`.
pub fn page(page: &ReaderPage, n: u32) -> String {
    let Some(doc) = page.document() else {
        return "No document open.".to_string();
    };

    match doc.locate_page(n) {
        Some(PageLocation::Section { index, section }) => format!(
            "--- pages {}-{} ---\n{}",
            section.start_page,
            section.end_page,
            view::unit(page, index, &section.content)
        ),
        Some(PageLocation::FlatPage { number, range, .. }) => {
            let Text::Flat(body) = &doc.body else {
                return format!("Page {} is out of range (1-{}).", n, doc.total_pages());
            };
            format!("--- page {} ---\n{}", number, view::unit_range(page, 0, body, range))
        }
        None => format!("Page {} is out of range (1-{}).", n, doc.total_pages()),
    }
}

/// The whole document with search and annotation highlights. A flat body
/// is printed page by page.
pub fn show(page: &ReaderPage) -> String {
    let Some(doc) = page.document() else {
        return "No document open.".to_string();
    };

    let parts: Vec<String> = match &doc.body {
        Text::Flat(body) => segment::page_ranges(body)
            .into_iter()
            .enumerate()
            .map(|(i, range)| {
                format!("--- page {} ---\n{}", i + 1, view::unit_range(page, 0, body, range))
            })
            .collect(),
        Text::Sections(_) => doc
            .body
            .units()
            .into_iter()
            .enumerate()
            .map(|(i, content)| view::unit(page, i, content))
            .collect(),
    };
    parts.join("\n\n")
}
