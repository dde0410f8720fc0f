//! Plain-text rendering for the terminal. Search hits are shown as `[hit]`,
//! the current hit as `>>hit<<`, and the annotation as `**span**`. When the
//! annotation and a hit overlap both markers are kept, annotation outermost
//! (`**>>hit<<**`). `<br>` tags are never printed; each becomes a line break.
//! "Scrolling" prints a short excerpt centered on the target.

use std::cmp::Reverse;
use std::ops::Range;

use quote_reader::annotate::RenderedUnit;
use quote_reader::page::ScrollRequest;
use quote_reader::search::HighlightSpan;
use quote_reader::segment;
use quote_reader::ReaderPage;

/// Characters of context shown either side of a scroll target.
const EXCERPT_RADIUS: usize = 120;

/// A highlighted byte range and the markers wrapped around it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Mark {
    range: Range<usize>,
    open: &'static str,
    close: &'static str,
}

/// Annotation span first, then search hits, for unit `index`.
fn marks(page: &ReaderPage, index: usize, content: &str) -> Vec<Mark> {
    let mut marks = Vec::new();

    if let Some(tree) = page.render_annotations() {
        if let Some(RenderedUnit::Highlighted {
            before,
            highlighted,
            ..
        }) = tree.units.get(index)
        {
            marks.push(Mark {
                range: before.len()..before.len() + highlighted.len(),
                open: "**",
                close: "**",
            });
        }
    }

    let mut offset = 0;
    for span in page.search().highlight(index, content) {
        match span {
            HighlightSpan::Plain(text) => offset += text.len(),
            HighlightSpan::Match { text, current, .. } => {
                let (open, close) = if current { (">>", "<<") } else { ("[", "]") };
                marks.push(Mark {
                    range: offset..offset + text.len(),
                    open,
                    close,
                });
                offset += text.len();
            }
        }
    }

    marks
}

/// Render `content[range]` with every mark clipped to the range. Marks that
/// share a boundary nest: the longer (or earlier pushed) one stays outside.
fn render_range(content: &str, marks: &[Mark], range: Range<usize>) -> String {
    let mut events = Vec::with_capacity(marks.len() * 2);
    for (idx, mark) in marks.iter().enumerate() {
        let start = mark.range.start.max(range.start);
        let end = mark.range.end.min(range.end);
        if start >= end {
            continue;
        }
        let idx = idx as isize;
        events.push(((start, 1u8, Reverse(end), idx), mark.open));
        events.push(((end, 0u8, Reverse(start), -idx), mark.close));
    }
    events.sort_by_key(|(key, _)| *key);

    let mut out = String::new();
    let mut cursor = range.start;
    for ((pos, ..), marker) in events {
        out.push_str(&content[cursor..pos]);
        out.push_str(marker);
        cursor = pos;
    }
    out.push_str(&content[cursor..range.end]);
    out
}

/// Render the parts of `window` that lie between page-break tags, one line
/// per non-blank part.
fn render_visible(content: &str, marks: &[Mark], window: Range<usize>) -> String {
    segment::visible_ranges(content)
        .into_iter()
        .filter_map(|piece| {
            let start = piece.start.max(window.start);
            let end = piece.end.min(window.end);
            (start < end && !content[start..end].trim().is_empty())
                .then(|| render_range(content, marks, start..end))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render one unit with its annotation and search highlights.
pub fn unit(page: &ReaderPage, index: usize, content: &str) -> String {
    unit_range(page, index, content, 0..content.len())
}

/// Like [`unit`], limited to `range` (one page of a flat body).
pub fn unit_range(page: &ReaderPage, index: usize, content: &str, range: Range<usize>) -> String {
    render_visible(content, &marks(page, index, content), range)
}

/// Excerpt around whatever the page last asked to scroll to.
pub fn scroll_excerpt(page: &ReaderPage, request: ScrollRequest) -> Option<String> {
    let doc = page.document()?;
    let units = doc.body.units();

    let (index, target) = match request {
        ScrollRequest::Match(id) => {
            let occurrence = page.search().current().filter(|m| m.id() == id)?;
            (id.section_index, occurrence.range.clone())
        }
        ScrollRequest::Annotation { unit } => {
            let tree = page.render_annotations()?;
            match tree.units.get(unit)? {
                RenderedUnit::Highlighted {
                    before,
                    highlighted,
                    ..
                } => (unit, before.len()..before.len() + highlighted.len()),
                RenderedUnit::Verbatim(_) => return None,
            }
        }
    };

    let content = units.get(index)?;
    Some(excerpt(page, index, content, target))
}

fn excerpt(page: &ReaderPage, index: usize, content: &str, target: Range<usize>) -> String {
    let window = segment::context_window(content, target, EXCERPT_RADIUS);
    let mut out = String::new();
    if window.start > 0 {
        out.push_str("...");
    }
    out.push_str(&render_visible(content, &marks(page, index, content), window.clone()));
    if window.end < content.len() {
        out.push_str("...");
    }
    out
}
