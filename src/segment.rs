//! Text segmentation shared by the search and annotation engines.
//!
//! Search terms are always treated as literals. Case-insensitive matching
//! scans a lower-cased copy of the text and maps every hit back to byte
//! offsets in the original, so callers can slice the original safely even
//! when lower-casing changes a character's UTF-8 length.

use std::ops::Range;

/// Lower-cased copy of a text plus, for every folded byte, the byte range of
/// the original character it came from.
struct Folded {
    text: String,
    origin: Vec<Range<usize>>,
}

impl Folded {
    fn new(original: &str) -> Self {
        let mut text = String::with_capacity(original.len());
        let mut origin = Vec::with_capacity(original.len());
        for (start, ch) in original.char_indices() {
            let end = start + ch.len_utf8();
            for lower in ch.to_lowercase() {
                text.push(lower);
                origin.extend(std::iter::repeat(start..end).take(lower.len_utf8()));
            }
        }
        Self { text, origin }
    }
}

/// Lower-case a needle with the same per-character folding used for haystacks.
pub fn fold(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Find every non-overlapping, case-insensitive occurrence of `needle` in
/// `haystack`, scanning left to right. Ranges are byte offsets into
/// `haystack`. An empty needle matches nothing.
pub fn find_all_ci(haystack: &str, needle: &str) -> Vec<Range<usize>> {
    let needle = fold(needle);
    if needle.is_empty() {
        return Vec::new();
    }

    let folded = Folded::new(haystack);
    let mut ranges: Vec<Range<usize>> = Vec::new();
    let mut search_from = 0;

    while let Some(pos) = folded.text[search_from..].find(needle.as_str()) {
        let start = search_from + pos;
        let end = start + needle.len();
        let range = folded.origin[start].start..folded.origin[end - 1].end;

        // A character that folds to several chars can yield two folded hits
        // inside one original character; keep the originals disjoint.
        if ranges.last().map_or(true, |prev| range.start >= prev.end) {
            ranges.push(range);
        }

        search_from = end;
        if search_from >= folded.text.len() {
            break;
        }
    }

    ranges
}

/// A piece of a fragment after splitting it around a set of ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Marked(&'a str),
}

/// Split `text` into plain and marked pieces. `ranges` must be sorted,
/// disjoint and on char boundaries (as produced by [`find_all_ci`]).
/// Empty plain pieces are omitted.
pub fn split_ranges<'a>(text: &'a str, ranges: &[Range<usize>]) -> Vec<Segment<'a>> {
    let mut segments = Vec::with_capacity(ranges.len() * 2 + 1);
    let mut cursor = 0;

    for range in ranges {
        if range.start > cursor {
            segments.push(Segment::Plain(&text[cursor..range.start]));
        }
        segments.push(Segment::Marked(&text[range.clone()]));
        cursor = range.end;
    }
    if cursor < text.len() {
        segments.push(Segment::Plain(&text[cursor..]));
    }

    segments
}

/// Byte ranges of the `<br>`, `<br/>` and `<br />` page-break tags in `text`.
pub fn break_tags(text: &str) -> Vec<Range<usize>> {
    let mut tags = Vec::new();
    let mut search_from = 0;

    while let Some(pos) = text[search_from..].find("<br") {
        let tag_start = search_from + pos;
        match br_tag_end(&text[tag_start..]) {
            Some(len) => {
                tags.push(tag_start..tag_start + len);
                search_from = tag_start + len;
            }
            None => search_from = tag_start + "<br".len(),
        }
    }

    tags
}

/// Ranges of text between page-break tags, blank ones included.
pub fn visible_ranges(text: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    for tag in break_tags(text) {
        ranges.push(start..tag.start);
        start = tag.end;
    }
    ranges.push(start..text.len());
    ranges
}

/// Like [`find_all_ci`], but never matches inside or across page-break
/// tags.
pub fn find_visible_ci(text: &str, needle: &str) -> Vec<Range<usize>> {
    visible_ranges(text)
        .into_iter()
        .flat_map(|piece| {
            find_all_ci(&text[piece.clone()], needle)
                .into_iter()
                .map(move |r| r.start + piece.start..r.end + piece.start)
        })
        .collect()
}

/// Byte ranges of the non-blank pages of flat text.
pub fn page_ranges(text: &str) -> Vec<Range<usize>> {
    visible_ranges(text)
        .into_iter()
        .filter(|r| !text[r.clone()].trim().is_empty())
        .collect()
}

/// Split flat text into pages on `<br>` markers, dropping blank pages.
pub fn split_pages(text: &str) -> Vec<&str> {
    page_ranges(text).into_iter().map(|r| &text[r]).collect()
}

/// Length of a `<br\s*/?>` tag at the start of `text`, if there is one.
fn br_tag_end(text: &str) -> Option<usize> {
    let rest = text.strip_prefix("<br")?;
    let trimmed = rest.trim_start();
    let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
    let after = trimmed.strip_prefix('>')?;
    Some(text.len() - after.len())
}

/// Widen `range` by up to `radius` characters on each side, staying on
/// char boundaries.
pub fn context_window(text: &str, range: Range<usize>, radius: usize) -> Range<usize> {
    let start = text[..range.start]
        .char_indices()
        .rev()
        .take(radius)
        .last()
        .map_or(range.start, |(i, _)| i);
    let end = text[range.end..]
        .char_indices()
        .nth(radius)
        .map_or(text.len(), |(i, _)| range.end + i);
    start..end
}

/// Truncate to `max_chars` characters, appending `...` when anything was cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
