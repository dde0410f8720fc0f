//! Live search over a document body with a cyclic "current match" cursor.

use std::fmt;
use std::ops::Range;

use tracing::debug;

use crate::docs::Text;
use crate::segment::{self, Segment};

/// Identity of one occurrence: its unit and 1-based position within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchId {
    pub section_index: usize,
    pub ordinal: usize,
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.section_index, self.ordinal)
    }
}

/// One located instance of the search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOccurrence {
    /// Section index, 0 for a flat body.
    pub section_index: usize,
    /// 1-based, restarts in every section.
    pub ordinal: usize,
    /// Matched text as it appears in the document (original casing).
    pub matched_text: String,
    /// Byte range within the section content.
    pub range: Range<usize>,
}

impl MatchOccurrence {
    pub fn id(&self) -> MatchId {
        MatchId {
            section_index: self.section_index,
            ordinal: self.ordinal,
        }
    }
}

/// A piece of a rendered fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightSpan<'a> {
    Plain(&'a str),
    Match {
        text: &'a str,
        id: MatchId,
        current: bool,
    },
}

#[derive(Debug, Default)]
pub struct SearchIndex {
    query: String,
    matches: Vec<MatchOccurrence>,
    current: Option<usize>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the live query and rescan `body`. An empty term clears all
    /// matches. Returns the number of matches found.
    pub fn set_query(&mut self, body: &Text, term: &str) -> usize {
        if term.is_empty() {
            self.reset();
            return 0;
        }

        self.query = term.to_string();
        self.matches.clear();

        for (section_index, content) in body.units().into_iter().enumerate() {
            for (i, range) in segment::find_visible_ci(content, term).into_iter().enumerate() {
                self.matches.push(MatchOccurrence {
                    section_index,
                    ordinal: i + 1,
                    matched_text: content[range.clone()].to_string(),
                    range,
                });
            }
        }

        self.current = if self.matches.is_empty() { None } else { Some(0) };
        debug!(query = term, matches = self.matches.len(), "search recomputed");
        self.matches.len()
    }

    /// Drop the query, matches and cursor (document changed or search closed).
    pub fn reset(&mut self) {
        self.query.clear();
        self.matches.clear();
        self.current = None;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self) -> &[MatchOccurrence] {
        &self.matches
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&MatchOccurrence> {
        self.current.and_then(|idx| self.matches.get(idx))
    }

    /// `(current + 1, total)` for a "3 of 12" counter.
    pub fn position(&self) -> Option<(usize, usize)> {
        self.current.map(|idx| (idx + 1, self.matches.len()))
    }

    /// Move to the next match, wrapping to the first after the last.
    /// Returns the new current match; `None` (and no change) without matches.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&MatchOccurrence> {
        if self.matches.is_empty() {
            return None;
        }
        let next_index = match self.current {
            Some(idx) => (idx + 1) % self.matches.len(),
            None => 0,
        };
        self.current = Some(next_index);
        self.current()
    }

    /// Move to the previous match, wrapping to the last before the first.
    pub fn previous(&mut self) -> Option<&MatchOccurrence> {
        if self.matches.is_empty() {
            return None;
        }
        let prev_index = match self.current {
            Some(0) | None => self.matches.len() - 1,
            Some(idx) => idx - 1,
        };
        self.current = Some(prev_index);
        self.current()
    }

    /// The occurrence the view should scroll into view.
    pub fn scroll_target(&self) -> Option<MatchId> {
        self.current().map(MatchOccurrence::id)
    }

    /// Split one unit's content into plain and highlighted spans for the
    /// current query. Each highlighted span carries its identity, and the
    /// one equal to [`Self::current`] is flagged.
    pub fn highlight<'a>(&self, section_index: usize, content: &'a str) -> Vec<HighlightSpan<'a>> {
        if self.query.is_empty() {
            return vec![HighlightSpan::Plain(content)];
        }

        let current = self.scroll_target();
        let ranges = segment::find_visible_ci(content, &self.query);
        let mut ordinal = 0;

        segment::split_ranges(content, &ranges)
            .into_iter()
            .map(|piece| match piece {
                Segment::Plain(text) => HighlightSpan::Plain(text),
                Segment::Marked(text) => {
                    ordinal += 1;
                    let id = MatchId {
                        section_index,
                        ordinal,
                    };
                    HighlightSpan::Match {
                        text,
                        id,
                        current: current == Some(id),
                    }
                }
            })
            .collect()
    }
}
