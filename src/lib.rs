//! Reader for uploaded documents: live literal search with a cyclic match
//! cursor, quote collection, and highlighting of answer spans returned by
//! a remote question-answering service.

pub mod annotate;
pub mod client;
pub mod config;
pub mod docs;
pub mod page;
pub mod prompt;
pub mod search;
pub mod segment;
pub mod selection;

pub use annotate::{AnnotationHighlighter, RenderTree, RenderedUnit};
pub use client::{ClientError, ReaderBackend, ReaderClient};
pub use config::ReaderConfig;
pub use docs::{Document, Section, Text};
pub use page::{ReaderPage, ScrollRequest, SubmitOutcome};
pub use search::{HighlightSpan, MatchId, MatchOccurrence, SearchIndex};
pub use selection::{SelectionError, SelectionSet};
