//! Page-level state for one open document: search, quotes, question and the
//! latest answer.
//!
//! Every fetch is split into a `begin_*` step that hands out a generation
//! token and a `finish_*` step that applies the result only while that
//! token is still the latest one issued. Opening another document or asking
//! again bumps the generation, so a late response can never overwrite newer
//! state.

use tracing::{info, warn};

use crate::annotate::{AnnotationHighlighter, RenderTree};
use crate::client::{ClientError, ReaderBackend};
use crate::docs::types::{Answer, Document};
use crate::prompt;
use crate::search::{MatchId, MatchOccurrence, SearchIndex};
use crate::selection::{SelectionError, SelectionSet};

/// What the view should bring into view after the last change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollRequest {
    /// A search occurrence (start of the match).
    Match(MatchId),
    /// The highlighted annotation in the given unit (centered).
    Annotation { unit: usize },
}

/// A question that has been sent and not yet answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuestion {
    pub generation: u64,
    pub title: String,
    pub question: String,
    /// Quotes folded into `question`, consumed when the answer applies.
    pub quotes: Vec<String>,
}

/// Bookkeeping for the single outstanding submission.
#[derive(Debug, Clone, PartialEq, Eq)]
struct InFlight {
    generation: u64,
    quotes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Answer and annotation replaced; the quotes that were sent are consumed.
    Applied,
    /// Request failed; message is shown, nothing else changed.
    Failed(String),
    /// A newer request or navigation superseded this one.
    Stale,
    /// Nothing to send, no document, or a request is already in flight.
    Skipped,
}

#[derive(Debug, Default)]
pub struct ReaderPage {
    document: Option<Document>,
    search: SearchIndex,
    highlighter: AnnotationHighlighter,
    selections: SelectionSet,
    question: String,
    answer: String,
    error: Option<String>,
    generation: u64,
    in_flight: Option<InFlight>,
    scroll: Option<ScrollRequest>,
}

impl ReaderPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn search(&self) -> &SearchIndex {
        &self.search
    }

    pub fn selections(&self) -> &SelectionSet {
        &self.selections
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    /// Markdown answer from the last successful submission.
    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn annotation(&self) -> &str {
        self.highlighter.annotation()
    }

    /// User-visible message from the last failed fetch.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_asking(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Take the pending scroll request, if any.
    pub fn take_scroll(&mut self) -> Option<ScrollRequest> {
        self.scroll.take()
    }

    // -- document lifecycle --

    /// Start loading a document. Any in-flight request becomes stale.
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.in_flight = None;
        self.generation
    }

    /// Apply a load result if `generation` is still current. Returns
    /// whether the result was applied.
    pub fn finish_load(&mut self, generation: u64, result: Result<Document, ClientError>) -> bool {
        if generation != self.generation {
            warn!(generation, latest = self.generation, "discarding stale document load");
            return false;
        }

        match result {
            Ok(doc) => {
                self.open_document(doc);
                true
            }
            Err(e) => {
                warn!(error = %e, "document load failed");
                self.error = Some(e.to_string());
                true
            }
        }
    }

    pub async fn load<B: ReaderBackend>(&mut self, backend: &B, title: &str) -> bool {
        let generation = self.begin_load();
        let result = backend.get_pdf(title).await;
        self.finish_load(generation, result)
    }

    /// Replace the open document wholesale; per-document state starts over.
    pub fn open_document(&mut self, doc: Document) {
        info!(
            title = %doc.title,
            sections = doc.section_count(),
            pages = doc.total_pages(),
            "document opened"
        );
        self.generation += 1;
        self.in_flight = None;
        self.search.reset();
        self.highlighter.set_annotation("");
        self.selections.clear();
        self.question.clear();
        self.answer.clear();
        self.error = None;
        self.scroll = None;
        self.document = Some(doc);
    }

    // -- search --

    pub fn set_query(&mut self, term: &str) -> usize {
        let Some(doc) = &self.document else {
            return 0;
        };
        let count = self.search.set_query(&doc.body, term);
        self.scroll = self.search.scroll_target().map(ScrollRequest::Match);
        count
    }

    pub fn next_match(&mut self) -> Option<&MatchOccurrence> {
        let id = self.search.next()?.id();
        self.scroll = Some(ScrollRequest::Match(id));
        self.search.current()
    }

    pub fn previous_match(&mut self) -> Option<&MatchOccurrence> {
        let id = self.search.previous()?.id();
        self.scroll = Some(ScrollRequest::Match(id));
        self.search.current()
    }

    // -- quotes and question --

    pub fn add_selection(&mut self, text: &str) -> bool {
        self.selections.add_selection(text)
    }

    pub fn remove_selection(&mut self, index: usize) -> Result<String, SelectionError> {
        self.selections.remove_at(index)
    }

    pub fn set_question(&mut self, question: &str) {
        self.question = question.to_string();
    }

    /// Submit is enabled when a document is open, nothing is in flight, and
    /// there is a question or at least one quote.
    pub fn can_submit(&self) -> bool {
        self.document.is_some()
            && !self.is_asking()
            && (!self.question.trim().is_empty() || !self.selections.is_empty())
    }

    /// Build the outbound question and mark it in flight.
    pub fn begin_submit(&mut self) -> Option<PendingQuestion> {
        if !self.can_submit() {
            return None;
        }
        let doc = self.document.as_ref()?;
        let question = prompt::build_question(&self.selections, &self.question)?;
        let quotes = self.selections.as_slice().to_vec();

        self.generation += 1;
        self.in_flight = Some(InFlight {
            generation: self.generation,
            quotes: quotes.clone(),
        });
        self.error = None;

        info!(
            generation = self.generation,
            quotes = quotes.len(),
            "question submitted"
        );

        Some(PendingQuestion {
            generation: self.generation,
            title: doc.title.clone(),
            question,
            quotes,
        })
    }

    /// Apply the answer for `generation` all-or-nothing.
    pub fn finish_submit(
        &mut self,
        generation: u64,
        result: Result<Answer, ClientError>,
    ) -> SubmitOutcome {
        let sent = match self.in_flight.take() {
            Some(pending) if pending.generation == generation => pending.quotes,
            other => {
                self.in_flight = other;
                warn!(generation, latest = self.generation, "discarding stale answer");
                return SubmitOutcome::Stale;
            }
        };

        match result {
            Ok(answer) => {
                self.answer = answer.answer;
                self.highlighter.set_annotation(answer.annotations);
                self.selections.remove_sent(&sent);
                self.error = None;
                self.scroll = self
                    .render_annotations()
                    .and_then(|tree| tree.scroll_target())
                    .map(|unit| ScrollRequest::Annotation { unit });
                info!(
                    generation,
                    annotated = self.scroll.is_some(),
                    "answer applied"
                );
                SubmitOutcome::Applied
            }
            Err(e) => {
                warn!(generation, error = %e, "question failed");
                let message = e.to_string();
                self.error = Some(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    pub async fn submit<B: ReaderBackend>(&mut self, backend: &B) -> SubmitOutcome {
        let Some(pending) = self.begin_submit() else {
            return SubmitOutcome::Skipped;
        };
        let result = backend
            .ask_question(&pending.title, &pending.question)
            .await;
        self.finish_submit(pending.generation, result)
    }

    /// Body split around the active annotation.
    pub fn render_annotations(&self) -> Option<RenderTree<'_>> {
        self.document
            .as_ref()
            .map(|doc| self.highlighter.render(&doc.body))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::annotate::RenderedUnit;
    use crate::docs::Text;

    fn doc(body: &str) -> Document {
        Document {
            title: "Book".to_string(),
            author: Some("Anon".to_string()),
            filename: "book.pdf".to_string(),
            body: Text::Flat(body.to_string()),
        }
    }

    /// In-memory backend that records the questions it receives.
    struct FakeBackend {
        document: Document,
        answer: Result<Answer, u16>,
        asked: RefCell<Vec<(String, String)>>,
    }

    impl FakeBackend {
        fn answering(body: &str, annotations: &str) -> Self {
            Self {
                document: doc(body),
                answer: Ok(Answer {
                    answer: "Because.".to_string(),
                    annotations: annotations.to_string(),
                }),
                asked: RefCell::new(Vec::new()),
            }
        }

        fn failing(body: &str, status: u16) -> Self {
            Self {
                document: doc(body),
                answer: Err(status),
                asked: RefCell::new(Vec::new()),
            }
        }
    }

    impl ReaderBackend for FakeBackend {
        async fn get_pdf(&self, title: &str) -> Result<Document, ClientError> {
            if title == self.document.title {
                Ok(self.document.clone())
            } else {
                Err(ClientError::Server {
                    status: 404,
                    message: "PDF not found".to_string(),
                })
            }
        }

        async fn ask_question(&self, title: &str, question: &str) -> Result<Answer, ClientError> {
            self.asked
                .borrow_mut()
                .push((title.to_string(), question.to_string()));
            match &self.answer {
                Ok(answer) => Ok(answer.clone()),
                Err(status) => Err(ClientError::Server {
                    status: *status,
                    message: "Internal Server Error".to_string(),
                }),
            }
        }
    }

    fn answer(annotations: &str) -> Result<Answer, ClientError> {
        Ok(Answer {
            answer: "ok".to_string(),
            annotations: annotations.to_string(),
        })
    }

    #[tokio::test]
    async fn test_load_and_search() {
        let backend = FakeBackend::answering("The cat sat. The cat ran.", "");
        let mut page = ReaderPage::new();
        assert!(page.load(&backend, "Book").await);

        assert_eq!(page.set_query("cat"), 2);
        assert_eq!(
            page.take_scroll(),
            Some(ScrollRequest::Match(MatchId { section_index: 0, ordinal: 1 }))
        );
        assert_eq!(page.next_match().map(|m| m.ordinal), Some(2));
        assert_eq!(
            page.take_scroll(),
            Some(ScrollRequest::Match(MatchId { section_index: 0, ordinal: 2 }))
        );
    }

    #[tokio::test]
    async fn test_load_failure_sets_error() {
        let backend = FakeBackend::answering("text", "");
        let mut page = ReaderPage::new();
        page.load(&backend, "Missing").await;
        assert!(page.document().is_none());
        assert_eq!(page.error(), Some("server returned 404: PDF not found"));
    }

    #[tokio::test]
    async fn test_submit_applies_annotation_and_clears_quotes() {
        let backend = FakeBackend::answering("Hello world", "world");
        let mut page = ReaderPage::new();
        page.load(&backend, "Book").await;
        page.add_selection("Hello");

        assert_eq!(page.submit(&backend).await, SubmitOutcome::Applied);
        assert_eq!(page.answer(), "Because.");
        assert_eq!(page.annotation(), "world");
        assert!(page.selections().is_empty());
        assert_eq!(page.take_scroll(), Some(ScrollRequest::Annotation { unit: 0 }));

        let tree = page.render_annotations().unwrap();
        assert_eq!(
            tree.units,
            vec![RenderedUnit::Highlighted {
                before: "Hello ",
                highlighted: "world",
                after: "",
                anchor: crate::annotate::ANNOTATION_ANCHOR,
            }]
        );
    }

    #[tokio::test]
    async fn test_unmatched_annotation_does_not_scroll() {
        let backend = FakeBackend::answering("Hello world", "xyz");
        let mut page = ReaderPage::new();
        page.load(&backend, "Book").await;
        page.set_question("What?");

        assert_eq!(page.submit(&backend).await, SubmitOutcome::Applied);
        assert_eq!(page.take_scroll(), None);
        assert_eq!(
            page.render_annotations().unwrap().units,
            vec![RenderedUnit::Verbatim("Hello world")]
        );
    }

    #[tokio::test]
    async fn test_empty_submission_sends_nothing() {
        let backend = FakeBackend::answering("Hello world", "world");
        let mut page = ReaderPage::new();
        page.load(&backend, "Book").await;

        assert!(!page.can_submit());
        assert_eq!(page.submit(&backend).await, SubmitOutcome::Skipped);
        assert!(backend.asked.borrow().is_empty());
        assert_eq!(page.annotation(), "");
        assert_eq!(page.answer(), "");
    }

    #[tokio::test]
    async fn test_outbound_prompt_uses_quotes_and_default() {
        let backend = FakeBackend::answering("quote A and quote B", "");
        let mut page = ReaderPage::new();
        page.load(&backend, "Book").await;
        page.add_selection("quote A");
        page.add_selection("quote B");

        page.submit(&backend).await;
        let asked = backend.asked.borrow();
        assert_eq!(asked.len(), 1);
        assert_eq!(asked[0].0, "Book");
        assert_eq!(
            asked[0].1,
            format!(
                "{}quote A\nquote B{}",
                prompt::QUOTE_PREAMBLE,
                prompt::DEFAULT_INSTRUCTION
            )
        );
    }

    #[tokio::test]
    async fn test_failure_keeps_quotes_and_question() {
        let backend = FakeBackend::failing("Hello world", 500);
        let mut page = ReaderPage::new();
        page.load(&backend, "Book").await;
        page.add_selection("Hello");
        page.set_question("Why?");
        page.set_query("world");

        let outcome = page.submit(&backend).await;
        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        assert_eq!(page.selections().len(), 1);
        assert_eq!(page.question(), "Why?");
        assert_eq!(page.search().matches().len(), 1);
        assert!(page.error().is_some());
        assert!(!page.is_asking());
        assert!(page.can_submit());
    }

    #[test]
    fn test_submit_disabled_while_in_flight() {
        let mut page = ReaderPage::new();
        page.open_document(doc("text"));
        page.set_question("q");

        let pending = page.begin_submit().unwrap();
        assert!(page.is_asking());
        assert!(!page.can_submit());
        assert!(page.begin_submit().is_none());

        assert_eq!(page.finish_submit(pending.generation, answer("text")), SubmitOutcome::Applied);
        assert!(page.can_submit());
    }

    #[test]
    fn test_quote_added_while_in_flight_survives_answer() {
        let mut page = ReaderPage::new();
        page.open_document(doc("A B C"));
        page.add_selection("A");
        page.add_selection("B");

        let pending = page.begin_submit().unwrap();
        assert_eq!(pending.quotes, vec!["A".to_string(), "B".to_string()]);
        page.add_selection("C");

        assert_eq!(page.finish_submit(pending.generation, answer("A")), SubmitOutcome::Applied);
        assert_eq!(page.selections().as_slice(), &["C".to_string()]);
    }

    #[test]
    fn test_failed_answer_keeps_quotes_added_while_in_flight() {
        let mut page = ReaderPage::new();
        page.open_document(doc("A B"));
        page.add_selection("A");

        let pending = page.begin_submit().unwrap();
        page.add_selection("B");
        let failure = Err(ClientError::Server {
            status: 500,
            message: "boom".to_string(),
        });

        assert!(matches!(
            page.finish_submit(pending.generation, failure),
            SubmitOutcome::Failed(_)
        ));
        assert_eq!(page.selections().as_slice(), &["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_answer_after_navigation_is_discarded() {
        let mut page = ReaderPage::new();
        page.open_document(doc("first text"));
        page.add_selection("first");
        let pending = page.begin_submit().unwrap();

        page.open_document(doc("second text"));
        page.add_selection("second");

        assert_eq!(page.finish_submit(pending.generation, answer("text")), SubmitOutcome::Stale);
        assert_eq!(page.annotation(), "");
        assert_eq!(page.selections().as_slice(), &["second".to_string()]);
    }

    #[test]
    fn test_stale_load_is_discarded() {
        let mut page = ReaderPage::new();
        let first = page.begin_load();
        let second = page.begin_load();

        assert!(page.finish_load(second, Ok(doc("second"))));
        assert!(!page.finish_load(first, Ok(doc("first"))));
        assert_eq!(page.document().map(|d| d.body.units()), Some(vec!["second"]));
    }

    #[test]
    fn test_open_document_resets_search() {
        let mut page = ReaderPage::new();
        page.open_document(doc("cat"));
        page.set_query("cat");
        assert_eq!(page.search().current_index(), Some(0));

        page.open_document(doc("cat again"));
        assert_eq!(page.search().current_index(), None);
        assert!(page.search().matches().is_empty());
    }

    #[test]
    fn test_new_answer_replaces_annotation() {
        let mut page = ReaderPage::new();
        page.open_document(doc("alpha beta"));

        page.set_question("one");
        let first = page.begin_submit().unwrap();
        page.finish_submit(first.generation, answer("alpha"));

        page.set_question("two");
        let second = page.begin_submit().unwrap();
        page.finish_submit(second.generation, answer("beta"));

        let tree = page.render_annotations().unwrap();
        assert_eq!(tree.highlighted_count(), 1);
        assert_eq!(
            tree.units[0],
            RenderedUnit::Highlighted {
                before: "alpha ",
                highlighted: "beta",
                after: "",
                anchor: crate::annotate::ANNOTATION_ANCHOR,
            }
        );
    }

    #[test]
    fn test_search_without_document() {
        let mut page = ReaderPage::new();
        assert_eq!(page.set_query("x"), 0);
        assert!(page.next_match().is_none());
        assert!(page.take_scroll().is_none());
    }
}
