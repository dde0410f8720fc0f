use tracing::info;

use quote_reader::{ReaderBackend, ReaderPage, SubmitOutcome};

use crate::view;

/// Ask about the selected quotes. An empty question asks the service to
/// explain them.
pub async fn ask<B: ReaderBackend>(page: &mut ReaderPage, backend: &B, question: &str) -> String {
    page.set_question(question);
    if !page.can_submit() {
        return if page.document().is_none() {
            "No document open.".to_string()
        } else {
            "Select a quote or type a question first.".to_string()
        };
    }

    let quotes = page.selections().len();
    info!(question, quotes, "asking");

    match page.submit(backend).await {
        SubmitOutcome::Applied => {}
        SubmitOutcome::Failed(message) => return format!("Question failed: {}", message),
        SubmitOutcome::Stale | SubmitOutcome::Skipped => return String::new(),
    }

    let mut out = String::new();
    if !question.trim().is_empty() {
        out.push_str(&format!("**Q:** {}\n", question.trim()));
    }
    out.push_str(&format!("**A:** {}", page.answer()));

    match page.take_scroll() {
        Some(request) => {
            if let Some(excerpt) = view::scroll_excerpt(page, request) {
                out.push_str("\n\n**Source:**\n");
                out.push_str(&excerpt);
            }
        }
        None if !page.annotation().is_empty() => {
            out.push_str("\n\n(The cited passage could not be located in the text.)");
        }
        None => {}
    }
    out
}
