//! Question text sent to the answering service.

use crate::selection::SelectionSet;

/// Leads every outbound question; the quotes follow directly.
pub const QUOTE_PREAMBLE: &str = "Answer using the document. The reader selected these quotes from it:\n";

/// Used when the reader asks without typing a question.
pub const DEFAULT_INSTRUCTION: &str =
    "\nExplain these quotes and what they mean in the context of the document.";

/// Separates the quotes from a typed question.
pub const QUESTION_SEPARATOR: &str = "\nQuestion: ";

/// Build the outbound question: preamble, newline-joined quotes, then the
/// reader's question or [`DEFAULT_INSTRUCTION`]. `None` when there is
/// neither a question nor any quote.
pub fn build_question(selections: &SelectionSet, question: &str) -> Option<String> {
    let question = question.trim();
    if question.is_empty() && selections.is_empty() {
        return None;
    }

    let mut prompt = String::from(QUOTE_PREAMBLE);
    prompt.push_str(&selections.joined());
    if question.is_empty() {
        prompt.push_str(DEFAULT_INSTRUCTION);
    } else {
        prompt.push_str(QUESTION_SEPARATOR);
        prompt.push_str(question);
    }
    Some(prompt)
}
