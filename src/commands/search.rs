use quote_reader::ReaderPage;

use crate::view;

pub fn find(page: &mut ReaderPage, term: &str) -> String {
    if page.document().is_none() {
        return "No document open.".to_string();
    }
    if term.is_empty() {
        page.set_query("");
        return "Search cleared.".to_string();
    }

    match page.set_query(term) {
        0 => format!("No matches for \"{}\".", term),
        _ => located(page),
    }
}

/// `next` when `forward`, otherwise `prev`.
pub fn step(page: &mut ReaderPage, forward: bool) -> String {
    let moved = if forward {
        page.next_match().is_some()
    } else {
        page.previous_match().is_some()
    };
    if !moved {
        return "No matches.".to_string();
    }
    located(page)
}

/// "N of M" plus an excerpt around the current match.
fn located(page: &mut ReaderPage) -> String {
    let Some((current, total)) = page.search().position() else {
        return "No matches.".to_string();
    };
    let mut out = format!("{} of {}", current, total);

    if let Some(request) = page.take_scroll() {
        if let Some(excerpt) = view::scroll_excerpt(page, request) {
            out.push('\n');
            out.push_str(&excerpt);
        }
    }
    out
}
