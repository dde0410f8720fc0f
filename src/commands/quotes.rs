use anyhow::{Context, Result};

use quote_reader::ReaderPage;

pub fn quote(page: &mut ReaderPage, text: &str) -> String {
    if page.add_selection(text) {
        format!("Quote {} added.", page.selections().len())
    } else {
        "Nothing to quote.".to_string()
    }
}

/// Remove the 1-based quote `n`.
pub fn unquote(page: &mut ReaderPage, n: usize) -> Result<String> {
    let index = n.checked_sub(1).context("quotes are numbered from 1")?;
    let removed = page
        .remove_selection(index)
        .with_context(|| format!("no quote {}", n))?;
    Ok(format!("Removed \"{}\".", removed))
}

pub fn list(page: &ReaderPage) -> String {
    let previews = page.selections().previews();
    if previews.is_empty() {
        return "No quotes selected.".to_string();
    }

    let mut out = String::from("Quotes:\n");
    for (i, preview) in previews.iter().enumerate() {
        out.push_str(&format!("  {}. \"{}\"\n", i + 1, preview));
    }
    out.truncate(out.trim_end().len());
    out
}
