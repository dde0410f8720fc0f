mod ask;
mod open;
mod quotes;
mod search;

use anyhow::Result;

use quote_reader::{ReaderBackend, ReaderPage};

pub use open::open;

pub const HELP: &str = "\
Commands:
  open <title>      load a document
  find <term>       search (case-insensitive, literal); empty term clears
  next | prev       step through matches
  quote <text>      add a quote
  unquote <n>       remove quote n
  quotes            list quotes
  ask [question]    ask about the quotes (default: explain them)
  page <n>          show a page
  show              print the whole document with highlights
  help | quit";

/// Parsed command line.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Open(String),
    Find(String),
    Next,
    Prev,
    Quote(String),
    Unquote(usize),
    Quotes,
    Ask(String),
    Page(u32),
    Show,
    Help,
    Quit,
    /// Unrecognized input, with the reason.
    Invalid(String),
}

impl Command {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let (word, rest) = match input.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (input, ""),
        };

        match word.to_lowercase().as_str() {
            "open" if !rest.is_empty() => Command::Open(rest.to_string()),
            "open" => Command::Invalid("usage: open <title>".to_string()),
            "find" | "search" | "/" => Command::Find(rest.to_string()),
            "next" | "n" => Command::Next,
            "prev" | "previous" | "p" => Command::Prev,
            "quote" => Command::Quote(rest.to_string()),
            "unquote" => match rest.parse::<usize>() {
                Ok(n) if n > 0 => Command::Unquote(n),
                _ => Command::Invalid("usage: unquote <n> (1-based)".to_string()),
            },
            "quotes" => Command::Quotes,
            "ask" => Command::Ask(rest.to_string()),
            "page" => match rest.parse::<u32>() {
                Ok(n) => Command::Page(n),
                Err(_) => Command::Invalid("usage: page <n>".to_string()),
            },
            "show" => Command::Show,
            "help" | "?" | "" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => Command::Invalid(format!("unknown command `{}` (try `help`)", other)),
        }
    }
}

/// Result of running one command.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue(String),
    Quit,
}

pub async fn run<B: ReaderBackend>(
    page: &mut ReaderPage,
    backend: &B,
    command: Command,
) -> Result<Flow> {
    let output = match command {
        Command::Open(title) => open::open(page, backend, &title).await,
        Command::Find(term) => search::find(page, &term),
        Command::Next => search::step(page, true),
        Command::Prev => search::step(page, false),
        Command::Quote(text) => quotes::quote(page, &text),
        Command::Unquote(n) => quotes::unquote(page, n)?,
        Command::Quotes => quotes::list(page),
        Command::Ask(question) => ask::ask(page, backend, &question).await,
        Command::Page(n) => open::page(page, n),
        Command::Show => open::show(page),
        Command::Help => HELP.to_string(),
        Command::Quit => return Ok(Flow::Quit),
        Command::Invalid(reason) => reason,
    };
    Ok(Flow::Continue(output))
}
