//! Operator interaction: line prompts, confirmations and result picking.

use std::io::{self, BufRead, IsTerminal, Write};

use crate::mapping::MappingPrompter;
use crate::tui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    One(usize),
    All,
    Quit,
}

pub trait Console {
    /// Show `message` and read one line. `None` at end of input.
    fn prompt(&mut self, message: &str) -> Option<String>;

    /// Let the operator choose among `labels` (shown numbered from 1).
    fn pick(&mut self, labels: &[String], allow_all: bool) -> Selection;

    /// Ask a yes/no question; only an explicit yes counts.
    fn confirm(&mut self, question: &str) -> bool {
        self.prompt(&format!("{question} (y/n): "))
            .map(|answer| matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false)
    }
}

/// Parse a numbered-list answer. `None` means "invalid, ask again".
pub fn parse_selection(input: &str, len: usize, allow_all: bool) -> Option<Selection> {
    let choice = input.trim().to_lowercase();
    match choice.as_str() {
        "q" => Some(Selection::Quit),
        "a" if allow_all => Some(Selection::All),
        _ => match choice.parse::<usize>() {
            Ok(n) if (1..=len).contains(&n) => Some(Selection::One(n - 1)),
            _ => None,
        },
    }
}

/// Numbered-list picker over any `Console`'s prompt.
pub fn pick_numbered<C: Console + ?Sized>(
    console: &mut C,
    labels: &[String],
    allow_all: bool,
) -> Selection {
    if labels.is_empty() {
        println!("[!] No results found.");
        return Selection::Quit;
    }
    println!("\nSearch Results:");
    for (idx, label) in labels.iter().enumerate() {
        println!("{}. {}", idx + 1, label);
    }
    let mut message = format!("Select a title (1-{})", labels.len());
    if allow_all {
        message.push_str(" | 'a' to update all results");
    }
    message.push_str(" | 'q' to quit: ");

    loop {
        let Some(answer) = console.prompt(&message) else {
            return Selection::Quit;
        };
        match parse_selection(&answer, labels.len(), allow_all) {
            Some(selection) => return selection,
            None => println!("[!] Invalid selection. Try again."),
        }
    }
}

/// Stdin/stdout console. Uses the full-screen picker when attached to a
/// terminal and a numbered list otherwise.
#[derive(Debug)]
pub struct TerminalConsole {
    full_screen: bool,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self {
            full_screen: io::stdin().is_terminal() && io::stdout().is_terminal(),
        }
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TerminalConsole {
    fn prompt(&mut self, message: &str) -> Option<String> {
        print!("{message}");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read from stdin");
                None
            }
        }
    }

    fn pick(&mut self, labels: &[String], allow_all: bool) -> Selection {
        if self.full_screen && !labels.is_empty() {
            match tui::pick(labels, allow_all) {
                Ok(selection) => return selection,
                Err(e) => {
                    tracing::warn!(error = %e, "Full-screen picker failed, using numbered list");
                    self.full_screen = false;
                }
            }
        }
        pick_numbered(self, labels, allow_all)
    }
}

impl MappingPrompter for TerminalConsole {
    fn local_root_for(&mut self, remote_root: &str) -> Option<String> {
        println!("\nPlex location: {remote_root}");
        self.prompt("-> Local folder path: ")
    }
}
