use crossterm::event::KeyCode;
use ratatui::widgets::{ListState, ScrollbarState};

use crate::console::Selection;

#[derive(Debug)]
pub struct PickerApp {
    pub labels: Vec<String>,
    pub list_state: ListState,
    pub scroll_state: ScrollbarState,
    pub allow_all: bool,
    pub show_help: bool,
}

impl PickerApp {
    pub fn new(labels: &[String], allow_all: bool) -> Self {
        let mut list_state = ListState::default();
        if !labels.is_empty() {
            list_state.select(Some(0));
        }

        Self {
            labels: labels.to_vec(),
            list_state,
            scroll_state: ScrollbarState::new(labels.len()),
            allow_all,
            show_help: false,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    pub fn next(&mut self) {
        if self.labels.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < self.labels.len() => i + 1,
            _ => 0,
        };
        self.select(i);
    }

    pub fn previous(&mut self) {
        if self.labels.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => self.labels.len() - 1,
            Some(i) => i - 1,
        };
        self.select(i);
    }

    fn select(&mut self, i: usize) {
        self.list_state.select(Some(i));
        self.scroll_state = self.scroll_state.position(i);
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Apply a key press. Returns the final choice once the operator has made one.
    pub fn handle_key(&mut self, code: KeyCode) -> Option<Selection> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                if self.show_help {
                    self.toggle_help();
                    None
                } else {
                    Some(Selection::Quit)
                }
            }
            KeyCode::Char('h') => {
                self.toggle_help();
                None
            }
            KeyCode::Char('a') if self.allow_all => Some(Selection::All),
            KeyCode::Down | KeyCode::Char('j') => {
                self.next();
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.previous();
                None
            }
            KeyCode::Home => {
                if !self.labels.is_empty() {
                    self.select(0);
                }
                None
            }
            KeyCode::End => {
                if !self.labels.is_empty() {
                    self.select(self.labels.len() - 1);
                }
                None
            }
            KeyCode::Enter => self.selected().map(Selection::One),
            _ => None,
        }
    }
}
