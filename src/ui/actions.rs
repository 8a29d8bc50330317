use std::time::Instant;

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Focus};
use super::SelectorOutcome;
use crate::selector::SelectorError;

impl App {
    /// Apply one key press. Returns the outcome once the pick is over.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<SelectorOutcome> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Some(self.cancel()),
            KeyCode::Char('c') if ctrl => return Some(self.cancel()),
            KeyCode::Char('r') if ctrl => {
                self.selector.retry();
            }
            KeyCode::Enter => return self.confirm(),
            KeyCode::Tab | KeyCode::BackTab => self.toggle_focus(),
            KeyCode::Up => self.move_up(1),
            KeyCode::Down => self.move_down(),
            KeyCode::PageUp => self.move_up(self.page_step()),
            KeyCode::PageDown => self.page_down(),
            _ => self.edit_focused(key),
        }
        None
    }

    fn cancel(&mut self) -> SelectorOutcome {
        self.selector.cancel();
        SelectorOutcome::cancelled(self.selector.query().to_string())
    }

    /// Select the highlighted row, or commit it when it is already selected.
    fn confirm(&mut self) -> Option<SelectorOutcome> {
        let id = self.highlighted()?.id.clone();
        let already_selected = self
            .selector
            .selection()
            .is_some_and(|selected| selected.id == id);
        if !already_selected {
            if let Err(err) = self.selector.select(&id) {
                tracing::debug!(error = %err, "select ignored");
            }
            return None;
        }
        match self.selector.commit() {
            Ok(selection) => Some(SelectorOutcome::committed(
                self.selector.query().to_string(),
                selection,
            )),
            Err(SelectorError::InvalidCommit) => None,
            Err(err) => {
                tracing::debug!(error = %err, "commit ignored");
                None
            }
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Query => Focus::Annotation,
            Focus::Annotation => Focus::Query,
        };
    }

    fn page_step(&self) -> usize {
        self.viewport_rows.max(1)
    }

    fn move_up(&mut self, step: usize) {
        if let Some(selected) = self.table_state.selected() {
            self.table_state.select(Some(selected.saturating_sub(step)));
        }
    }

    /// Move down one row; on the last row ask for the next page instead.
    fn move_down(&mut self) {
        let len = self.selector.items().len();
        match self.table_state.selected() {
            Some(selected) if selected + 1 < len => self.table_state.select(Some(selected + 1)),
            Some(_) => {
                self.selector.load_more();
            }
            None => {}
        }
    }

    fn page_down(&mut self) {
        let len = self.selector.items().len();
        if let Some(selected) = self.table_state.selected() {
            let target = (selected + self.page_step()).min(len.saturating_sub(1));
            self.table_state.select(Some(target));
        }
        self.selector.load_more();
    }

    fn edit_focused(&mut self, key: KeyEvent) {
        match self.focus {
            Focus::Query => {
                if self.query.input(key) {
                    let text = self.query.text().to_string();
                    self.selector.input(text, Instant::now());
                }
            }
            Focus::Annotation => {
                if self.annotation.input(key) {
                    let text = self.annotation.text().to_string();
                    self.selector.set_annotation(text);
                }
            }
        }
    }
}
