use std::time::Instant;

use lazypick_source_api::{ItemId, ResultItem};
use ratatui::widgets::TableState;
use throbber_widgets_tui::ThrobberState;

use super::input::LineInput;
use super::theme::Theme;
use crate::selector::Selector;

/// Which text field receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Query,
    Annotation,
}

/// UI state wrapped around a [`Selector`].
pub struct App {
    pub(crate) selector: Selector,
    pub(crate) title: String,
    pub(crate) query: LineInput,
    pub(crate) annotation: LineInput,
    pub(crate) focus: Focus,
    pub(crate) table_state: TableState,
    pub(crate) throbber_state: ThrobberState,
    pub(crate) theme: Theme,
    /// Result rows that fit in the table body at the last draw.
    pub(crate) viewport_rows: usize,
}

impl App {
    pub fn new(selector: Selector, title: impl Into<String>) -> Self {
        let query = LineInput::new(selector.query(), "type to filter");
        let annotation = LineInput::new(selector.annotation(), "add a note (Tab)");
        Self {
            selector,
            title: title.into(),
            query,
            annotation,
            focus: Focus::Query,
            table_state: TableState::default(),
            throbber_state: ThrobberState::default(),
            theme: Theme::default(),
            viewport_rows: 0,
        }
    }

    #[must_use]
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    #[must_use]
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Advance timers, apply worker responses and resync widgets with the
    /// selector's state.
    pub fn tick(&mut self, now: Instant) {
        self.selector.tick(now);
        if self.annotation.text() != self.selector.annotation() {
            let annotation = self.selector.annotation().to_string();
            self.annotation.set_text(&annotation);
        }
        self.ensure_cursor();
    }

    /// The row under the cursor.
    #[must_use]
    pub fn highlighted(&self) -> Option<&ResultItem> {
        self.table_state
            .selected()
            .and_then(|index| self.selector.items().get(index))
    }

    /// Keep the cursor on a valid row after the result list changed.
    pub(crate) fn ensure_cursor(&mut self) {
        let len = self.selector.items().len();
        match self.table_state.selected() {
            _ if len == 0 => self.table_state.select(None),
            None => self.table_state.select(Some(0)),
            Some(index) if index >= len => self.table_state.select(Some(len - 1)),
            Some(_) => {}
        }
    }

    /// Ids of the rows inside the table viewport.
    pub(crate) fn visible_ids(&self) -> Vec<ItemId> {
        let offset = self.table_state.offset();
        self.selector
            .items()
            .iter()
            .skip(offset)
            .take(self.viewport_rows)
            .map(|item| item.id.clone())
            .collect()
    }

    /// Tell the selector which rows are on screen so their payloads load.
    pub(crate) fn report_visible(&mut self) {
        let visible = self.visible_ids();
        self.selector.mark_visible(&visible);
    }
}
