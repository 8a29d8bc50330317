use ratatui::Frame;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use tui_textarea::{CursorMove, Input, TextArea};

/// A single-line text field backed by `tui-textarea`.
pub(crate) struct LineInput {
    textarea: TextArea<'static>,
    placeholder: String,
}

impl LineInput {
    pub(crate) fn new(initial: &str, placeholder: impl Into<String>) -> Self {
        let mut input = Self {
            textarea: TextArea::default(),
            placeholder: placeholder.into(),
        };
        input.set_text(initial);
        input
    }

    pub(crate) fn text(&self) -> &str {
        self.textarea
            .lines()
            .first()
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Replace the content and move the cursor to the end.
    pub(crate) fn set_text(&mut self, text: &str) {
        let mut textarea = TextArea::new(vec![text.to_string()]);
        textarea.set_cursor_line_style(Style::default());
        textarea.set_placeholder_text(self.placeholder.clone());
        textarea.move_cursor(CursorMove::End);
        self.textarea = textarea;
    }

    /// Feed a key to the field. Returns `true` when the text changed.
    pub(crate) fn input(&mut self, key: KeyEvent) -> bool {
        if is_newline(&key) {
            return false;
        }
        let before = self.text().to_string();
        self.textarea.input(Input::from(key));
        before != self.text()
    }

    pub(crate) fn render(&mut self, frame: &mut Frame, area: Rect, style: Style, focused: bool) {
        self.textarea.set_style(style);
        let cursor = if focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        self.textarea.set_cursor_style(cursor);
        frame.render_widget(&self.textarea, area);
    }
}

fn is_newline(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Enter => true,
        KeyCode::Char('m' | 'j') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
