use ratatui::style::{Color, Modifier, Style};

/// Styles used by the picker widgets.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub header: Style,
    pub row_highlight: Style,
    pub prompt: Style,
    pub empty: Style,
    pub highlight: Style,
    pub selected: Style,
    pub notice: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            header: Style::new().fg(Color::Black).bg(Color::Cyan),
            row_highlight: Style::new().bg(Color::DarkGray),
            prompt: Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            empty: Style::new().fg(Color::DarkGray),
            highlight: Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            selected: Style::new().fg(Color::Green).add_modifier(Modifier::BOLD),
            notice: Style::new().fg(Color::Red),
        }
    }
}

impl Theme {
    #[must_use]
    pub fn header_style(&self) -> Style {
        self.header
    }

    #[must_use]
    pub fn row_highlight_style(&self) -> Style {
        self.row_highlight
    }

    #[must_use]
    pub fn prompt_style(&self) -> Style {
        self.prompt
    }

    #[must_use]
    pub fn empty_style(&self) -> Style {
        self.empty
    }

    #[must_use]
    pub fn highlight_style(&self) -> Style {
        self.highlight
    }

    #[must_use]
    pub fn selected_style(&self) -> Style {
        self.selected
    }

    #[must_use]
    pub fn notice_style(&self) -> Style {
        self.notice
    }
}
