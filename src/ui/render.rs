use std::mem;

use frizbee::{Config, match_indices};
use lazypick_source_api::{ResultItem, config_for_query};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table, Wrap};
use throbber_widgets_tui::Throbber;
use unicode_width::UnicodeWidthStr;

use super::app::{App, Focus};
use super::theme::Theme;
use crate::selector::HydrationState;

const QUERY_LABEL: &str = "› ";
const ANNOTATION_LABEL: &str = "note › ";
const HEADER_HEIGHT: u16 = 1;

impl App {
    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area().inner(Margin {
            vertical: 0,
            horizontal: 1,
        });
        let [prompt, body, annotation, status] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .areas(area);
        let [results, detail] = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .areas(body);

        self.render_prompt(frame, prompt);
        self.render_results(frame, results);
        self.render_detail(frame, detail);
        self.render_annotation(frame, annotation);
        self.render_status(frame, status);
    }

    fn render_prompt(&mut self, frame: &mut Frame, area: Rect) {
        let title = format!("{} {QUERY_LABEL}", self.title);
        let spinner = if self.selector.is_loading() {
            let muted = self.theme.empty_style();
            Some(
                Throbber::default()
                    .style(muted)
                    .throbber_style(muted)
                    .to_symbol_span(&self.throbber_state),
            )
        } else {
            None
        };
        let spinner_width = spinner.as_ref().map_or(0, |span| span.width() as u16 + 1);
        let [label, input, progress] = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(title.width() as u16),
                Constraint::Min(1),
                Constraint::Length(spinner_width),
            ])
            .areas(area);

        frame.render_widget(
            Paragraph::new(Span::styled(title, self.theme.prompt_style())),
            label,
        );
        self.query
            .render(frame, input, Style::default(), self.focus == Focus::Query);
        if let Some(spinner) = spinner {
            frame.render_widget(
                Paragraph::new(Line::from(spinner)).alignment(Alignment::Right),
                progress,
            );
        }
    }

    fn render_results(&mut self, frame: &mut Frame, area: Rect) {
        self.viewport_rows = usize::from(area.height.saturating_sub(HEADER_HEIGHT));
        self.ensure_cursor();

        let needle = self
            .selector
            .effective_query()
            .map(str::trim)
            .filter(|query| !query.is_empty());
        let config = needle.map(|query| config_for_query(query, self.selector.total()));
        let selected = self.selector.selection().map(|item| item.id.clone());
        let theme = self.theme;

        let rows: Vec<Row> = self
            .selector
            .items()
            .iter()
            .map(|item| {
                let marker = if selected.as_ref() == Some(&item.id) {
                    Cell::from(Span::styled("●", theme.selected_style()))
                } else {
                    Cell::from(" ")
                };
                let indices = needle
                    .zip(config.as_ref())
                    .and_then(|(needle, config)| highlight_for(needle, config, &item.label));
                Row::new([
                    marker,
                    highlight_cell(&item.label, indices, &theme),
                    Cell::from(self.info_for(item)),
                ])
            })
            .collect();

        let header = Row::new(["", "Name", "Info"]).style(theme.header_style());
        let table = Table::new(
            rows,
            [
                Constraint::Length(1),
                Constraint::Min(8),
                Constraint::Length(10),
            ],
        )
        .header(header)
        .row_highlight_style(theme.row_highlight_style());
        frame.render_stateful_widget(table, area, &mut self.table_state);

        if self.selector.items().is_empty() && area.height > HEADER_HEIGHT {
            let message_area = Rect {
                y: area.y + HEADER_HEIGHT,
                height: area.height - HEADER_HEIGHT,
                ..area
            };
            let message = if self.selector.is_loading() {
                "Loading…"
            } else {
                "No results"
            };
            frame.render_widget(Clear, message_area);
            frame.render_widget(
                Paragraph::new(message)
                    .alignment(Alignment::Center)
                    .style(theme.empty_style()),
                message_area,
            );
        }
    }

    fn info_for(&self, item: &ResultItem) -> String {
        match self.selector.hydration_state(&item.id) {
            HydrationState::Pending => String::new(),
            HydrationState::Loading => "…".into(),
            HydrationState::Ready => self
                .selector
                .payload(&item.id)
                .map(|payload| payload.kind.as_str().to_string())
                .unwrap_or_default(),
            HydrationState::Absent => "-".into(),
            HydrationState::Failed => "error".into(),
        }
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered().title(" Preview ");
        let Some(item) = self.highlighted() else {
            frame.render_widget(block, area);
            return;
        };

        let muted = self.theme.empty_style();
        let mut lines = vec![Line::from(Span::styled(
            item.label.clone(),
            self.theme.prompt_style(),
        ))];
        match self.selector.hydration_state(&item.id) {
            HydrationState::Pending | HydrationState::Loading => {
                lines.push(Line::from(Span::styled("loading…", muted)));
            }
            HydrationState::Absent => {
                lines.push(Line::from(Span::styled("no preview available", muted)));
            }
            HydrationState::Failed => {
                let message = self
                    .selector
                    .hydration_error(&item.id)
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "preview failed".into());
                lines.push(Line::from(Span::styled(message, self.theme.notice_style())));
            }
            HydrationState::Ready => {
                if let Some(payload) = self.selector.payload(&item.id) {
                    lines.push(Line::from(Span::styled(payload.summary(), muted)));
                    if let Some(note) = &payload.note {
                        lines.push(Line::from(Span::styled(note.clone(), muted)));
                    }
                    if !payload.preview.is_empty() {
                        lines.push(Line::default());
                        lines.extend(payload.preview.iter().map(|line| Line::from(line.clone())));
                    }
                }
            }
        }

        frame.render_widget(
            Paragraph::new(Text::from(lines))
                .block(block)
                .wrap(Wrap { trim: false }),
            area,
        );
    }

    fn render_annotation(&mut self, frame: &mut Frame, area: Rect) {
        let [label, input] = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(ANNOTATION_LABEL.width() as u16),
                Constraint::Min(1),
            ])
            .areas(area);
        let label_style = if self.focus == Focus::Annotation {
            self.theme.prompt_style()
        } else {
            self.theme.empty_style()
        };
        frame.render_widget(
            Paragraph::new(Span::styled(ANNOTATION_LABEL, label_style)),
            label,
        );
        self.annotation.render(
            frame,
            input,
            Style::default(),
            self.focus == Focus::Annotation,
        );
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let muted = self.theme.empty_style();
        let mut spans = vec![Span::styled(
            format!(
                "{} of {}",
                self.selector.items().len(),
                self.selector.total()
            ),
            muted,
        )];
        if self.selector.has_more() {
            spans.push(Span::styled(" · more below (PgDn)", muted));
        }
        if let Some(selected) = self.selector.selection() {
            spans.push(Span::styled(
                format!(" · selected {}", selected.label),
                self.theme.selected_style(),
            ));
        }
        if let Some(notice) = self.selector.notice() {
            spans.push(Span::styled(
                format!(" · {notice} (Ctrl-R to retry)"),
                self.theme.notice_style(),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn highlight_for(needle: &str, config: &Config, text: &str) -> Option<Vec<usize>> {
    if text.is_empty() || needle.is_empty() {
        return None;
    }
    match_indices(needle, text, config).map(|m| m.indices)
}

/// Build a cell whose characters at `indices` use the highlight style.
fn highlight_cell<'a>(text: &'a str, indices: Option<Vec<usize>>, theme: &Theme) -> Cell<'a> {
    Cell::from(highlight_line(text, indices, theme))
}

/// Split `text` into alternating plain and highlighted runs.
fn highlight_line<'a>(text: &'a str, indices: Option<Vec<usize>>, theme: &Theme) -> Line<'a> {
    let Some(mut sorted) = indices.filter(|indices| !indices.is_empty()) else {
        return Line::from(text);
    };
    sorted.sort_unstable();
    let mut next = sorted.into_iter().peekable();
    let mut buffer = String::new();
    let mut highlighted = false;
    let mut spans = Vec::new();

    for (idx, ch) in text.chars().enumerate() {
        let should_highlight = next.peek() == Some(&idx);
        if should_highlight {
            next.next();
        }
        if should_highlight != highlighted {
            if !buffer.is_empty() {
                spans.push(styled(mem::take(&mut buffer), highlighted, theme));
            }
            highlighted = should_highlight;
        }
        buffer.push(ch);
    }
    if !buffer.is_empty() {
        spans.push(styled(buffer, highlighted, theme));
    }

    Line::from(spans)
}

fn styled(text: String, highlighted: bool, theme: &Theme) -> Span<'static> {
    if highlighted {
        Span::styled(text, theme.highlight_style())
    } else {
        Span::raw(text)
    }
}
