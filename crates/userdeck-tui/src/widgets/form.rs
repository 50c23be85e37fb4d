//! A small vertical form: labeled single-line text fields with Tab
//! cycling, presence validation, and password masking.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use tui_input::{Input, InputRequest};

use crate::theme;

/// Rows each rendered field occupies (border + value + border).
pub const FIELD_HEIGHT: u16 = 3;

struct FormField {
    label: &'static str,
    mask: bool,
    input: Input,
}

/// An ordered set of text fields, one active at a time.
pub struct FieldSet {
    fields: Vec<FormField>,
    active: usize,
}

impl FieldSet {
    /// Build from `(label, masked)` specs.
    pub fn new(specs: &[(&'static str, bool)]) -> Self {
        let fields = specs
            .iter()
            .map(|&(label, mask)| FormField {
                label,
                mask,
                input: Input::default(),
            })
            .collect();
        Self { fields, active: 0 }
    }

    /// Pre-fill field values in declaration order (for the edit form).
    pub fn set_values(&mut self, values: &[&str]) {
        for (field, value) in self.fields.iter_mut().zip(values) {
            field.input = Input::new((*value).to_string());
        }
    }

    /// Clear every field and return focus to the first one.
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.input.reset();
        }
        self.active = 0;
    }

    /// Move focus to the next field (wraps).
    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.active = (self.active + 1) % self.fields.len();
        }
    }

    /// Move focus to the previous field (wraps).
    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.active = (self.active + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Current value of the field at `idx`, or "" out of range.
    pub fn value(&self, idx: usize) -> &str {
        self.fields.get(idx).map_or("", |f| f.input.value())
    }

    /// Label of the first field whose trimmed value is empty.
    ///
    /// Presence is the only client-side validation the console performs.
    pub fn first_empty_label(&self) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|f| f.input.value().trim().is_empty())
            .map(|f| f.label)
    }

    /// Feed a key press into the active field.
    pub fn handle_key(&mut self, key: KeyEvent) {
        let Some(field) = self.fields.get_mut(self.active) else {
            return;
        };
        let request = match key.code {
            KeyCode::Char(c) => Some(InputRequest::InsertChar(c)),
            KeyCode::Backspace => Some(InputRequest::DeletePrevChar),
            KeyCode::Delete => Some(InputRequest::DeleteNextChar),
            KeyCode::Left => Some(InputRequest::GoToPrevChar),
            KeyCode::Right => Some(InputRequest::GoToNextChar),
            KeyCode::Home => Some(InputRequest::GoToStart),
            KeyCode::End => Some(InputRequest::GoToEnd),
            _ => None,
        };
        if let Some(request) = request {
            field.input.handle(request);
        }
    }

    /// Total height the rendered form needs.
    pub fn height(&self) -> u16 {
        FIELD_HEIGHT * u16::try_from(self.fields.len()).unwrap_or(u16::MAX)
    }

    /// Render all fields stacked vertically. The active field gets a
    /// highlighted border and, when `focused`, the terminal cursor.
    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let constraints: Vec<Constraint> = self
            .fields
            .iter()
            .map(|_| Constraint::Length(FIELD_HEIGHT))
            .collect();
        let rows = Layout::vertical(constraints).split(area);

        for (i, (field, row)) in self.fields.iter().zip(rows.iter()).enumerate() {
            let is_active = i == self.active;
            let block = Block::default()
                .title(Span::styled(format!(" {} ", field.label), theme::form_label()))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(if is_active && focused {
                    theme::border_focused()
                } else {
                    theme::border_default()
                });
            let inner = block.inner(*row);
            frame.render_widget(block, *row);

            let shown = if field.mask {
                "\u{2022}".repeat(field.input.value().chars().count())
            } else {
                field.input.value().to_string()
            };
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(shown, theme::form_value()))),
                inner,
            );

            if is_active && focused {
                let cursor_x = inner
                    .x
                    .saturating_add(u16::try_from(field.input.visual_cursor()).unwrap_or(u16::MAX))
                    .min(inner.right().saturating_sub(1));
                frame.set_cursor_position(Position::new(cursor_x, inner.y));
            }
        }
    }
}
