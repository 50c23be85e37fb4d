//! Catch-all not-found view — terminal, no interactive elements.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub struct NotFoundScreen {
    focused: bool,
}

impl NotFoundScreen {
    pub fn new() -> Self {
        Self { focused: false }
    }
}

impl Component for NotFoundScreen {
    fn handle_key_event(&mut self, _key: KeyEvent) -> Result<Option<Action>> {
        // Terminal state: only the app-level keys (Esc, quit) apply.
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(3),
            Constraint::Fill(1),
        ])
        .split(inner);

        let lines = vec![
            Line::from(Span::styled(
                "404",
                Style::default()
                    .fg(theme::AMBER)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled("User not found.", theme::table_row())),
            Line::from(Span::styled("Esc to return", theme::key_hint())),
        ];
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            layout[1],
        );
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "NotFound"
    }
}
