//! Create-user form.
//!
//! Holds no entity until submit: the six fields are collected, presence-
//! checked, and sent as one payload. Success navigates back to the list;
//! failure leaves the form as typed.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use tokio::sync::mpsc::UnboundedSender;

use userdeck_api::User;

use crate::action::Action;
use crate::backend::Command;
use crate::component::Component;
use crate::screen::Route;
use crate::theme;
use crate::widgets::form::FieldSet;

/// Field order matches the backend console's create form.
const FIELDS: [(&str, bool); 6] = [
    ("First Name", false),
    ("Last Name", false),
    ("Username", false),
    ("Password", true),
    ("Email", false),
    ("Status", false),
];

pub struct CreateUserScreen {
    focused: bool,
    cmd_tx: Option<UnboundedSender<Command>>,
    fields: FieldSet,
    submitting: bool,
    error: Option<String>,
}

impl CreateUserScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            cmd_tx: None,
            fields: FieldSet::new(&FIELDS),
            submitting: false,
            error: None,
        }
    }

    fn submit(&mut self) {
        if let Some(label) = self.fields.first_empty_label() {
            self.error = Some(format!("{label} is required"));
            return;
        }
        self.error = None;
        self.submitting = true;

        let payload = User {
            first_name: self.fields.value(0).into(),
            last_name: self.fields.value(1).into(),
            username: self.fields.value(2).into(),
            password: Some(self.fields.value(3).into()),
            email: self.fields.value(4).into(),
            status: self.fields.value(5).into(),
            ..User::default()
        };
        if let Some(tx) = &self.cmd_tx {
            let _ = tx.send(Command::CreateUser(Box::new(payload)));
        }
    }
}

impl Component for CreateUserScreen {
    fn init(
        &mut self,
        _action_tx: UnboundedSender<Action>,
        cmd_tx: UnboundedSender<Command>,
    ) -> Result<()> {
        self.cmd_tx = Some(cmd_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.submitting {
            // One in-flight create at a time; the result decides what's next.
            return Ok(None);
        }
        match key.code {
            KeyCode::Esc => Ok(Some(Action::Goto(Route::Users))),
            KeyCode::Enter => {
                self.submit();
                Ok(None)
            }
            KeyCode::Tab | KeyCode::Down => {
                self.fields.focus_next();
                Ok(None)
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.fields.focus_prev();
                Ok(None)
            }
            _ => {
                self.fields.handle_key(key);
                Ok(None)
            }
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Goto(Route::CreateUser) => {
                self.fields.reset();
                self.submitting = false;
                self.error = None;
            }
            Action::UserCreated => {
                self.submitting = false;
                return Ok(Some(Action::Goto(Route::Users)));
            }
            Action::UserCreateFailed => {
                // Stay on the form; the notification already fired.
                self.submitting = false;
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" New user ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let form_width = 48u16.min(inner.width);
        let x = inner.x + (inner.width.saturating_sub(form_width)) / 2;
        let centered = Rect::new(x, inner.y, form_width, inner.height);

        let layout = Layout::vertical([
            Constraint::Length(self.fields.height()),
            Constraint::Length(1), // validation / progress line
            Constraint::Length(1), // hints
        ])
        .split(centered);

        self.fields.render(frame, layout[0], self.focused && !self.submitting);

        let status = if self.submitting {
            Line::from(Span::styled(" Creating\u{2026}", theme::key_hint()))
        } else if let Some(error) = &self.error {
            Line::from(Span::styled(format!(" {error}"), theme::tag_none()))
        } else {
            Line::from("")
        };
        frame.render_widget(Paragraph::new(status), layout[1]);

        let hints = Line::from(vec![
            Span::styled(" Tab ", theme::key_hint_key()),
            Span::styled("next field  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("create  ", theme::key_hint()),
            Span::styled("Esc ", theme::key_hint_key()),
            Span::styled("cancel", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[2]);
    }

    fn wants_text_input(&self) -> bool {
        true
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "CreateUser"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

    fn mounted() -> (CreateUserScreen, UnboundedReceiver<Command>) {
        let (action_tx, _action_rx) = unbounded_channel();
        let (cmd_tx, cmd_rx) = unbounded_channel();
        let mut screen = CreateUserScreen::new();
        screen.init(action_tx, cmd_tx).unwrap();
        screen.update(&Action::Goto(Route::CreateUser)).unwrap();
        (screen, cmd_rx)
    }

    fn type_text(screen: &mut CreateUserScreen, text: &str) {
        for c in text.chars() {
            screen
                .handle_key_event(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
                .unwrap();
        }
    }

    fn tab(screen: &mut CreateUserScreen) {
        screen
            .handle_key_event(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE))
            .unwrap();
    }

    fn enter(screen: &mut CreateUserScreen) {
        screen
            .handle_key_event(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
            .unwrap();
    }

    #[test]
    fn empty_fields_block_submission() {
        let (mut screen, mut cmd_rx) = mounted();
        enter(&mut screen);
        assert_eq!(screen.error.as_deref(), Some("First Name is required"));
        assert!(!screen.submitting);
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn submit_sends_the_full_field_set_with_password() {
        let (mut screen, mut cmd_rx) = mounted();
        for text in ["Ada", "Lovelace", "ada", "hunter2", "ada@example.com", "active"] {
            type_text(&mut screen, text);
            tab(&mut screen);
        }
        enter(&mut screen);

        assert!(screen.submitting);
        match cmd_rx.try_recv().unwrap() {
            Command::CreateUser(payload) => {
                assert_eq!(payload.first_name, "Ada");
                assert_eq!(payload.username, "ada");
                assert_eq!(payload.password.as_deref(), Some("hunter2"));
                assert!(payload.id.is_none());
            }
            other => panic!("expected CreateUser, got {other:?}"),
        }
    }

    #[test]
    fn success_navigates_back_to_the_list() {
        let (mut screen, _cmd_rx) = mounted();
        screen.submitting = true;
        let follow_up = screen.update(&Action::UserCreated).unwrap();
        assert_eq!(follow_up, Some(Action::Goto(Route::Users)));
    }

    #[test]
    fn failure_stays_on_the_form() {
        let (mut screen, _cmd_rx) = mounted();
        screen.submitting = true;
        let follow_up = screen.update(&Action::UserCreateFailed).unwrap();
        assert_eq!(follow_up, None);
        assert!(!screen.submitting);
    }
}
