//! Edit-user form.
//!
//! Fetches the target user on entry. The password is create-only and never
//! appears here. Submit merges the editable fields onto a copy of the
//! fetched entity and sends the whole object back.

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

/// Editable subset — username and password stay fixed after create.
const FIELDS: [(&str, bool); 4] = [
    ("First Name", false),
    ("Last Name", false),
    ("Email", false),
    ("Status", false),
];

pub struct EditUserScreen {
    focused: bool,
    cmd_tx: Option<UnboundedSender<Command>>,
    user_id: String,
    /// The fetched entity; `None` while the mount fetch is in flight.
    user: Option<User>,
    fields: FieldSet,
    submitting: bool,
    error: Option<String>,
}

impl EditUserScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            cmd_tx: None,
            user_id: String::new(),
            user: None,
            fields: FieldSet::new(&FIELDS),
            submitting: false,
            error: None,
        }
    }

    fn submit(&mut self) {
        let Some(user) = &self.user else { return };
        if let Some(label) = self.fields.first_empty_label() {
            self.error = Some(format!("{label} is required"));
            return;
        }
        self.error = None;
        self.submitting = true;

        // Merge the edited fields onto the fetched entity and send the
        // whole object; the password is never part of an update.
        let mut payload = user.clone();
        payload.first_name = self.fields.value(0).into();
        payload.last_name = self.fields.value(1).into();
        payload.email = self.fields.value(2).into();
        payload.status = self.fields.value(3).into();
        payload.password = None;

        if let Some(tx) = &self.cmd_tx {
            let _ = tx.send(Command::UpdateUser {
                id: self.user_id.clone(),
                payload: Box::new(payload),
            });
        }
    }
}

impl Component for EditUserScreen {
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
            return Ok(None);
        }
        match key.code {
            KeyCode::Esc => Ok(Some(Action::Goto(Route::Users))),
            KeyCode::Enter if self.user.is_some() => {
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
                if self.user.is_some() {
                    self.fields.handle_key(key);
                }
                Ok(None)
            }
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Goto(Route::EditUser(id)) => {
                self.user_id = id.clone();
                self.user = None;
                self.fields.reset();
                self.submitting = false;
                self.error = None;
                if let Some(tx) = &self.cmd_tx {
                    let _ = tx.send(Command::FetchUser(id.clone()));
                }
            }
            Action::UserLoaded(user) if self.user.is_none() => {
                self.fields.set_values(&[
                    &user.first_name,
                    &user.last_name,
                    &user.email,
                    &user.status,
                ]);
                self.user = Some((**user).clone());
            }
            Action::UserLoadFailed { .. } if self.user.is_none() => {
                // No entity to edit — terminal state.
                return Ok(Some(Action::Goto(Route::NotFound)));
            }
            Action::UserUpdated => {
                self.submitting = false;
                return Ok(Some(Action::Goto(Route::Users)));
            }
            Action::UserUpdateFailed => {
                self.submitting = false;
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = match &self.user {
            Some(user) => format!(" Edit user \u{2500} {} {} ", user.first_name, user.last_name),
            None => " Edit user ".into(),
        };
        let block = Block::default()
            .title(title)
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

        if self.user.is_none() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    " Loading user\u{2026}",
                    theme::key_hint(),
                ))),
                inner,
            );
            return;
        }

        let form_width = 48u16.min(inner.width);
        let x = inner.x + (inner.width.saturating_sub(form_width)) / 2;
        let centered = Rect::new(x, inner.y, form_width, inner.height);

        let layout = Layout::vertical([
            Constraint::Length(self.fields.height()),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(centered);

        self.fields.render(frame, layout[0], self.focused && !self.submitting);

        let status = if self.submitting {
            Line::from(Span::styled(" Saving\u{2026}", theme::key_hint()))
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
            Span::styled("save changes  ", theme::key_hint()),
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
        "EditUser"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

    fn fetched_user() -> User {
        User {
            id: Some("u1".into()),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            username: "ada".into(),
            email: "ada@example.com".into(),
            status: "active".into(),
            ..User::default()
        }
    }

    fn mounted(id: &str) -> (EditUserScreen, UnboundedReceiver<Command>) {
        let (action_tx, _action_rx) = unbounded_channel();
        let (cmd_tx, mut cmd_rx) = unbounded_channel();
        let mut screen = EditUserScreen::new();
        screen.init(action_tx, cmd_tx).unwrap();
        screen
            .update(&Action::Goto(Route::EditUser(id.into())))
            .unwrap();
        assert_eq!(cmd_rx.try_recv().unwrap(), Command::FetchUser(id.into()));
        (screen, cmd_rx)
    }

    #[test]
    fn form_is_initialized_from_the_fetched_entity() {
        let (mut screen, _cmd_rx) = mounted("u1");
        screen
            .update(&Action::UserLoaded(Box::new(fetched_user())))
            .unwrap();
        assert_eq!(screen.fields.value(0), "Ada");
        assert_eq!(screen.fields.value(2), "ada@example.com");
    }

    #[test]
    fn missing_user_is_terminal() {
        let (mut screen, _cmd_rx) = mounted("unknown-id");
        let follow_up = screen
            .update(&Action::UserLoadFailed { not_found: true })
            .unwrap();
        assert_eq!(follow_up, Some(Action::Goto(Route::NotFound)));
    }

    #[test]
    fn submit_merges_edits_onto_the_fetched_entity() {
        let (mut screen, mut cmd_rx) = mounted("u1");
        screen
            .update(&Action::UserLoaded(Box::new(fetched_user())))
            .unwrap();

        screen.fields.set_values(&["Augusta", "King", "ada@example.com", "retired"]);
        screen
            .handle_key_event(KeyEvent::new(
                KeyCode::Enter,
                crossterm::event::KeyModifiers::NONE,
            ))
            .unwrap();

        match cmd_rx.try_recv().unwrap() {
            Command::UpdateUser { id, payload } => {
                assert_eq!(id, "u1");
                assert_eq!(payload.first_name, "Augusta");
                assert_eq!(payload.status, "retired");
                // Untouched fields ride along from the fetched entity.
                assert_eq!(payload.username, "ada");
                assert_eq!(payload.id.as_deref(), Some("u1"));
                // Password is create-only.
                assert!(payload.password.is_none());
            }
            other => panic!("expected UpdateUser, got {other:?}"),
        }
    }

    #[test]
    fn update_failure_keeps_the_form() {
        let (mut screen, _cmd_rx) = mounted("u1");
        screen
            .update(&Action::UserLoaded(Box::new(fetched_user())))
            .unwrap();
        screen.submitting = true;
        let follow_up = screen.update(&Action::UserUpdateFailed).unwrap();
        assert_eq!(follow_up, None);
        assert!(!screen.submitting);
        assert!(screen.user.is_some());
    }
}
