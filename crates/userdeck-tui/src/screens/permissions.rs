//! Permission assignment — one checkbox per catalog permission.
//!
//! The target user and the catalog are fetched independently on entry
//! (neither depends on the other). A checkbox is checked iff the user's
//! edge set contains that permission; toggling issues the assign or
//! unassign call and then re-fetches the user, so the rendered set is
//! always the server's truth — never an optimistic local flip.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph};
use tokio::sync::mpsc::UnboundedSender;

use userdeck_api::{Permission, User};

use crate::action::Action;
use crate::backend::Command;
use crate::component::Component;
use crate::screen::Route;
use crate::theme;
use crate::widgets::perm_tags;

pub struct PermissionsScreen {
    focused: bool,
    cmd_tx: Option<UnboundedSender<Command>>,
    user_id: String,
    /// Server truth for the checked set; `None` until the mount fetch lands.
    user: Option<User>,
    catalog: Vec<Permission>,
    cursor: ListState,
}

impl PermissionsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            cmd_tx: None,
            user_id: String::new(),
            user: None,
            catalog: Vec::new(),
            cursor: ListState::default(),
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.catalog.is_empty() {
            return;
        }
        let current = self.cursor.selected().unwrap_or(0) as isize;
        let max = self.catalog.len() as isize - 1;
        let next = (current + delta).clamp(0, max);
        self.cursor.select(Some(next as usize));
    }

    /// Toggle the permission under the cursor. Checked state comes from
    /// the user's edge set, so a toggle is an assign or an unassign —
    /// each immediately followed by a user re-fetch in the backend task.
    fn toggle_selected(&mut self) {
        let Some(user) = &self.user else { return };
        let Some(permission) = self.catalog.get(self.cursor.selected().unwrap_or(0)) else {
            return;
        };
        let cmd = if user.has_permission(&permission.id) {
            Command::UnassignPermission {
                user_id: self.user_id.clone(),
                permission_id: permission.id.clone(),
            }
        } else {
            Command::AssignPermission {
                user_id: self.user_id.clone(),
                permission_id: permission.id.clone(),
            }
        };
        if let Some(tx) = &self.cmd_tx {
            let _ = tx.send(cmd);
        }
    }

    fn render_user_panel(&self, frame: &mut Frame, area: Rect, user: &User) {
        let block = Block::default()
            .title(" User information ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let label = |text: &'static str| Span::styled(format!("  {text:<12}"), theme::form_label());
        let value = |text: &str| Span::styled(text.to_string(), theme::table_row());

        let mut tags = perm_tags::tags_line(&user.user_permissions);
        tags.spans.insert(0, label("Permissions"));

        let lines = vec![
            Line::from(vec![label("First name"), value(&user.first_name)]),
            Line::from(vec![label("Last name"), value(&user.last_name)]),
            Line::from(vec![label("Email"), value(&user.email)]),
            Line::from(vec![label("Status"), value(&user.status)]),
            tags,
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Component for PermissionsScreen {
    fn init(
        &mut self,
        _action_tx: UnboundedSender<Action>,
        cmd_tx: UnboundedSender<Command>,
    ) -> Result<()> {
        self.cmd_tx = Some(cmd_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Esc => Ok(Some(Action::Goto(Route::Users))),
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_cursor(1);
                Ok(None)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_cursor(-1);
                Ok(None)
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.toggle_selected();
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Goto(Route::Permissions(id)) => {
                self.user_id = id.clone();
                self.user = None;
                self.catalog.clear();
                self.cursor = ListState::default();
                // Two independent fetches; neither waits on the other.
                if let Some(tx) = &self.cmd_tx {
                    let _ = tx.send(Command::FetchUser(id.clone()));
                    let _ = tx.send(Command::FetchPermissions);
                }
            }
            Action::UserLoaded(user) => {
                // Initial load and every post-toggle re-fetch land here;
                // the checked set is whatever the server just said.
                self.user = Some((**user).clone());
            }
            Action::UserLoadFailed { .. } if self.user.is_none() => {
                return Ok(Some(Action::Goto(Route::NotFound)));
            }
            Action::PermissionsLoaded(catalog) => {
                self.catalog = catalog.clone();
                if self.cursor.selected().is_none() && !self.catalog.is_empty() {
                    self.cursor.select(Some(0));
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Permissions ")
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

        let Some(user) = &self.user else {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    " Loading user\u{2026}",
                    theme::key_hint(),
                ))),
                inner,
            );
            return;
        };

        let layout = Layout::vertical([
            Constraint::Length(7), // user info panel
            Constraint::Min(1),    // checkbox list
            Constraint::Length(1), // hints
        ])
        .split(inner);

        self.render_user_panel(frame, layout[0], user);

        let items: Vec<ListItem> = self
            .catalog
            .iter()
            .map(|permission| {
                let checked = user.has_permission(&permission.id);
                let mark = if checked { "[x]" } else { "[ ]" };
                let mark_style = if checked {
                    Style::default().fg(theme::SUCCESS_GREEN)
                } else {
                    theme::key_hint()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!(" {mark} "), mark_style),
                    Span::styled(permission.code.clone(), theme::tag()),
                    Span::styled(
                        format!("  {}", permission.description),
                        theme::key_hint(),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items).highlight_style(theme::table_selected());
        let mut cursor = self.cursor.clone();
        frame.render_stateful_widget(list, layout[1], &mut cursor);

        let hints = Line::from(vec![
            Span::styled(" j/k ", theme::key_hint_key()),
            Span::styled("select  ", theme::key_hint()),
            Span::styled("Space ", theme::key_hint_key()),
            Span::styled("toggle  ", theme::key_hint()),
            Span::styled("Esc ", theme::key_hint_key()),
            Span::styled("back", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[2]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "Permissions"
    }
}
