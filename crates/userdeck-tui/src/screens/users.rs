//! User list — the console's home view.
//!
//! Pagination and sorting are server-side: every interaction derives fresh
//! query parameters from the *new* paging/sort intent and issues exactly
//! one fetch. The table is a projection of the most recent completed
//! fetch; in-flight requests are never cancelled or de-duplicated, so the
//! last response to resolve wins.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, TableState};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc::UnboundedSender;

use userdeck_api::{ListParams, SortKey, SortOrder, User};

use crate::action::Action;
use crate::backend::Command;
use crate::component::Component;
use crate::screen::Route;
use crate::theme;
use crate::widgets::perm_tags;

/// Page sizes offered by the size toggle, smallest first.
const PAGE_SIZES: [u32; 3] = [10, 20, 50];

/// Sort applied when the operator has not picked a column.
const DEFAULT_SORT: (SortKey, SortOrder) = (SortKey::CreatedAt, SortOrder::Desc);

/// A delete pending confirmation: (user id, display name).
struct PendingDelete {
    id: String,
    name: String,
}

/// Wire spelling of a sort column, for the summary line.
fn sort_key_label(key: SortKey) -> &'static str {
    match key {
        SortKey::FirstName => "firstName",
        SortKey::LastName => "lastName",
        SortKey::Email => "email",
        SortKey::Status => "status",
        SortKey::CreatedAt => "createdAt",
    }
}

fn order_arrow(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Asc => "\u{2191}",
        SortOrder::Desc => "\u{2193}",
    }
}

pub struct UsersScreen {
    focused: bool,
    cmd_tx: Option<UnboundedSender<Command>>,
    rows: Vec<User>,
    /// 1-based page shown in the control; the wire is zero-based.
    page: u32,
    page_size: u32,
    /// Server-reported row count from the most recent completed fetch.
    total: u64,
    /// Active sort; `None` means the default (createdAt descending).
    sort: Option<(SortKey, SortOrder)>,
    loading: bool,
    cursor: TableState,
    confirm: Option<PendingDelete>,
    throbber: ThrobberState,
}

impl UsersScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            cmd_tx: None,
            rows: Vec::new(),
            page: 1,
            page_size: PAGE_SIZES[0],
            total: 0,
            sort: None,
            loading: false,
            cursor: TableState::default(),
            confirm: None,
            throbber: ThrobberState::default(),
        }
    }

    /// Derive wire parameters from the current paging/sort intent.
    fn params(&self) -> ListParams {
        let (sort_key, sort_order) = self.sort.unwrap_or(DEFAULT_SORT);
        ListParams {
            limit: self.page_size,
            page: self.page.saturating_sub(1),
            sort_key,
            sort_order,
        }
    }

    /// Highest reachable page given the last reported total.
    fn last_page(&self) -> u32 {
        let pages = self.total.div_ceil(u64::from(self.page_size)).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Issue one fetch for the current parameters.
    fn refetch(&mut self) {
        self.loading = true;
        if let Some(tx) = &self.cmd_tx {
            let _ = tx.send(Command::FetchUsers(self.params()));
        }
    }

    fn selected_user(&self) -> Option<&User> {
        self.rows.get(self.cursor.selected().unwrap_or(0))
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let current = self.cursor.selected().unwrap_or(0) as isize;
        let max = self.rows.len() as isize - 1;
        let next = (current + delta).clamp(0, max);
        self.cursor.select(Some(next as usize));
    }

    fn next_page(&mut self) {
        if self.page < self.last_page() {
            self.page += 1;
            self.refetch();
        }
    }

    fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
            self.refetch();
        }
    }

    /// Step the page size up or down the fixed ladder; a new size starts
    /// back at page 1.
    fn step_page_size(&mut self, up: bool) {
        let idx = PAGE_SIZES
            .iter()
            .position(|&s| s == self.page_size)
            .unwrap_or(0);
        let new = if up {
            PAGE_SIZES.get(idx + 1).copied()
        } else {
            idx.checked_sub(1).and_then(|i| PAGE_SIZES.get(i).copied())
        };
        if let Some(size) = new {
            self.page_size = size;
            self.page = 1;
            self.refetch();
        }
    }

    /// Cycle the sort column: default → each column ascending-first →
    /// back to default. Direction is preserved while cycling columns.
    fn cycle_sort_key(&mut self) {
        self.sort = match self.sort {
            None => Some((SortKey::ALL[0], SortOrder::Asc)),
            Some((key, order)) => {
                let idx = SortKey::ALL.iter().position(|&k| k == key).unwrap_or(0);
                SortKey::ALL.get(idx + 1).map(|&next| (next, order))
            }
        };
        self.refetch();
    }

    /// Flip the sort direction of the active column (or of the default).
    fn toggle_sort_order(&mut self) {
        let (key, order) = self.sort.unwrap_or(DEFAULT_SORT);
        self.sort = Some((key, order.toggled()));
        self.refetch();
    }

    /// The sort shown in the header — the explicit pick or the default.
    fn effective_sort(&self) -> (SortKey, SortOrder) {
        self.sort.unwrap_or(DEFAULT_SORT)
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                if let Some(pending) = self.confirm.take() {
                    self.loading = true;
                    if let Some(tx) = &self.cmd_tx {
                        let _ = tx.send(Command::DeleteUser {
                            id: pending.id,
                            refetch: self.params(),
                        });
                    }
                }
                None
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.confirm = None;
                None
            }
            _ => None,
        }
    }

    fn render_confirm(&self, frame: &mut Frame, area: Rect) {
        let Some(pending) = &self.confirm else { return };

        let width = 52u16.min(area.width.saturating_sub(4));
        let height = 7u16;
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let popup = Rect::new(x, y, width, height.min(area.height));

        frame.render_widget(Clear, popup);
        let block = Block::default()
            .title(" Confirm ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                " Are you sure you want to delete this user?",
                theme::table_row(),
            )),
            Line::from(Span::styled(
                format!(" {}", pending.name),
                Style::default().fg(theme::AMBER),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(" y ", theme::key_hint_key()),
                Span::styled("delete   ", theme::key_hint()),
                Span::styled("n ", theme::key_hint_key()),
                Span::styled("cancel", theme::key_hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn header_cells(&self) -> Vec<Cell<'static>> {
        let (active_key, order) = self.effective_sort();
        let arrow = order_arrow(order);
        let sortable = |key: SortKey, label: &str| -> Cell<'static> {
            let text = if key == active_key {
                format!("{label} {arrow}")
            } else {
                label.to_string()
            };
            Cell::from(text).style(theme::table_header())
        };
        vec![
            sortable(SortKey::FirstName, "First Name"),
            sortable(SortKey::LastName, "Last Name"),
            sortable(SortKey::Email, "Email"),
            sortable(SortKey::Status, "Status"),
            Cell::from("Permissions").style(theme::table_header()),
            sortable(SortKey::CreatedAt, "Date created"),
        ]
    }
}

impl Component for UsersScreen {
    fn init(
        &mut self,
        _action_tx: UnboundedSender<Action>,
        cmd_tx: UnboundedSender<Command>,
    ) -> Result<()> {
        self.cmd_tx = Some(cmd_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.confirm.is_some() {
            return Ok(self.handle_confirm_key(key));
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_cursor(1);
                Ok(None)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_cursor(-1);
                Ok(None)
            }
            KeyCode::Char('g') => {
                if !self.rows.is_empty() {
                    self.cursor.select(Some(0));
                }
                Ok(None)
            }
            KeyCode::Char('G') => {
                if !self.rows.is_empty() {
                    self.cursor.select(Some(self.rows.len() - 1));
                }
                Ok(None)
            }
            KeyCode::Char('l') | KeyCode::Right | KeyCode::PageDown => {
                self.next_page();
                Ok(None)
            }
            KeyCode::Char('h') | KeyCode::Left | KeyCode::PageUp => {
                self.prev_page();
                Ok(None)
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.step_page_size(true);
                Ok(None)
            }
            KeyCode::Char('-') => {
                self.step_page_size(false);
                Ok(None)
            }
            KeyCode::Char('s') => {
                self.cycle_sort_key();
                Ok(None)
            }
            KeyCode::Char('o') => {
                self.toggle_sort_order();
                Ok(None)
            }
            KeyCode::Char('r') => {
                self.refetch();
                Ok(None)
            }
            KeyCode::Char('c') => Ok(Some(Action::Goto(Route::CreateUser))),
            KeyCode::Char('e') | KeyCode::Enter => {
                let id = self.selected_user().and_then(|u| u.id.clone());
                Ok(id.map(|id| Action::Goto(Route::EditUser(id))))
            }
            KeyCode::Char('a') => {
                let id = self.selected_user().and_then(|u| u.id.clone());
                Ok(id.map(|id| Action::Goto(Route::Permissions(id))))
            }
            KeyCode::Char('d') => {
                if let Some(user) = self.selected_user() {
                    if let Some(id) = user.id.clone() {
                        self.confirm = Some(PendingDelete {
                            id,
                            name: format!("{} {}", user.first_name, user.last_name),
                        });
                    }
                }
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            // Mount: paging/sort state starts from defaults every time.
            Action::Goto(Route::Users) => {
                self.page = 1;
                self.page_size = PAGE_SIZES[0];
                self.sort = None;
                self.total = 0;
                self.rows.clear();
                self.cursor = TableState::default();
                self.confirm = None;
                self.refetch();
            }
            Action::UsersLoaded { rows, count } => {
                self.rows = rows.clone();
                self.total = *count;
                self.loading = false;
                if self.rows.is_empty() {
                    self.cursor.select(None);
                } else {
                    let idx = self.cursor.selected().unwrap_or(0).min(self.rows.len() - 1);
                    self.cursor.select(Some(idx));
                }
            }
            Action::UsersLoadFailed => {
                // Keep the last successful snapshot on screen.
                self.loading = false;
            }
            Action::Tick => {
                if self.loading {
                    self.throbber.calc_next();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" Users ({}) ", self.total))
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

        let layout = Layout::vertical([
            Constraint::Length(1), // paging/sort summary
            Constraint::Min(1),    // table
            Constraint::Length(1), // key hints
        ])
        .split(inner);

        // Paging / sort summary line
        let (sort_key, sort_order) = self.effective_sort();
        let mut summary = vec![
            Span::styled(" page ", theme::key_hint()),
            Span::styled(
                format!("{}/{}", self.page, self.last_page()),
                Style::default().fg(theme::TEAL),
            ),
            Span::styled(
                format!("  {} users  {}/page", self.total, self.page_size),
                theme::key_hint(),
            ),
            Span::styled("  sort: ", theme::key_hint()),
            Span::styled(
                format!("{} {}", sort_key_label(sort_key), order_arrow(sort_order)),
                Style::default().fg(theme::STEEL_BLUE),
            ),
        ];
        if self.loading {
            summary.push(Span::raw("  "));
        }
        frame.render_widget(Paragraph::new(Line::from(summary)), layout[0]);
        if self.loading {
            let throbber = Throbber::default().style(Style::default().fg(theme::AMBER));
            let spinner_area = Rect::new(
                layout[0].right().saturating_sub(2),
                layout[0].y,
                2.min(layout[0].width),
                1,
            );
            let mut state = self.throbber.clone();
            frame.render_stateful_widget(throbber, spinner_area, &mut state);
        }

        // Table
        let header = Row::new(self.header_cells());
        let rows: Vec<Row> = self
            .rows
            .iter()
            .map(|user| {
                let created = user
                    .created_at
                    .map(|dt| dt.format("%Y-%m-%dT%H:%M").to_string())
                    .unwrap_or_else(|| "\u{2500}".into());
                Row::new(vec![
                    Cell::from(user.first_name.clone()),
                    Cell::from(user.last_name.clone()),
                    Cell::from(user.email.clone()),
                    Cell::from(user.status.clone()),
                    Cell::from(perm_tags::tags_line(&user.user_permissions)),
                    Cell::from(created),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Min(12),
            Constraint::Min(12),
            Constraint::Min(20),
            Constraint::Length(10),
            Constraint::Min(16),
            Constraint::Length(17),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());
        let mut cursor = self.cursor.clone();
        frame.render_stateful_widget(table, layout[1], &mut cursor);

        // Key hints
        let hints = Line::from(vec![
            Span::styled(" j/k ", theme::key_hint_key()),
            Span::styled("select  ", theme::key_hint()),
            Span::styled("h/l ", theme::key_hint_key()),
            Span::styled("page  ", theme::key_hint()),
            Span::styled("+/- ", theme::key_hint_key()),
            Span::styled("size  ", theme::key_hint()),
            Span::styled("s/o ", theme::key_hint_key()),
            Span::styled("sort  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("edit  ", theme::key_hint()),
            Span::styled("a ", theme::key_hint_key()),
            Span::styled("assign  ", theme::key_hint()),
            Span::styled("d ", theme::key_hint_key()),
            Span::styled("delete  ", theme::key_hint()),
            Span::styled("c ", theme::key_hint_key()),
            Span::styled("new  ", theme::key_hint()),
            Span::styled("q ", theme::key_hint_key()),
            Span::styled("quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[2]);

        self.render_confirm(frame, area);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "Users"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn mounted() -> (UsersScreen, UnboundedReceiver<Command>) {
        let (action_tx, _action_rx) = unbounded_channel();
        let (cmd_tx, mut cmd_rx) = unbounded_channel();
        let mut screen = UsersScreen::new();
        screen.init(action_tx, cmd_tx).unwrap();
        screen.update(&Action::Goto(Route::Users)).unwrap();
        // Swallow the mount fetch so tests see only their own commands.
        cmd_rx.try_recv().unwrap();
        (screen, cmd_rx)
    }

    fn user(id: &str) -> User {
        User {
            id: Some(id.into()),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            username: "ada".into(),
            email: "ada@example.com".into(),
            status: "active".into(),
            ..User::default()
        }
    }

    fn load(screen: &mut UsersScreen, rows: Vec<User>, count: u64) {
        screen
            .update(&Action::UsersLoaded { rows, count })
            .unwrap();
    }

    #[test]
    fn mount_issues_one_fetch_with_default_params() {
        let (action_tx, _action_rx) = unbounded_channel();
        let (cmd_tx, mut cmd_rx) = unbounded_channel();
        let mut screen = UsersScreen::new();
        screen.init(action_tx, cmd_tx).unwrap();
        screen.update(&Action::Goto(Route::Users)).unwrap();

        let cmd = cmd_rx.try_recv().unwrap();
        assert_eq!(cmd, Command::FetchUsers(ListParams::default()));
        assert!(cmd_rx.try_recv().is_err());
        assert!(screen.loading);
    }

    #[test]
    fn wire_page_is_displayed_page_minus_one() {
        let (mut screen, _cmd_rx) = mounted();
        screen.page = 3;
        assert_eq!(screen.params().page, 2);
    }

    #[test]
    fn unset_sort_defaults_to_created_at_descending() {
        let (screen, _cmd_rx) = mounted();
        let params = screen.params();
        assert_eq!(params.sort_key, SortKey::CreatedAt);
        assert_eq!(params.sort_order, SortOrder::Desc);
    }

    #[test]
    fn sort_cycle_starts_ascending_and_wraps_to_default() {
        let (mut screen, mut cmd_rx) = mounted();

        screen.handle_key_event(key('s')).unwrap();
        assert_eq!(screen.sort, Some((SortKey::FirstName, SortOrder::Asc)));
        assert_eq!(
            cmd_rx.try_recv().unwrap(),
            Command::FetchUsers(ListParams {
                sort_key: SortKey::FirstName,
                sort_order: SortOrder::Asc,
                ..ListParams::default()
            })
        );

        // Walk through the remaining columns and back to the default.
        for _ in 1..SortKey::ALL.len() {
            screen.handle_key_event(key('s')).unwrap();
        }
        assert_eq!(screen.sort, Some((SortKey::CreatedAt, SortOrder::Asc)));
        screen.handle_key_event(key('s')).unwrap();
        assert_eq!(screen.sort, None);
    }

    #[test]
    fn toggling_order_from_default_goes_ascending() {
        let (mut screen, mut cmd_rx) = mounted();
        screen.handle_key_event(key('o')).unwrap();
        assert_eq!(screen.sort, Some((SortKey::CreatedAt, SortOrder::Asc)));
        match cmd_rx.try_recv().unwrap() {
            Command::FetchUsers(p) => assert_eq!(p.sort_order, SortOrder::Asc),
            other => panic!("expected FetchUsers, got {other:?}"),
        }
    }

    #[test]
    fn page_turn_derives_params_from_the_new_intent() {
        let (mut screen, mut cmd_rx) = mounted();
        load(&mut screen, vec![user("u1")], 25);

        screen.handle_key_event(key('l')).unwrap();
        assert_eq!(screen.page, 2);
        match cmd_rx.try_recv().unwrap() {
            Command::FetchUsers(p) => assert_eq!(p.page, 1),
            other => panic!("expected FetchUsers, got {other:?}"),
        }
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn page_turn_is_bounded_by_the_reported_total() {
        let (mut screen, mut cmd_rx) = mounted();
        load(&mut screen, vec![user("u1")], 5);

        // One page of five rows: neither direction moves.
        screen.handle_key_event(key('l')).unwrap();
        screen.handle_key_event(key('h')).unwrap();
        assert_eq!(screen.page, 1);
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn emptied_last_page_stays_put() {
        let (mut screen, _cmd_rx) = mounted();
        load(&mut screen, vec![user("u1")], 11);
        screen.page = 2;

        // The delete refetch of page 2 comes back empty: no step-back.
        load(&mut screen, vec![], 10);
        assert_eq!(screen.page, 2);
        assert!(screen.rows.is_empty());
        assert_eq!(screen.total, 10);
        assert!(!screen.loading);
    }

    #[test]
    fn fetch_failure_keeps_the_last_snapshot() {
        let (mut screen, _cmd_rx) = mounted();
        load(&mut screen, vec![user("u1"), user("u2")], 2);

        screen.refetch();
        assert!(screen.loading);
        screen.update(&Action::UsersLoadFailed).unwrap();
        assert!(!screen.loading);
        assert_eq!(screen.rows.len(), 2);
        assert_eq!(screen.total, 2);
    }

    #[test]
    fn total_tracks_the_most_recent_completed_fetch() {
        let (mut screen, _cmd_rx) = mounted();
        load(&mut screen, vec![user("u1")], 7);
        screen.refetch();
        // A fetch is mid-flight, but the displayed total is the last one.
        assert_eq!(screen.total, 7);
        load(&mut screen, vec![user("u1"), user("u2")], 9);
        assert_eq!(screen.total, 9);
    }

    #[test]
    fn delete_is_gated_on_confirmation() {
        let (mut screen, mut cmd_rx) = mounted();
        load(&mut screen, vec![user("u1")], 1);

        screen.handle_key_event(key('d')).unwrap();
        assert!(screen.confirm.is_some());
        assert!(cmd_rx.try_recv().is_err());

        // Declining leaves the row alone.
        screen.handle_key_event(key('n')).unwrap();
        assert!(screen.confirm.is_none());
        assert!(cmd_rx.try_recv().is_err());

        // Confirming issues the delete with the current page's params.
        screen.handle_key_event(key('d')).unwrap();
        screen.handle_key_event(key('y')).unwrap();
        assert_eq!(
            cmd_rx.try_recv().unwrap(),
            Command::DeleteUser {
                id: "u1".into(),
                refetch: screen.params(),
            }
        );
        assert!(screen.loading);
    }

    #[test]
    fn page_size_step_resets_to_the_first_page() {
        let (mut screen, mut cmd_rx) = mounted();
        load(&mut screen, vec![user("u1")], 40);
        screen.page = 3;

        screen.handle_key_event(key('+')).unwrap();
        assert_eq!(screen.page_size, 20);
        assert_eq!(screen.page, 1);
        match cmd_rx.try_recv().unwrap() {
            Command::FetchUsers(p) => {
                assert_eq!(p.limit, 20);
                assert_eq!(p.page, 0);
            }
            other => panic!("expected FetchUsers, got {other:?}"),
        }
    }

    #[test]
    fn selection_navigates_to_edit_and_assign() {
        let (mut screen, _cmd_rx) = mounted();
        load(&mut screen, vec![user("u1")], 1);

        let action = screen.handle_key_event(key('e')).unwrap();
        assert_eq!(action, Some(Action::Goto(Route::EditUser("u1".into()))));
        let action = screen.handle_key_event(key('a')).unwrap();
        assert_eq!(action, Some(Action::Goto(Route::Permissions("u1".into()))));
    }
}
