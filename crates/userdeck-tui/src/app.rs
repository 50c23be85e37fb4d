//! Application core — event loop, route switching, action dispatch.

use std::collections::HashMap;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use userdeck_api::ApiClient;

use crate::action::{Action, Notification};
use crate::backend::{Command, spawn_backend};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::{Route, ScreenId};
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;

/// How long a notification stays on the status bar, in ticks (4 Hz).
const NOTIFY_TICKS: u8 = 16;

/// Top-level application state and event loop.
pub struct App {
    /// The route currently on screen.
    route: Route,
    /// All screen components, keyed by ScreenId.
    screens: HashMap<ScreenId, Box<dyn Component>>,
    /// Whether the app should keep running.
    running: bool,
    /// Current status-bar notification and its remaining ticks.
    notification: Option<(Notification, u8)>,
    /// Action sender — screens dispatch follow-ups through this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver — main loop drains this.
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Backend command sender, handed to every screen on init.
    cmd_tx: mpsc::UnboundedSender<Command>,
    /// Taken by `run` when the backend task starts.
    cmd_rx: Option<mpsc::UnboundedReceiver<Command>>,
    api: ApiClient,
}

impl App {
    pub fn new(api: ApiClient) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens().into_iter().collect();

        Self {
            route: Route::Users,
            screens,
            running: true,
            notification: None,
            action_tx,
            action_rx,
            cmd_tx,
            cmd_rx: Some(cmd_rx),
            api,
        }
    }

    /// Initialize all screen components with the shared senders.
    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone(), self.cmd_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.route.screen()) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.init_screens()?;

        let cancel = CancellationToken::new();
        let cmd_rx = self
            .cmd_rx
            .take()
            .ok_or_else(|| color_eyre::eyre::eyre!("app already ran"))?;
        let backend = spawn_backend(
            self.api.clone(),
            cmd_rx,
            self.action_tx.clone(),
            cancel.clone(),
        );

        // Mount the home view; this triggers the initial list fetch.
        self.action_tx.send(Action::Goto(Route::Users))?;

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(_, _) | Event::Render => {
                    self.action_tx.send(Action::Render)?;
                }
                Event::Tick => {
                    self.action_tx.send(Action::Tick)?;
                }
            }

            // Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        cancel.cancel();
        backend.abort();
        info!("event loop ended");
        Ok(())
    }

    /// Map a key event to an action. The active screen gets first crack;
    /// global keys only apply to whatever it leaves unhandled, and
    /// printable shortcuts are suppressed while a form is typing.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        let id = self.route.screen();
        let mut typing = false;
        if let Some(screen) = self.screens.get_mut(&id) {
            typing = screen.wants_text_input();
            if let Some(action) = screen.handle_key_event(key)? {
                return Ok(Some(action));
            }
        }

        if !typing {
            match key.code {
                KeyCode::Char('q') => return Ok(Some(Action::Quit)),
                KeyCode::Esc if self.route != Route::Users => {
                    return Ok(Some(Action::Goto(Route::Users)));
                }
                _ => {}
            }
        }

        Ok(None)
    }

    /// Process a single action — update app state and propagate to screens.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Goto(target) => {
                debug!("navigating: {:?} \u{2192} {:?}", self.route, target);
                if let Some(screen) = self.screens.get_mut(&self.route.screen()) {
                    screen.set_focused(false);
                }
                self.route = target.clone();
                if let Some(screen) = self.screens.get_mut(&self.route.screen()) {
                    screen.set_focused(true);
                }
                // The target screen resets its state off this same action.
                self.forward_to_active(action)?;
            }

            Action::Notify(notification) => {
                self.notification = Some((notification.clone(), NOTIFY_TICKS));
            }

            Action::Tick => {
                if let Some((_, ticks)) = &mut self.notification {
                    *ticks = ticks.saturating_sub(1);
                    if *ticks == 0 {
                        self.notification = None;
                    }
                }
                self.forward_to_active(action)?;
            }

            // Render is handled in the main loop, not here
            Action::Render => {}

            // Everything else is screen state
            other => self.forward_to_active(other)?,
        }

        Ok(())
    }

    fn forward_to_active(&mut self, action: &Action) -> Result<()> {
        let id = self.route.screen();
        if let Some(screen) = self.screens.get_mut(&id) {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    /// Render the full application frame.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::vertical([
            Constraint::Min(1),    // screen content
            Constraint::Length(1), // status bar
        ])
        .split(area);

        if let Some(screen) = self.screens.get(&self.route.screen()) {
            screen.render(frame, layout[0]);
        }

        self.render_status_bar(frame, layout[1]);
    }

    /// Status bar: the route title, plus any live notification.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(" userdeck ", theme::title_style()),
            Span::styled(
                format!("\u{2502} {} ", self.route.screen().title()),
                theme::key_hint(),
            ),
        ];

        if let Some((notification, _)) = &self.notification {
            spans.push(Span::styled(
                format!(" {} ", notification.message),
                theme::notify(notification.level),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
