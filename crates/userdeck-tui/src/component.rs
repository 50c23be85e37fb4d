//! Component trait — the building block for every screen.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};
use tokio::sync::mpsc::UnboundedSender;

use crate::action::Action;
use crate::backend::Command;

/// Every screen implements Component.
///
/// Lifecycle: `init` → (`handle_key_event` | `update` | `render`)*.
/// Screens mutate their own state only; cross-screen effects travel as
/// [`Action`]s, and all I/O is requested by sending a [`Command`] to the
/// backend task.
pub trait Component: Send {
    /// Called once when the component is mounted. Receives the action
    /// sender (for dispatching follow-ups) and the backend command sender.
    fn init(
        &mut self,
        _action_tx: UnboundedSender<Action>,
        _cmd_tx: UnboundedSender<Command>,
    ) -> Result<()> {
        Ok(())
    }

    /// Handle a keyboard event. Return an Action to dispatch, or None.
    fn handle_key_event(&mut self, _key: KeyEvent) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Process a dispatched action. May return a follow-up action.
    fn update(&mut self, _action: &Action) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Render into the provided frame area.
    fn render(&self, frame: &mut Frame, area: Rect);

    /// Whether this screen is currently typing into a text field. While
    /// true, the app loop must not steal printable keys for global
    /// shortcuts.
    fn wants_text_input(&self) -> bool {
        false
    }

    /// Set focus state.
    fn set_focused(&mut self, _focused: bool) {}

    /// Unique identifier for this component.
    fn id(&self) -> &str;
}
