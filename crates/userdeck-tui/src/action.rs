//! All UI actions. Actions are the sole mechanism for state mutation.

use userdeck_api::{Permission, User};

use crate::screen::Route;

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Success,
    Error,
}

/// A transient status-bar notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotifyLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotifyLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotifyLevel::Error,
        }
    }
}

/// Every state transition in the console is expressed as an Action.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,

    // ── Navigation ────────────────────────────────────────────────
    Goto(Route),

    // ── Backend results ───────────────────────────────────────────
    /// One page of the user list landed. Also sent after the automatic
    /// re-fetch that follows a delete.
    UsersLoaded {
        rows: Vec<User>,
        count: u64,
    },
    /// A list fetch failed; prior rows/total stay untouched.
    UsersLoadFailed,
    /// A single user landed (edit mount, permission mount, or the
    /// re-fetch after a permission toggle).
    UserLoaded(Box<User>),
    /// A single-user fetch failed. `not_found` selects the terminal
    /// not-found view over a notification.
    UserLoadFailed {
        not_found: bool,
    },
    /// The permission catalog landed.
    PermissionsLoaded(Vec<Permission>),
    UserCreated,
    UserCreateFailed,
    UserUpdated,
    UserUpdateFailed,

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
}
