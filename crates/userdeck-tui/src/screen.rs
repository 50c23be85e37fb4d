//! Routable views and their identifiers.

use std::fmt;

/// A routable view, mirroring the console's URL space: the list at `/`,
/// `/user` for create, `/user/:userId` for edit,
/// `/permissions/user/:userId` for assignment, and a catch-all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Users,
    CreateUser,
    EditUser(String),
    Permissions(String),
    NotFound,
}

impl Route {
    /// The screen that renders this route.
    pub fn screen(&self) -> ScreenId {
        match self {
            Self::Users => ScreenId::Users,
            Self::CreateUser => ScreenId::CreateUser,
            Self::EditUser(_) => ScreenId::EditUser,
            Self::Permissions(_) => ScreenId::Permissions,
            Self::NotFound => ScreenId::NotFound,
        }
    }
}

/// Identifies each screen component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenId {
    Users,
    CreateUser,
    EditUser,
    Permissions,
    NotFound,
}

impl ScreenId {
    /// Title shown in the status bar.
    pub fn title(self) -> &'static str {
        match self {
            Self::Users => "Users",
            Self::CreateUser => "New user",
            Self::EditUser => "Edit user",
            Self::Permissions => "Permissions",
            Self::NotFound => "Not found",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}
