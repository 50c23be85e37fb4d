//! Screen components, one per routable view.

mod create_user;
mod edit_user;
mod not_found;
mod permissions;
mod users;

use crate::component::Component;
use crate::screen::ScreenId;

/// Instantiate every screen, keyed by its id.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Users,
            Box::new(users::UsersScreen::new()) as Box<dyn Component>,
        ),
        (
            ScreenId::CreateUser,
            Box::new(create_user::CreateUserScreen::new()),
        ),
        (ScreenId::EditUser, Box::new(edit_user::EditUserScreen::new())),
        (
            ScreenId::Permissions,
            Box::new(permissions::PermissionsScreen::new()),
        ),
        (ScreenId::NotFound, Box::new(not_found::NotFoundScreen::new())),
    ]
}
