// userdeck-api: Async Rust client for the userdeck user/permission backend

pub mod client;
pub mod error;
pub mod model;
pub mod params;
pub mod transport;

mod permissions;
mod user_permissions;
mod users;

pub use client::ApiClient;
pub use error::{Error, ErrorKind};
pub use model::{Envelope, Permission, User, UserPermission};
pub use params::{ListParams, SortKey, SortOrder};
pub use user_permissions::AssignPermission;
pub use users::UserPage;
