// Wire models for the userdeck backend.
//
// Every JSON response uses the `{statusCode, message, data}` envelope;
// success is determined solely by HTTP status, never by envelope contents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The `{statusCode, message, data}` wrapper every backend response uses.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    #[serde(default)]
    pub status_code: u16,
    #[serde(default)]
    pub message: String,
    pub data: T,
}

/// A user account.
///
/// `id` is absent only for a user not yet persisted; once the backend
/// assigns it, it never changes. `password` is write-only: sent on create,
/// never returned by the backend and never rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub email: String,
    /// Free-form status label assigned by the operator.
    pub status: String,
    // Wire name is snake_case, unlike every other field.
    #[serde(
        rename = "user_permissions",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub user_permissions: Vec<UserPermission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether this user holds an edge to the given permission.
    pub fn has_permission(&self, permission_id: &str) -> bool {
        self.user_permissions
            .iter()
            .any(|edge| edge.permission_id == permission_id)
    }
}

/// Reference-data permission; fetched in bulk, never mutated by the console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub id: String,
    pub code: String,
    pub description: String,
}

/// The join edge linking one [`User`] to one [`Permission`].
///
/// Created by an assign, destroyed by an unassign, never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPermission {
    pub id: String,
    pub user_id: String,
    pub permission_id: String,
    /// Embedded snapshot of the permission this edge points at.
    pub permission: Permission,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn edge(permission_id: &str) -> UserPermission {
        UserPermission {
            id: format!("edge-{permission_id}"),
            user_id: "u1".into(),
            permission_id: permission_id.into(),
            permission: Permission {
                id: permission_id.into(),
                code: "CODE".into(),
                description: "desc".into(),
            },
        }
    }

    #[test]
    fn has_permission_matches_edges() {
        let user = User {
            user_permissions: vec![edge("p1"), edge("p2")],
            ..User::default()
        };
        assert!(user.has_permission("p1"));
        assert!(!user.has_permission("p3"));
    }

    #[test]
    fn user_deserializes_from_wire_names() {
        let user: User = serde_json::from_value(json!({
            "id": "u1",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "username": "ada",
            "email": "ada@example.com",
            "status": "active",
            "user_permissions": [],
            "createdAt": "2024-03-01T09:30:00.000Z",
            "updatedAt": "2024-03-01T09:30:00.000Z"
        }))
        .unwrap();

        assert_eq!(user.first_name, "Ada");
        assert!(user.password.is_none());
        assert!(user.created_at.is_some());
    }

    #[test]
    fn password_serialized_only_when_present() {
        let mut user = User {
            first_name: "Ada".into(),
            ..User::default()
        };
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password").is_none());
        assert!(value.get("id").is_none());

        user.password = Some("hunter2".into());
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["password"], "hunter2");
    }
}
