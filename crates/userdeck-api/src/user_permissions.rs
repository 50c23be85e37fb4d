// User-permission edge endpoints
//
// Assign creates an edge, unassign destroys it; edges are never updated
// in place. Unassign is a DELETE with a body naming which edge to cut.

use serde::Serialize;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::model::UserPermission;

/// Body for `POST /user-permission`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignPermission {
    pub user_id: String,
    pub permission_id: String,
}

/// Body for `DELETE /user-permission/{userId}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UnassignPermission<'a> {
    permission_id: &'a str,
}

impl ApiClient {
    /// Assign a permission to a user, returning the created edge.
    ///
    /// `POST /user-permission` with `{userId, permissionId}`
    pub async fn assign_permission(
        &self,
        edge: &AssignPermission,
    ) -> Result<UserPermission, Error> {
        let url = self.endpoint("user-permission")?;
        debug!(user = %edge.user_id, permission = %edge.permission_id, "assigning permission");
        self.post(url, edge).await
    }

    /// Remove a permission edge from a user. Nothing is returned; removing
    /// an edge that is already absent is not an error at this layer.
    ///
    /// `DELETE /user-permission/{userId}` with `{permissionId}`
    pub async fn unassign_permission(
        &self,
        user_id: &str,
        permission_id: &str,
    ) -> Result<(), Error> {
        let url = self.endpoint(&format!("user-permission/{user_id}"))?;
        debug!(user = %user_id, permission = %permission_id, "unassigning permission");
        self.delete_with_body(url, &UnassignPermission { permission_id })
            .await
    }
}
