// User endpoints
//
// CRUD over `/users`, with server-side pagination and sorting on the
// list endpoint. List responses arrive as `{data: {rows, count}}`;
// single-entity responses as `{data: User}`.

use serde::Deserialize;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::model::User;
use crate::params::ListParams;

/// One page of the user list plus the server-reported total row count.
#[derive(Debug, Clone, PartialEq)]
pub struct UserPage {
    pub users: Vec<User>,
    pub count: u64,
}

/// List payload inside the envelope.
#[derive(Debug, Deserialize)]
struct UserListData {
    rows: Vec<User>,
    count: u64,
}

impl ApiClient {
    /// Fetch one page of users, sorted server-side.
    ///
    /// `GET /users?limit=&page=&sortKey=&sortOrder=`
    ///
    /// The returned rows preserve the server's ordering.
    pub async fn list_users(&self, params: &ListParams) -> Result<UserPage, Error> {
        let url = self.endpoint("users")?;
        debug!(?params, "listing users");
        let data: UserListData = self.get_with_query(url, params).await?;
        Ok(UserPage {
            users: data.rows,
            count: data.count,
        })
    }

    /// Fetch a single user by id.
    ///
    /// `GET /users/{id}`
    pub async fn get_user(&self, id: &str) -> Result<User, Error> {
        let url = self.endpoint(&format!("users/{id}"))?;
        debug!(id, "fetching user");
        self.get(url).await
    }

    /// Create a user. The payload carries the full editable field set,
    /// password included; the backend assigns `id` and timestamps.
    ///
    /// `POST /users`
    pub async fn create_user(&self, payload: &User) -> Result<User, Error> {
        let url = self.endpoint("users")?;
        debug!(username = %payload.username, "creating user");
        self.post(url, payload).await
    }

    /// Update a user by sending the whole object back.
    ///
    /// `PUT /users/{id}`
    pub async fn update_user(&self, id: &str, payload: &User) -> Result<User, Error> {
        let url = self.endpoint(&format!("users/{id}"))?;
        debug!(id, "updating user");
        self.put(url, payload).await
    }

    /// Delete a user. No body is sent and none is expected back.
    ///
    /// `DELETE /users/{id}`
    pub async fn delete_user(&self, id: &str) -> Result<(), Error> {
        let url = self.endpoint(&format!("users/{id}"))?;
        debug!(id, "deleting user");
        self.delete(url).await
    }
}
