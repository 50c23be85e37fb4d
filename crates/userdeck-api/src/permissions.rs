// Permission catalog endpoint
//
// Reference data: the full set is fetched eagerly, unpaginated, and is
// never mutated by the console.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::model::Permission;

impl ApiClient {
    /// Fetch the full permission catalog.
    ///
    /// `GET /permissions`
    pub async fn list_permissions(&self) -> Result<Vec<Permission>, Error> {
        let url = self.endpoint("permissions")?;
        debug!("listing permissions");
        self.get(url).await
    }
}
