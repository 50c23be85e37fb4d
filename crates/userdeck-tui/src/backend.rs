//! Backend task — owns the [`ApiClient`] and turns screen-issued
//! commands into result actions.
//!
//! Every command spawns its own task, so rapid interactions overlap and
//! responses land in completion order: there is no de-duplication, no
//! cancellation, and no generation counter — the last response to resolve
//! wins. Steps *inside* one command are sequential (assign, then re-fetch
//! the user), which keeps each mutation-then-resync flow ordered.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use userdeck_api::{ApiClient, AssignPermission, ListParams, User};

use crate::action::{Action, Notification};

/// A unit of backend I/O requested by a screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FetchUsers(ListParams),
    FetchUser(String),
    FetchPermissions,
    CreateUser(Box<User>),
    UpdateUser {
        id: String,
        payload: Box<User>,
    },
    /// Delete, then re-fetch the page the list was showing so the rows
    /// and total stay consistent with the server.
    DeleteUser {
        id: String,
        refetch: ListParams,
    },
    AssignPermission {
        user_id: String,
        permission_id: String,
    },
    UnassignPermission {
        user_id: String,
        permission_id: String,
    },
}

/// Spawn the dispatcher: one task per received command.
pub fn spawn_backend(
    api: ApiClient,
    mut cmd_rx: mpsc::UnboundedReceiver<Command>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,

                cmd = cmd_rx.recv() => {
                    let Some(cmd) = cmd else { break };
                    let api = api.clone();
                    let tx = action_tx.clone();
                    tokio::spawn(async move {
                        run_command(api, cmd, &tx).await;
                    });
                }
            }
        }
    })
}

/// Execute one command, sending result actions as they materialize.
pub(crate) async fn run_command(api: ApiClient, cmd: Command, tx: &mpsc::UnboundedSender<Action>) {
    match cmd {
        Command::FetchUsers(params) => fetch_users(&api, &params, tx).await,

        Command::FetchUser(id) => fetch_user(&api, &id, tx).await,

        Command::FetchPermissions => match api.list_permissions().await {
            Ok(catalog) => {
                let _ = tx.send(Action::PermissionsLoaded(catalog));
            }
            Err(e) => {
                warn!(error = %e, "permission catalog fetch failed");
                notify_error(tx, "An error occured while fetching permissions");
            }
        },

        Command::CreateUser(payload) => match api.create_user(&payload).await {
            Ok(_) => {
                notify_success(tx, "User succesfully created");
                let _ = tx.send(Action::UserCreated);
            }
            Err(e) => {
                warn!(error = %e, "create failed");
                notify_error(tx, "An error occured while creating user");
                let _ = tx.send(Action::UserCreateFailed);
            }
        },

        Command::UpdateUser { id, payload } => match api.update_user(&id, &payload).await {
            Ok(_) => {
                notify_success(tx, "User succesfully updated");
                let _ = tx.send(Action::UserUpdated);
            }
            Err(e) => {
                warn!(error = %e, user = %id, "update failed");
                notify_error(tx, "An error occured while updating user");
                let _ = tx.send(Action::UserUpdateFailed);
            }
        },

        Command::DeleteUser { id, refetch } => match api.delete_user(&id).await {
            Ok(()) => {
                notify_success(tx, "User deleted!");
                // Resync rows and total from the server; if this emptied
                // the last page, the empty page is what gets rendered.
                fetch_users(&api, &refetch, tx).await;
            }
            Err(e) => {
                warn!(error = %e, user = %id, "delete failed");
                notify_error(tx, "An error occured while deleting user");
                let _ = tx.send(Action::UsersLoadFailed);
            }
        },

        Command::AssignPermission {
            user_id,
            permission_id,
        } => {
            let edge = AssignPermission {
                user_id: user_id.clone(),
                permission_id,
            };
            match api.assign_permission(&edge).await {
                Ok(_) => {
                    notify_success(tx, "Permission sucessfully assigned!");
                    fetch_user(&api, &user_id, tx).await;
                }
                Err(e) => {
                    warn!(error = %e, user = %user_id, "assign failed");
                    notify_error(tx, "An error occured. Please try again.");
                }
            }
        }

        Command::UnassignPermission {
            user_id,
            permission_id,
        } => match api.unassign_permission(&user_id, &permission_id).await {
            Ok(()) => {
                notify_success(tx, "Permission sucessfully unassigned!");
                fetch_user(&api, &user_id, tx).await;
            }
            Err(e) => {
                warn!(error = %e, user = %user_id, "unassign failed");
                notify_error(tx, "An error occured. Please try again.");
            }
        },
    }
}

async fn fetch_users(api: &ApiClient, params: &ListParams, tx: &mpsc::UnboundedSender<Action>) {
    match api.list_users(params).await {
        Ok(page) => {
            let _ = tx.send(Action::UsersLoaded {
                rows: page.users,
                count: page.count,
            });
        }
        Err(e) => {
            warn!(error = %e, "user list fetch failed");
            notify_error(tx, "An error occured while fetching users.");
            let _ = tx.send(Action::UsersLoadFailed);
        }
    }
}

async fn fetch_user(api: &ApiClient, id: &str, tx: &mpsc::UnboundedSender<Action>) {
    match api.get_user(id).await {
        Ok(user) => {
            let _ = tx.send(Action::UserLoaded(Box::new(user)));
        }
        Err(e) if e.is_not_found() => {
            let _ = tx.send(Action::UserLoadFailed { not_found: true });
        }
        Err(e) => {
            warn!(error = %e, user = %id, "user fetch failed");
            notify_error(tx, "An error occured while fetching data.");
            let _ = tx.send(Action::UserLoadFailed { not_found: false });
        }
    }
}

fn notify_success(tx: &mpsc::UnboundedSender<Action>, msg: &str) {
    let _ = tx.send(Action::Notify(Notification::success(msg)));
}

fn notify_error(tx: &mpsc::UnboundedSender<Action>, msg: &str) {
    let _ = tx.send(Action::Notify(Notification::error(msg)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::NotifyLevel;
    use serde_json::json;
    use tokio::sync::mpsc::UnboundedReceiver;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> (MockServer, ApiClient) {
        let server = MockServer::start().await;
        let client = ApiClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
        (server, client)
    }

    fn drain(rx: &mut UnboundedReceiver<Action>) -> Vec<Action> {
        let mut out = Vec::new();
        while let Ok(action) = rx.try_recv() {
            out.push(action);
        }
        out
    }

    fn user_with_edge(id: &str, permission_id: Option<&str>) -> serde_json::Value {
        let edges = permission_id.map_or_else(Vec::new, |pid| {
            vec![json!({
                "id": format!("e-{pid}"),
                "userId": id,
                "permissionId": pid,
                "permission": { "id": pid, "code": "USERS_READ", "description": "Read users" },
            })]
        });
        json!({
            "id": id,
            "firstName": "Ada",
            "lastName": "Lovelace",
            "username": "ada",
            "email": "ada@example.com",
            "status": "active",
            "user_permissions": edges,
        })
    }

    fn envelope(data: serde_json::Value) -> serde_json::Value {
        json!({ "statusCode": 200, "message": "ok", "data": data })
    }

    #[tokio::test]
    async fn toggle_on_assigns_then_refetches_the_user() {
        let (server, api) = setup().await;
        let (tx, mut rx) = mpsc::unbounded_channel();

        Mock::given(method("POST"))
            .and(path("/user-permission"))
            .and(body_json(json!({ "userId": "u1", "permissionId": "p1" })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(envelope(json!({
                    "id": "e-p1",
                    "userId": "u1",
                    "permissionId": "p1",
                    "permission": { "id": "p1", "code": "USERS_READ", "description": "Read users" },
                }))),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/users/u1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(envelope(user_with_edge("u1", Some("p1")))),
            )
            .expect(1)
            .mount(&server)
            .await;

        run_command(
            api,
            Command::AssignPermission {
                user_id: "u1".into(),
                permission_id: "p1".into(),
            },
            &tx,
        )
        .await;

        let actions = drain(&mut rx);
        assert_eq!(actions.len(), 2);
        assert_eq!(
            actions[0],
            Action::Notify(Notification::success("Permission sucessfully assigned!"))
        );
        // The refreshed server truth carries the new edge.
        match &actions[1] {
            Action::UserLoaded(user) => assert!(user.has_permission("p1")),
            other => panic!("expected UserLoaded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unassign_of_absent_edge_still_resyncs() {
        let (server, api) = setup().await;
        let (tx, mut rx) = mpsc::unbounded_channel();

        Mock::given(method("DELETE"))
            .and(path("/user-permission/u1"))
            .and(body_json(json!({ "permissionId": "p1" })))
            .respond_with(ResponseTemplate::new(204))
            .expect(2)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/users/u1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(envelope(user_with_edge("u1", None))),
            )
            .expect(2)
            .mount(&server)
            .await;

        for _ in 0..2 {
            run_command(
                api.clone(),
                Command::UnassignPermission {
                    user_id: "u1".into(),
                    permission_id: "p1".into(),
                },
                &tx,
            )
            .await;
        }

        let actions = drain(&mut rx);
        assert_eq!(actions.len(), 4);
        // Both rounds end with the user re-fetched and the edge absent.
        for chunk in actions.chunks(2) {
            match &chunk[1] {
                Action::UserLoaded(user) => assert!(!user.has_permission("p1")),
                other => panic!("expected UserLoaded, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn delete_refetches_the_current_page_even_when_empty() {
        let (server, api) = setup().await;
        let (tx, mut rx) = mpsc::unbounded_channel();

        Mock::given(method("DELETE"))
            .and(path("/users/u9"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        // Page 2 (wire page=1) is now empty — that is what gets rendered.
        Mock::given(method("GET"))
            .and(path("/users"))
            .and(query_param("page", "1"))
            .and(query_param("limit", "10"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(envelope(json!({ "rows": [], "count": 10 }))),
            )
            .expect(1)
            .mount(&server)
            .await;

        let refetch = ListParams {
            page: 1,
            ..ListParams::default()
        };
        run_command(
            api,
            Command::DeleteUser {
                id: "u9".into(),
                refetch,
            },
            &tx,
        )
        .await;

        let actions = drain(&mut rx);
        assert_eq!(
            actions[0],
            Action::Notify(Notification::success("User deleted!"))
        );
        assert_eq!(
            actions[1],
            Action::UsersLoaded {
                rows: vec![],
                count: 10
            }
        );
    }

    #[tokio::test]
    async fn unknown_user_is_not_found_without_a_notification() {
        let (server, api) = setup().await;
        let (tx, mut rx) = mpsc::unbounded_channel();

        Mock::given(method("GET"))
            .and(path("/users/unknown-id"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "statusCode": 404,
                "message": "User not found",
            })))
            .mount(&server)
            .await;

        run_command(api, Command::FetchUser("unknown-id".into()), &tx).await;

        let actions = drain(&mut rx);
        assert_eq!(actions, vec![Action::UserLoadFailed { not_found: true }]);
    }

    #[tokio::test]
    async fn list_failure_notifies_and_clears_loading_only() {
        let (server, api) = setup().await;
        let (tx, mut rx) = mpsc::unbounded_channel();

        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "statusCode": 500,
                "message": "boom",
            })))
            .mount(&server)
            .await;

        run_command(api, Command::FetchUsers(ListParams::default()), &tx).await;

        let actions = drain(&mut rx);
        assert_eq!(actions.len(), 2);
        match &actions[0] {
            Action::Notify(n) => {
                assert_eq!(n.level, NotifyLevel::Error);
                assert_eq!(n.message, "An error occured while fetching users.");
            }
            other => panic!("expected Notify, got {other:?}"),
        }
        assert_eq!(actions[1], Action::UsersLoadFailed);
    }
}
