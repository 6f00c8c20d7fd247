use crate::db;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{param_str, required_str};
use crate::ipc::types::{AppState, Request};
use crate::model::Role;
use serde_json::json;

fn handle_users_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let role = match param_str(req, "role").map(str::parse::<Role>) {
        None => None,
        Some(Ok(r)) => Some(r),
        Some(Err(e)) => return err(&req.id, "bad_params", e, None),
    };

    let users: Vec<_> = state
        .store
        .users()
        .iter()
        .filter(|u| role.map(|r| u.role == r).unwrap_or(true))
        .collect();
    ok(&req.id, json!({ "users": users }))
}

fn handle_users_switch(state: &mut AppState, req: &Request) -> serde_json::Value {
    let user_id = match required_str(req, "userId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let switched = state.store.switch_user(&user_id);
    let current = state.store.current_user();

    // Persistence is best-effort; the switch already happened in memory.
    let mut persisted = false;
    if switched {
        tracing::info!(
            user_id = %current.id,
            role = current.role.as_str(),
            "active user switched"
        );
        if let Some(conn) = state.db.as_ref() {
            match db::save_current_user_id(conn, &current.id) {
                Ok(()) => persisted = true,
                Err(e) => tracing::warn!(error = %e, "failed to save active user"),
            }
        }
    } else if state.store.user(&user_id).is_none() {
        tracing::debug!(user_id = %user_id, "switch to unknown user ignored");
    }

    ok(
        &req.id,
        json!({
            "switched": switched,
            "persisted": persisted,
            "currentUser": current,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "users.list" => Some(handle_users_list(state, req)),
        "users.switch" => Some(handle_users_switch(state, req)),
        _ => None,
    }
}
