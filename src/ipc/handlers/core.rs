use crate::db;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::required_str;
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use std::path::{Path, PathBuf};

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string())
        }),
    )
}

/// Opens the workspace settings database and re-applies the saved active
/// user. A saved id that no longer resolves, or an unreadable saved value,
/// is logged and skipped so the workspace still opens.
pub fn open_workspace(state: &mut AppState, path: &Path) -> anyhow::Result<()> {
    let conn = db::open_db(path)?;

    match db::load_current_user_id(&conn) {
        Ok(Some(user_id)) => {
            if state.store.user(&user_id).is_some() {
                state.store.switch_user(&user_id);
                tracing::info!(user_id = %user_id, "restored active user");
            } else {
                tracing::warn!(user_id = %user_id, "saved user not found; keeping default");
            }
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "failed to read saved user; keeping default"),
    }

    state.workspace = Some(path.to_path_buf());
    state.db = Some(conn);
    tracing::info!(workspace = %path.to_string_lossy(), "workspace opened");
    Ok(())
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let path = match required_str(req, "path") {
        Ok(p) => PathBuf::from(p),
        Err(resp) => return resp,
    };

    match open_workspace(state, &path) {
        Ok(()) => ok(
            &req.id,
            json!({
                "workspacePath": path.to_string_lossy(),
                "currentUser": state.store.current_user(),
            }),
        ),
        Err(e) => err(&req.id, "db_open_failed", format!("{e:?}"), None),
    }
}

fn handle_session_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, json!({ "currentUser": state.store.current_user() }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        "session.get" => Some(handle_session_get(state, req)),
        _ => None,
    }
}
