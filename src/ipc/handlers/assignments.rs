use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{local_today, param_str, required_str};
use crate::ipc::types::{AppState, Request};
use crate::model::Assignment;
use crate::validate::{validate_draft, validate_edit, AssignmentDraft};
use serde_json::json;

/// Only admins may author or edit assignments.
fn require_admin(state: &AppState, req: &Request) -> Option<serde_json::Value> {
    let current = state.store.current_user();
    if current.is_admin() {
        return None;
    }
    Some(err(
        &req.id,
        "forbidden",
        "only professors can manage assignments",
        Some(json!({ "userId": current.id })),
    ))
}

fn handle_assignments_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let user = match param_str(req, "userId") {
        Some(id) => match state.store.user(id) {
            Some(u) => u,
            None => return err(&req.id, "not_found", "user not found", None),
        },
        None => state.store.current_user(),
    };

    let assignments = state.store.assignments_for_user(user);
    ok(&req.id, json!({ "assignments": assignments }))
}

fn handle_assignments_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let assignment_id = match required_str(req, "assignmentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.store.assignment(&assignment_id) {
        Some(a) => ok(&req.id, json!({ "assignment": a })),
        None => err(&req.id, "not_found", "assignment not found", None),
    }
}

fn handle_assignments_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    if let Some(resp) = require_admin(state, req) {
        return resp;
    }

    let draft: AssignmentDraft = match serde_json::from_value(req.params.clone()) {
        Ok(d) => d,
        Err(e) => return err(&req.id, "bad_params", e.to_string(), None),
    };

    let author = state.store.current_user().clone();
    let assignment = match validate_draft(&draft, &author, local_today()) {
        Ok(a) => a,
        Err(e) => {
            return err(
                &req.id,
                "validation_failed",
                e.to_string(),
                Some(json!({ "fields": e.fields })),
            )
        }
    };

    tracing::info!(
        assignment_id = %assignment.id,
        created_by = %assignment.created_by,
        "assignment created"
    );
    state.store.add_assignment(assignment.clone());
    ok(&req.id, json!({ "assignment": assignment }))
}

/// The stored assignment, provided the active admin authored it.
fn owned_assignment(
    state: &AppState,
    req: &Request,
    assignment_id: &str,
) -> Result<Assignment, serde_json::Value> {
    let Some(stored) = state.store.assignment(assignment_id) else {
        return Err(err(&req.id, "not_found", "assignment not found", None));
    };
    let current = state.store.current_user();
    if stored.created_by != current.id {
        return Err(err(
            &req.id,
            "forbidden",
            "assignments can only be changed by their author",
            Some(json!({ "userId": current.id, "createdBy": stored.created_by })),
        ));
    }
    Ok(stored.clone())
}

fn handle_assignments_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    if let Some(resp) = require_admin(state, req) {
        return resp;
    }

    let Some(raw) = req.params.get("assignment") else {
        return err(&req.id, "bad_params", "missing params.assignment", None);
    };
    let Some(assignment_id) = raw.get("id").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing params.assignment.id", None);
    };
    let draft: AssignmentDraft = match serde_json::from_value(raw.clone()) {
        Ok(d) => d,
        Err(e) => return err(&req.id, "bad_params", e.to_string(), None),
    };

    let stored = match owned_assignment(state, req, assignment_id) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let assignment = match validate_edit(&draft, &stored, local_today()) {
        Ok(a) => a,
        Err(e) => {
            return err(
                &req.id,
                "validation_failed",
                e.to_string(),
                Some(json!({ "fields": e.fields })),
            )
        }
    };

    tracing::info!(assignment_id = %assignment.id, "assignment updated");
    state.store.update_assignment(assignment.clone());
    ok(&req.id, json!({ "updated": true, "assignment": assignment }))
}

fn handle_assignments_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    if let Some(resp) = require_admin(state, req) {
        return resp;
    }

    let assignment_id = match required_str(req, "assignmentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    if state.store.assignment(&assignment_id).is_none() {
        return ok(&req.id, json!({ "deleted": false }));
    }
    if let Err(resp) = owned_assignment(state, req, &assignment_id) {
        return resp;
    }

    tracing::info!(assignment_id = %assignment_id, "assignment deleted");
    state.store.delete_assignment(&assignment_id);
    ok(&req.id, json!({ "deleted": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "assignments.list" => Some(handle_assignments_list(state, req)),
        "assignments.get" => Some(handle_assignments_get(state, req)),
        "assignments.create" => Some(handle_assignments_create(state, req)),
        "assignments.update" => Some(handle_assignments_update(state, req)),
        "assignments.delete" => Some(handle_assignments_delete(state, req)),
        _ => None,
    }
}
