use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{param_str, required_str};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

/// `params.studentId` when given, otherwise the active user.
fn student_id_param(state: &AppState, req: &Request) -> String {
    param_str(req, "studentId")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| state.store.current_user().id.clone())
}

fn handle_submissions_submit(state: &mut AppState, req: &Request) -> serde_json::Value {
    let assignment_id = match required_str(req, "assignmentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let student_id = student_id_param(state, req);

    if state.store.assignment(&assignment_id).is_none() {
        return err(&req.id, "not_found", "assignment not found", None);
    }
    match state.store.user(&student_id) {
        None => return err(&req.id, "not_found", "student not found", None),
        Some(u) if !u.is_student() => {
            return err(
                &req.id,
                "forbidden",
                "only students can submit assignments",
                Some(json!({ "userId": student_id })),
            )
        }
        Some(_) => {}
    }

    match state.store.submit_assignment(&assignment_id, &student_id) {
        Some(submission) => {
            tracing::info!(
                submission_id = %submission.id,
                assignment_id = %assignment_id,
                student_id = %student_id,
                "assignment submitted"
            );
            ok(&req.id, json!({ "submission": submission }))
        }
        None => err(
            &req.id,
            "internal",
            "submission missing after submit",
            None,
        ),
    }
}

fn handle_submissions_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let assignment_id = match required_str(req, "assignmentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let student_id = student_id_param(state, req);

    // Absence is a normal answer: the student has not touched the assignment.
    let submission = state.store.submission(&assignment_id, &student_id);
    ok(&req.id, json!({ "submission": submission }))
}

fn handle_submissions_list_for_assignment(
    state: &mut AppState,
    req: &Request,
) -> serde_json::Value {
    let assignment_id = match required_str(req, "assignmentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let submissions = state.store.submissions_for_assignment(&assignment_id);
    ok(&req.id, json!({ "submissions": submissions }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "submissions.submit" => Some(handle_submissions_submit(state, req)),
        "submissions.get" => Some(handle_submissions_get(state, req)),
        "submissions.listForAssignment" => {
            Some(handle_submissions_list_for_assignment(state, req))
        }
        _ => None,
    }
}
