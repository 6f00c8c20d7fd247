use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{required_str, today_param};
use crate::ipc::types::{AppState, Request};
use crate::stats;
use serde_json::json;

fn handle_stats_assignment(state: &mut AppState, req: &Request) -> serde_json::Value {
    let assignment_id = match required_str(req, "assignmentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if state.store.assignment(&assignment_id).is_none() {
        return err(&req.id, "not_found", "assignment not found", None);
    }
    let completion = stats::assignment_completion(&state.store, &assignment_id);
    ok(&req.id, json!({ "completion": completion }))
}

fn handle_dashboard_admin(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = &state.store;
    let admin = store.current_user();
    if !admin.is_admin() {
        return err(
            &req.id,
            "forbidden",
            "the professor dashboard needs an admin user",
            Some(json!({ "userId": admin.id })),
        );
    }

    let assignments: Vec<_> = store
        .assignments_for_user(admin)
        .into_iter()
        .map(|a| {
            json!({
                "assignment": a,
                "completion": stats::assignment_completion(store, &a.id),
                "submissions": store.submissions_for_assignment(&a.id),
            })
        })
        .collect();

    ok(
        &req.id,
        json!({
            "currentUser": admin,
            "studentCount": store.students().count(),
            "overview": stats::admin_overview(store, admin),
            "assignments": assignments,
        }),
    )
}

fn handle_dashboard_student(state: &mut AppState, req: &Request) -> serde_json::Value {
    let today = match today_param(req) {
        Ok(d) => d,
        Err(resp) => return resp,
    };
    let store = &state.store;
    let student = store.current_user();
    if !student.is_student() {
        return err(
            &req.id,
            "forbidden",
            "the student dashboard needs a student user",
            Some(json!({ "userId": student.id })),
        );
    }

    let assignments: Vec<_> = store
        .assignments_for_user(student)
        .into_iter()
        .map(|a| {
            let submission = store.submission(&a.id, &student.id);
            json!({
                "assignment": a,
                "submission": submission,
                "due": stats::due_status(submission, a.due_date, today),
            })
        })
        .collect();

    ok(
        &req.id,
        json!({
            "currentUser": student,
            "today": today,
            "progress": stats::student_progress(store, student),
            "assignments": assignments,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "stats.assignment" => Some(handle_stats_assignment(state, req)),
        "dashboard.admin" => Some(handle_dashboard_admin(state, req)),
        "dashboard.student" => Some(handle_dashboard_student(state, req)),
        _ => None,
    }
}
