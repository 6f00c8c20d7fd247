use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_classboardd");
    let mut child = Command::new(exe)
        .env_remove("CLASSBOARD_WORKSPACE")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn classboardd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn send(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = send(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|v| v.as_str())
            .unwrap_or("unknown error")
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn request_err(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = send(stdin, reader, id, method, params);
    assert_eq!(
        value.get("ok").and_then(|v| v.as_bool()),
        Some(false),
        "{} unexpectedly succeeded",
        method
    );
    value.get("error").cloned().unwrap_or_else(|| json!({}))
}

#[test]
fn submit_creates_then_refreshes_one_record() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "users.switch",
        json!({ "userId": "student_002" }),
    );

    let before = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "submissions.get",
        json!({ "assignmentId": "assign_002", "studentId": "student_002" }),
    );
    assert_eq!(before["submission"], json!(null));

    let first = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "submissions.submit",
        json!({ "assignmentId": "assign_002" }),
    );
    let sub = &first["submission"];
    assert_eq!(sub["status"], json!("submitted"));
    assert_eq!(sub["isConfirmed"], json!(true));
    assert_eq!(sub["studentId"], json!("student_002"));
    assert!(sub["submittedAt"].is_string());
    let sub_id = sub["id"].as_str().expect("submission id").to_string();

    let second = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "submissions.submit",
        json!({ "assignmentId": "assign_002", "studentId": "student_002" }),
    );
    assert_eq!(second["submission"]["id"], json!(sub_id));
    assert_eq!(second["submission"]["status"], json!("submitted"));

    let listed = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "submissions.listForAssignment",
        json!({ "assignmentId": "assign_002" }),
    );
    let rows = listed["submissions"].as_array().expect("submissions");
    let for_pair = rows
        .iter()
        .filter(|s| s["studentId"] == json!("student_002"))
        .count();
    assert_eq!(for_pair, 1);
    assert_eq!(rows.len(), 2);
}

#[test]
fn seeded_assignment_has_one_of_two_submitted() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let listed = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "submissions.listForAssignment",
        json!({ "assignmentId": "assign_001" }),
    );
    let rows = listed["submissions"].as_array().expect("submissions");
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows.iter()
            .filter(|s| s["status"] == json!("submitted"))
            .count(),
        1
    );

    let stats = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "stats.assignment",
        json!({ "assignmentId": "assign_001" }),
    );
    assert_eq!(
        stats["completion"],
        json!({ "submitted": 1, "total": 3, "percentage": 33 })
    );
}

#[test]
fn pending_record_is_upgraded_in_place() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "submissions.submit",
        json!({ "assignmentId": "assign_002", "studentId": "student_001" }),
    );
    assert_eq!(result["submission"]["id"], json!("sub_003"));
    assert_eq!(result["submission"]["status"], json!("submitted"));
}

#[test]
fn submit_rejects_unknown_targets_and_admins() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let e = request_err(
        &mut stdin,
        &mut reader,
        "1",
        "submissions.submit",
        json!({ "assignmentId": "assign_404" }),
    );
    assert_eq!(e["code"], json!("not_found"));

    let e = request_err(
        &mut stdin,
        &mut reader,
        "2",
        "submissions.submit",
        json!({ "assignmentId": "assign_001", "studentId": "student_404" }),
    );
    assert_eq!(e["code"], json!("not_found"));

    let e = request_err(
        &mut stdin,
        &mut reader,
        "3",
        "submissions.submit",
        json!({ "assignmentId": "assign_001", "studentId": "prof_001" }),
    );
    assert_eq!(e["code"], json!("forbidden"));

    let e = request_err(&mut stdin, &mut reader, "4", "submissions.submit", json!({}));
    assert_eq!(e["code"], json!("bad_params"));
}

#[test]
fn student_dashboard_reflects_submission_and_due_status() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let dash = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "dashboard.student",
        json!({ "today": "2024-12-13" }),
    );
    assert_eq!(
        dash["progress"],
        json!({ "totalAssignments": 3, "submittedCount": 1, "percentage": 33 })
    );
    let rows = dash["assignments"].as_array().expect("assignments");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["due"], json!({ "status": "submitted" }));
    assert_eq!(rows[1]["due"], json!({ "status": "pending", "daysLeft": 7 }));
    assert_eq!(rows[2]["submission"], json!(null));

    let dash = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "dashboard.student",
        json!({ "today": "2024-12-22" }),
    );
    let rows = dash["assignments"].as_array().expect("assignments");
    assert_eq!(rows[1]["due"], json!({ "status": "overdue" }));
    assert_eq!(rows[2]["due"], json!({ "status": "urgent", "daysLeft": 3 }));

    let e = request_err(
        &mut stdin,
        &mut reader,
        "3",
        "dashboard.student",
        json!({ "today": "13/12/2024" }),
    );
    assert_eq!(e["code"], json!("bad_params"));
}
