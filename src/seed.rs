//! Fixture data the sidecar boots with. Nothing here is ever written back.

use crate::model::{Assignment, Role, Submission, SubmissionStatus, User};
use chrono::{DateTime, NaiveDate, Utc};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    // Fixture literals only; every value below is a real calendar date.
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn user(id: &str, name: &str, email: &str, role: Role, avatar: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        avatar: avatar.to_string(),
    }
}

pub fn users() -> Vec<User> {
    vec![
        user(
            "student_001",
            "Alex Johnson",
            "alex.johnson@university.edu",
            Role::Student,
            "AJ",
        ),
        user(
            "student_002",
            "Sarah Chen",
            "sarah.chen@university.edu",
            Role::Student,
            "SC",
        ),
        user(
            "student_003",
            "Michael Rodriguez",
            "michael.rodriguez@university.edu",
            Role::Student,
            "MR",
        ),
        user(
            "prof_001",
            "Dr. Emily Watson",
            "emily.watson@university.edu",
            Role::Admin,
            "EW",
        ),
        user(
            "prof_002",
            "Prof. David Kim",
            "david.kim@university.edu",
            Role::Admin,
            "DK",
        ),
    ]
}

pub fn assignments() -> Vec<Assignment> {
    vec![
        Assignment {
            id: "assign_001".to_string(),
            title: "React Fundamentals Project".to_string(),
            description: "Build a complete React application demonstrating component lifecycle, state management, and hooks.".to_string(),
            due_date: date(2024, 12, 15),
            drive_link: "https://drive.google.com/drive/folders/example1".to_string(),
            max_score: 100,
            created_by: "prof_001".to_string(),
            created_at: date(2024, 11, 1),
        },
        Assignment {
            id: "assign_002".to_string(),
            title: "Database Design Assignment".to_string(),
            description: "Design and implement a normalized database schema for an e-commerce platform.".to_string(),
            due_date: date(2024, 12, 20),
            drive_link: "https://drive.google.com/drive/folders/example2".to_string(),
            max_score: 80,
            created_by: "prof_001".to_string(),
            created_at: date(2024, 11, 2),
        },
        Assignment {
            id: "assign_003".to_string(),
            title: "API Integration Challenge".to_string(),
            description: "Create a web application that integrates with multiple REST APIs and handles error scenarios.".to_string(),
            due_date: date(2024, 12, 25),
            drive_link: "https://drive.google.com/drive/folders/example3".to_string(),
            max_score: 90,
            created_by: "prof_002".to_string(),
            created_at: date(2024, 11, 3),
        },
    ]
}

pub fn submissions() -> Vec<Submission> {
    let submitted_at = DateTime::parse_from_rfc3339("2024-11-10T14:30:00Z")
        .ok()
        .map(|t| t.with_timezone(&Utc));
    vec![
        Submission {
            id: "sub_001".to_string(),
            assignment_id: "assign_001".to_string(),
            student_id: "student_001".to_string(),
            status: SubmissionStatus::Submitted,
            submitted_at,
            is_confirmed: true,
        },
        Submission {
            id: "sub_002".to_string(),
            assignment_id: "assign_001".to_string(),
            student_id: "student_002".to_string(),
            status: SubmissionStatus::Pending,
            submitted_at: None,
            is_confirmed: false,
        },
        Submission {
            id: "sub_003".to_string(),
            assignment_id: "assign_002".to_string(),
            student_id: "student_001".to_string(),
            status: SubmissionStatus::Pending,
            submitted_at: None,
            is_confirmed: false,
        },
    ]
}
