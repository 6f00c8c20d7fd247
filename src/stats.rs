use crate::model::{Submission, User};
use crate::store::Store;
use chrono::NaiveDate;
use serde::Serialize;

/// Assignments due within this many days are flagged as urgent.
pub const URGENT_WITHIN_DAYS: i64 = 3;

/// Rounded whole percentage, half away from zero. Zero when `denom` is zero.
pub fn percentage(numer: usize, denom: usize) -> u32 {
    if denom == 0 {
        return 0;
    }
    ((numer as f64) * 100.0 / (denom as f64)).round() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    pub submitted: usize,
    pub total: usize,
    pub percentage: u32,
}

/// `total` is the number of students, whether or not they have a record for
/// the assignment yet.
pub fn assignment_completion(store: &Store, assignment_id: &str) -> Completion {
    let submitted = store
        .submissions_for_assignment(assignment_id)
        .iter()
        .filter(|s| s.is_submitted())
        .count();
    let total = store.students().count();
    Completion {
        submitted,
        total,
        percentage: percentage(submitted, total),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_assignments: usize,
    pub total_submissions: usize,
    pub total_possible_submissions: usize,
    pub overall_percentage: u32,
}

pub fn admin_overview(store: &Store, admin: &User) -> Overview {
    let mine = store.assignments_for_user(admin);
    let students = store.students().count();
    let total_assignments = mine.len();
    let total_possible_submissions = total_assignments * students;
    let total_submissions = mine
        .iter()
        .map(|a| assignment_completion(store, &a.id).submitted)
        .sum();
    Overview {
        total_assignments,
        total_submissions,
        total_possible_submissions,
        overall_percentage: percentage(total_submissions, total_possible_submissions),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub total_assignments: usize,
    pub submitted_count: usize,
    pub percentage: u32,
}

pub fn student_progress(store: &Store, student: &User) -> Progress {
    let visible = store.assignments_for_user(student);
    let submitted_count = visible
        .iter()
        .filter(|a| {
            store
                .submission(&a.id, &student.id)
                .map(Submission::is_submitted)
                .unwrap_or(false)
        })
        .count();
    Progress {
        total_assignments: visible.len(),
        submitted_count,
        percentage: percentage(submitted_count, visible.len()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum DueStatus {
    Submitted,
    Overdue,
    #[serde(rename_all = "camelCase")]
    Urgent { days_left: i64 },
    #[serde(rename_all = "camelCase")]
    Pending { days_left: i64 },
}

pub fn days_until_due(due_date: NaiveDate, today: NaiveDate) -> i64 {
    (due_date - today).num_days()
}

/// A submitted record wins over any deadline arithmetic.
pub fn due_status(
    submission: Option<&Submission>,
    due_date: NaiveDate,
    today: NaiveDate,
) -> DueStatus {
    if submission.map(Submission::is_submitted).unwrap_or(false) {
        return DueStatus::Submitted;
    }
    let days_left = days_until_due(due_date, today);
    if days_left < 0 {
        DueStatus::Overdue
    } else if days_left <= URGENT_WITHIN_DAYS {
        DueStatus::Urgent { days_left }
    } else {
        DueStatus::Pending { days_left }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).expect("date")
    }

    #[test]
    fn percentage_rounds_and_handles_zero_denominator() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 2), 50);
        assert_eq!(percentage(3, 3), 100);
    }

    #[test]
    fn seeded_completion_counts_all_students() {
        let store = Store::seeded().expect("seed");
        let c = assignment_completion(&store, "assign_001");
        assert_eq!(
            c,
            Completion {
                submitted: 1,
                total: 3,
                percentage: 33
            }
        );
        let none = assignment_completion(&store, "assign_003");
        assert_eq!(none.submitted, 0);
        assert_eq!(none.percentage, 0);
    }

    #[test]
    fn admin_overview_covers_own_assignments() {
        let mut store = Store::seeded().expect("seed");
        store.submit_assignment("assign_002", "student_003");
        store.submit_assignment("assign_003", "student_003");
        let prof = store.user("prof_001").cloned().expect("prof_001");
        let o = admin_overview(&store, &prof);
        assert_eq!(o.total_assignments, 2);
        assert_eq!(o.total_possible_submissions, 6);
        assert_eq!(o.total_submissions, 2);
        assert_eq!(o.overall_percentage, 33);
    }

    #[test]
    fn student_progress_counts_only_submitted() {
        let store = Store::seeded().expect("seed");
        let alex = store.user("student_001").cloned().expect("student_001");
        let p = student_progress(&store, &alex);
        assert_eq!(p.total_assignments, 3);
        assert_eq!(p.submitted_count, 1);
        assert_eq!(p.percentage, 33);
    }

    #[test]
    fn due_status_boundaries() {
        let today = d(2024, 12, 10);
        assert_eq!(due_status(None, d(2024, 12, 9), today), DueStatus::Overdue);
        assert_eq!(
            due_status(None, d(2024, 12, 10), today),
            DueStatus::Urgent { days_left: 0 }
        );
        assert_eq!(
            due_status(None, d(2024, 12, 13), today),
            DueStatus::Urgent { days_left: 3 }
        );
        assert_eq!(
            due_status(None, d(2024, 12, 14), today),
            DueStatus::Pending { days_left: 4 }
        );
    }

    #[test]
    fn submitted_wins_even_when_overdue() {
        let store = Store::seeded().expect("seed");
        let sub = store.submission("assign_001", "student_001");
        assert_eq!(
            due_status(sub, d(2024, 1, 1), d(2025, 1, 1)),
            DueStatus::Submitted
        );
        let pending = store.submission("assign_001", "student_002");
        assert_eq!(
            due_status(pending, d(2024, 1, 1), d(2025, 1, 1)),
            DueStatus::Overdue
        );
    }

    #[test]
    fn due_status_serializes_with_tag() {
        let v = serde_json::to_value(DueStatus::Urgent { days_left: 2 }).expect("json");
        assert_eq!(v, serde_json::json!({ "status": "urgent", "daysLeft": 2 }));
    }
}
