//! In-memory classroom state.
//!
//! Every mutation goes through [`reduce`], a pure function from the current
//! [`State`] and a [`Command`] to the next snapshot. [`Store`] owns the live
//! snapshot, stamps the non-deterministic parts of a command (clock, fresh
//! ids) before dispatch, and answers the read queries the dashboards need.

use crate::model::{Assignment, Submission, SubmissionStatus, User};
use crate::seed;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

type PairKey = (String, String);

fn pair_key(assignment_id: &str, student_id: &str) -> PairKey {
    (assignment_id.to_string(), student_id.to_string())
}

#[derive(Debug, Clone)]
pub struct State {
    users: Vec<User>,
    assignments: Vec<Assignment>,
    submissions: Vec<Submission>,
    // (assignment_id, student_id) -> position in `submissions`.
    submission_index: HashMap<PairKey, usize>,
    current_user_id: String,
}

impl State {
    /// The first user becomes the active one. Returns `None` when `users` is
    /// empty since there would be nobody to act as.
    pub fn new(
        users: Vec<User>,
        assignments: Vec<Assignment>,
        submissions: Vec<Submission>,
    ) -> Option<Self> {
        let current_user_id = users.first()?.id.clone();
        let mut submission_index = HashMap::with_capacity(submissions.len());
        for (pos, s) in submissions.iter().enumerate() {
            submission_index
                .entry(pair_key(&s.assignment_id, &s.student_id))
                .or_insert(pos);
        }
        Some(Self {
            users,
            assignments,
            submissions,
            submission_index,
            current_user_id,
        })
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn current_user(&self) -> &User {
        // current_user_id is only ever set to the id of a member of `users`.
        self.users
            .iter()
            .find(|u| u.id == self.current_user_id)
            .unwrap_or(&self.users[0])
    }

    fn submission_position(&self, assignment_id: &str, student_id: &str) -> Option<usize> {
        self.submission_index
            .get(&pair_key(assignment_id, student_id))
            .copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetCurrentUser {
        user_id: String,
    },
    AddAssignment(Assignment),
    UpdateAssignment(Assignment),
    DeleteAssignment {
        id: String,
    },
    SubmitAssignment {
        assignment_id: String,
        student_id: String,
        submitted_at: DateTime<Utc>,
        /// Used only when no record exists yet for the pair.
        new_id: String,
    },
}

pub fn reduce(state: &State, command: &Command) -> State {
    let mut next = state.clone();
    match command {
        Command::SetCurrentUser { user_id } => {
            if next.users.iter().any(|u| &u.id == user_id) {
                next.current_user_id = user_id.clone();
            }
        }
        Command::AddAssignment(assignment) => {
            next.assignments.push(assignment.clone());
        }
        Command::UpdateAssignment(assignment) => {
            for a in next.assignments.iter_mut() {
                if a.id == assignment.id {
                    *a = assignment.clone();
                }
            }
        }
        Command::DeleteAssignment { id } => {
            next.assignments.retain(|a| &a.id != id);
        }
        Command::SubmitAssignment {
            assignment_id,
            student_id,
            submitted_at,
            new_id,
        } => match next.submission_position(assignment_id, student_id) {
            Some(pos) => {
                let s = &mut next.submissions[pos];
                s.status = SubmissionStatus::Submitted;
                s.submitted_at = Some(*submitted_at);
                s.is_confirmed = true;
            }
            None => {
                next.submission_index.insert(
                    pair_key(assignment_id, student_id),
                    next.submissions.len(),
                );
                next.submissions.push(Submission {
                    id: new_id.clone(),
                    assignment_id: assignment_id.clone(),
                    student_id: student_id.clone(),
                    status: SubmissionStatus::Submitted,
                    submitted_at: Some(*submitted_at),
                    is_confirmed: true,
                });
            }
        },
    }
    next
}

pub fn new_assignment_id() -> String {
    format!("assign_{}", Uuid::new_v4().simple())
}

pub fn new_submission_id() -> String {
    format!("sub_{}", Uuid::new_v4().simple())
}

pub struct Store {
    state: State,
}

impl Store {
    pub fn new(state: State) -> Self {
        Self { state }
    }

    pub fn seeded() -> anyhow::Result<Self> {
        let state = State::new(seed::users(), seed::assignments(), seed::submissions())
            .ok_or_else(|| anyhow::anyhow!("seed data has no users"))?;
        Ok(Self::new(state))
    }

    pub fn dispatch(&mut self, command: Command) {
        tracing::debug!(?command, "dispatch");
        self.state = reduce(&self.state, &command);
    }

    pub fn current_user(&self) -> &User {
        self.state.current_user()
    }

    pub fn users(&self) -> &[User] {
        self.state.users()
    }

    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.state.users.iter().find(|u| u.id == user_id)
    }

    pub fn students(&self) -> impl Iterator<Item = &User> {
        self.state.users.iter().filter(|u| u.is_student())
    }

    pub fn assignments(&self) -> &[Assignment] {
        self.state.assignments()
    }

    pub fn assignment(&self, assignment_id: &str) -> Option<&Assignment> {
        self.state.assignments.iter().find(|a| a.id == assignment_id)
    }

    pub fn submissions(&self) -> &[Submission] {
        self.state.submissions()
    }

    /// Callers resolve the user first; see [`Store::switch_user`].
    pub fn set_current_user(&mut self, user: &User) {
        self.dispatch(Command::SetCurrentUser {
            user_id: user.id.clone(),
        });
    }

    /// Returns whether the active user changed. Unknown ids are a no-op.
    pub fn switch_user(&mut self, user_id: &str) -> bool {
        let Some(user) = self.user(user_id).cloned() else {
            return false;
        };
        if user.id == self.state.current_user_id {
            return false;
        }
        self.set_current_user(&user);
        true
    }

    /// Appends as-is. Id uniqueness and `created_by` pointing at an admin are
    /// the caller's job.
    pub fn add_assignment(&mut self, assignment: Assignment) {
        self.dispatch(Command::AddAssignment(assignment));
    }

    pub fn update_assignment(&mut self, assignment: Assignment) {
        self.dispatch(Command::UpdateAssignment(assignment));
    }

    pub fn delete_assignment(&mut self, assignment_id: &str) {
        self.dispatch(Command::DeleteAssignment {
            id: assignment_id.to_string(),
        });
    }

    /// Upsert keyed by (assignment, student). Resubmitting refreshes the
    /// timestamp and leaves the record otherwise unchanged.
    pub fn submit_assignment(
        &mut self,
        assignment_id: &str,
        student_id: &str,
    ) -> Option<&Submission> {
        self.dispatch(Command::SubmitAssignment {
            assignment_id: assignment_id.to_string(),
            student_id: student_id.to_string(),
            submitted_at: Utc::now(),
            new_id: new_submission_id(),
        });
        self.submission(assignment_id, student_id)
    }

    /// Admins see what they authored, students see everything. Insertion
    /// order is preserved either way.
    pub fn assignments_for_user(&self, user: &User) -> Vec<&Assignment> {
        if user.is_admin() {
            self.state
                .assignments
                .iter()
                .filter(|a| a.created_by == user.id)
                .collect()
        } else {
            self.state.assignments.iter().collect()
        }
    }

    pub fn submission(&self, assignment_id: &str, student_id: &str) -> Option<&Submission> {
        self.state
            .submission_position(assignment_id, student_id)
            .map(|pos| &self.state.submissions[pos])
    }

    pub fn submissions_for_assignment(&self, assignment_id: &str) -> Vec<&Submission> {
        self.state
            .submissions
            .iter()
            .filter(|s| s.assignment_id == assignment_id)
            .collect()
    }
}
