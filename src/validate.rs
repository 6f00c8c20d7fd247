//! Checks an assignment draft coming from the create form before it is turned
//! into a store record. The store itself never re-validates.

use crate::model::{Assignment, User};
use crate::store::new_assignment_id;
use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssignmentDraft {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub drive_link: String,
    /// Numbers and numeric strings are both accepted.
    pub max_score: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("assignment draft has {} invalid field(s)", .fields.len())]
pub struct ValidationErrors {
    /// camelCase field name -> message.
    pub fields: BTreeMap<&'static str, &'static str>,
}

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*):(\S+)$").expect("valid url regex")
    })
}

fn host_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^//[^\s/?#]+").expect("valid host regex"))
}

/// Schemes that must carry a `//host` part after the colon.
const HOSTED_SCHEMES: &[&str] = &["http", "https", "ftp", "ws", "wss"];

/// Absolute URL shape: `scheme:rest`, where web schemes also need a host.
pub fn is_valid_url(s: &str) -> bool {
    let Some(caps) = url_re().captures(s) else {
        return false;
    };
    let scheme = caps[1].to_ascii_lowercase();
    !HOSTED_SCHEMES.contains(&scheme.as_str()) || host_re().is_match(&caps[2])
}

/// Leading-integer reading: `"50.5"` and `50.5` both give 50, `"abc"` gives nothing.
fn parse_max_score(v: Option<&serde_json::Value>) -> Option<i64> {
    match v? {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        serde_json::Value::String(s) => {
            let s = s.trim_start();
            let end = s
                .char_indices()
                .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
                .map(|(i, _)| i)
                .unwrap_or(s.len());
            s[..end].parse::<i64>().ok()
        }
        _ => None,
    }
}

struct CheckedFields {
    title: String,
    description: String,
    due_date: NaiveDate,
    drive_link: String,
    max_score: u32,
}

/// `kept_due` is a due date that may stay as-is even when already past.
fn check_fields(
    draft: &AssignmentDraft,
    today: NaiveDate,
    kept_due: Option<NaiveDate>,
) -> Result<CheckedFields, ValidationErrors> {
    let mut fields = BTreeMap::new();

    let title = draft.title.trim();
    if title.is_empty() {
        fields.insert("title", "Assignment title is required");
    }

    let description = draft.description.trim();
    if description.is_empty() {
        fields.insert("description", "Description is required");
    }

    let due_date = if draft.due_date.trim().is_empty() {
        fields.insert("dueDate", "Due date is required");
        None
    } else {
        match NaiveDate::parse_from_str(draft.due_date.trim(), "%Y-%m-%d") {
            Ok(d) if d < today && Some(d) != kept_due => {
                fields.insert("dueDate", "Due date cannot be in the past");
                None
            }
            Ok(d) => Some(d),
            Err(_) => {
                fields.insert("dueDate", "Due date is required");
                None
            }
        }
    };

    let drive_link = draft.drive_link.trim();
    if drive_link.is_empty() {
        fields.insert("driveLink", "Drive link is required");
    } else if !is_valid_url(drive_link) {
        fields.insert("driveLink", "Please enter a valid URL");
    }

    let max_score = match parse_max_score(draft.max_score.as_ref()) {
        Some(n) if n >= 1 => u32::try_from(n).ok(),
        _ => None,
    };
    if max_score.is_none() {
        fields.insert("maxScore", "Max score must be at least 1");
    }

    match (due_date, max_score) {
        (Some(due_date), Some(max_score)) if fields.is_empty() => Ok(CheckedFields {
            title: title.to_string(),
            description: description.to_string(),
            due_date,
            drive_link: drive_link.to_string(),
            max_score,
        }),
        _ => Err(ValidationErrors { fields }),
    }
}

/// Builds a new assignment owned by `author`, stamped with a fresh id and
/// `today` as its creation date. Every failing field is reported at once.
pub fn validate_draft(
    draft: &AssignmentDraft,
    author: &User,
    today: NaiveDate,
) -> Result<Assignment, ValidationErrors> {
    let f = check_fields(draft, today, None)?;
    Ok(Assignment {
        id: new_assignment_id(),
        title: f.title,
        description: f.description,
        due_date: f.due_date,
        drive_link: f.drive_link,
        max_score: f.max_score,
        created_by: author.id.clone(),
        created_at: today,
    })
}

/// Applies the editable fields of `draft` to `stored`. Identity, author and
/// creation date always come from `stored`. An unchanged due date may already
/// be in the past.
pub fn validate_edit(
    draft: &AssignmentDraft,
    stored: &Assignment,
    today: NaiveDate,
) -> Result<Assignment, ValidationErrors> {
    let f = check_fields(draft, today, Some(stored.due_date))?;
    Ok(Assignment {
        id: stored.id.clone(),
        title: f.title,
        description: f.description,
        due_date: f.due_date,
        drive_link: f.drive_link,
        max_score: f.max_score,
        created_by: stored.created_by.clone(),
        created_at: stored.created_at,
    })
}
