use crate::ipc::error::err;
use crate::ipc::types::Request;
use chrono::{Local, NaiveDate};

pub fn param_str<'a>(req: &'a Request, key: &str) -> Option<&'a str> {
    req.params.get(key).and_then(|v| v.as_str())
}

/// Trimmed, non-empty string param or a ready `bad_params` response.
pub fn required_str(req: &Request, key: &str) -> Result<String, serde_json::Value> {
    match param_str(req, key).map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(err(
            &req.id,
            "bad_params",
            format!("missing params.{key}"),
            None,
        )),
    }
}

pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// `params.today` lets the UI pin the calendar day; defaults to the local date.
pub fn today_param(req: &Request) -> Result<NaiveDate, serde_json::Value> {
    match param_str(req, "today") {
        None => Ok(local_today()),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| {
            err(
                &req.id,
                "bad_params",
                format!("params.today must be YYYY-MM-DD: {e}"),
                None,
            )
        }),
    }
}
