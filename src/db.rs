use anyhow::Context;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

pub const DB_FILE: &str = "classboard.sqlite3";
const CURRENT_USER_KEY: &str = "session.currentUserId";

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace).with_context(|| {
        format!(
            "failed to create workspace {}",
            workspace.to_string_lossy()
        )
    })?;
    let conn = Connection::open(workspace.join(DB_FILE))?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS settings(
            key TEXT PRIMARY KEY,
            value_json TEXT NOT NULL
        )",
        [],
    )?;

    Ok(conn)
}

pub fn settings_get_json(
    conn: &Connection,
    key: &str,
) -> anyhow::Result<Option<serde_json::Value>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT value_json FROM settings WHERE key = ?",
            [key],
            |r| r.get(0),
        )
        .optional()?;
    match raw {
        Some(s) => {
            let v = serde_json::from_str(&s)
                .with_context(|| format!("settings value for {key} is not json"))?;
            Ok(Some(v))
        }
        None => Ok(None),
    }
}

pub fn settings_set_json(
    conn: &Connection,
    key: &str,
    value: &serde_json::Value,
) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value_json) VALUES(?, ?)
         ON CONFLICT(key) DO UPDATE SET value_json = excluded.value_json",
        (key, value.to_string()),
    )?;
    Ok(())
}

/// The id the UI last switched to, if one was saved and is a string.
pub fn load_current_user_id(conn: &Connection) -> anyhow::Result<Option<String>> {
    Ok(settings_get_json(conn, CURRENT_USER_KEY)?
        .and_then(|v| v.as_str().map(str::to_string)))
}

pub fn save_current_user_id(conn: &Connection, user_id: &str) -> anyhow::Result<()> {
    settings_set_json(conn, CURRENT_USER_KEY, &serde_json::Value::from(user_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(prefix: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "{}-{}",
            prefix,
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos()
        ))
    }

    #[test]
    fn current_user_round_trips_across_connections() {
        let ws = temp_dir("classboard-db-session");
        {
            let conn = open_db(&ws).expect("open");
            assert_eq!(load_current_user_id(&conn).expect("load"), None);
            save_current_user_id(&conn, "prof_001").expect("save");
            save_current_user_id(&conn, "student_003").expect("save again");
        }
        let conn = open_db(&ws).expect("reopen");
        assert_eq!(
            load_current_user_id(&conn).expect("load"),
            Some("student_003".to_string())
        );
    }

    #[test]
    fn non_string_saved_value_reads_as_none() {
        let ws = temp_dir("classboard-db-nonstring");
        let conn = open_db(&ws).expect("open");
        settings_set_json(&conn, CURRENT_USER_KEY, &serde_json::json!({ "id": 1 }))
            .expect("set");
        assert_eq!(load_current_user_id(&conn).expect("load"), None);
    }

    #[test]
    fn corrupt_settings_value_is_an_error() {
        let ws = temp_dir("classboard-db-corrupt");
        let conn = open_db(&ws).expect("open");
        conn.execute(
            "INSERT INTO settings(key, value_json) VALUES(?, ?)",
            (CURRENT_USER_KEY, "{not json"),
        )
        .expect("raw insert");
        assert!(load_current_user_id(&conn).is_err());
    }
}
