use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::Role;

/// The caller behind a valid session token.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionUser {
    pub user_id: i64,
    pub role: Role,
}

pub fn insert_session(
    conn: &mut DbConn,
    token: &str,
    user_id: i64,
    expires_at: NaiveDateTime,
) -> Result<()> {
    conn.execute(
        "INSERT INTO sessions (token, user_id, expires_at) VALUES (?1, ?2, ?3)",
        params![token, user_id, expires_at],
    )
    .context("Failed to insert session")?;
    Ok(())
}

pub fn find_active(
    conn: &mut DbConn,
    token: &str,
    now: NaiveDateTime,
) -> Result<Option<SessionUser>> {
    let sql = "SELECT u.id, u.role FROM sessions s JOIN users u ON u.id = s.user_id WHERE s.token = ?1 AND s.expires_at > ?2";

    conn.query_row(sql, params![token, now], |row| {
        Ok(SessionUser {
            user_id: row.get(0)?,
            role: row.get(1)?,
        })
    })
    .optional()
    .context("Failed to look up session")
}

pub fn delete_expired(conn: &mut DbConn, now: NaiveDateTime) -> Result<usize> {
    conn.execute("DELETE FROM sessions WHERE expires_at <= ?1", params![now])
        .context("Failed to delete expired sessions")
}
