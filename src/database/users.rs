use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::{NewUser, Role, SettingsUpdate, User, UserSettings};

const USER_COLUMNS: &str =
    "id, student_id, name, given_name, family_name, picture, email, locale, role, created_at";

pub fn find_by_email(conn: &mut DbConn, email: &str) -> Result<Option<User>> {
    let sql = format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS);

    conn.query_row(&sql, params![email], parse_user_row)
        .optional()
        .context("Failed to query user by email")
}

pub fn find_by_id(conn: &mut DbConn, id: i64) -> Result<Option<User>> {
    let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);

    conn.query_row(&sql, params![id], parse_user_row)
        .optional()
        .context("Failed to query user by id")
}

pub fn insert_user(
    conn: &mut DbConn,
    student_id: &str,
    profile: &NewUser,
    role: Role,
) -> Result<User> {
    let sql = format!(
        "INSERT INTO users (student_id, name, given_name, family_name, picture, email, locale, role) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) RETURNING {}",
        USER_COLUMNS
    );

    conn.query_row(
        &sql,
        params![
            student_id,
            profile.name,
            profile.given_name,
            profile.family_name,
            profile.picture,
            profile.email,
            profile.locale,
            role
        ],
        parse_user_row,
    )
    .context("Failed to insert new user")
}

pub fn set_role(conn: &mut DbConn, user_id: i64, role: Role) -> Result<()> {
    conn.execute("UPDATE users SET role = ?1 WHERE id = ?2", params![role, user_id])
        .context("Failed to update user role")?;
    Ok(())
}

fn parse_user_row(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        student_id: row.get(1)?,
        name: row.get(2)?,
        given_name: row.get(3)?,
        family_name: row.get(4)?,
        picture: row.get(5)?,
        email: row.get(6)?,
        locale: row.get(7)?,
        role: row.get(8)?,
        created_at: row.get(9)?,
    })
}

pub fn insert_settings(conn: &mut DbConn, user_id: i64, email: &str) -> Result<UserSettings> {
    let sql = "INSERT INTO user_settings (user_id, email) VALUES (?1, ?2) RETURNING user_id, username, email, phone, line_id, ig_id";

    conn.query_row(sql, params![user_id, email], parse_settings_row)
        .context("Failed to insert user settings")
}

pub fn find_settings(conn: &mut DbConn, user_id: i64) -> Result<Option<UserSettings>> {
    let sql = "SELECT user_id, username, email, phone, line_id, ig_id FROM user_settings WHERE user_id = ?1";

    conn.query_row(sql, params![user_id], parse_settings_row)
        .optional()
        .context("Failed to query user settings")
}

/// Overwrites every contact field, matching a full settings form submit.
pub fn update_settings(
    conn: &mut DbConn,
    user_id: i64,
    update: &SettingsUpdate,
) -> Result<Option<UserSettings>> {
    let sql = "UPDATE user_settings SET username = ?1, email = ?2, phone = ?3, line_id = ?4, ig_id = ?5 WHERE user_id = ?6 RETURNING user_id, username, email, phone, line_id, ig_id";

    conn.query_row(
        sql,
        params![
            update.username,
            update.email,
            update.phone,
            update.line_id,
            update.ig_id,
            user_id
        ],
        parse_settings_row,
    )
    .optional()
    .context("Failed to update user settings")
}

fn parse_settings_row(row: &rusqlite::Row) -> rusqlite::Result<UserSettings> {
    Ok(UserSettings {
        user_id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        line_id: row.get(4)?,
        ig_id: row.get(5)?,
    })
}
