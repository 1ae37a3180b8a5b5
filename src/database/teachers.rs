use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::{NewTeacher, Teacher, TeacherListItem, TeacherUpdate};

const TEACHER_COLUMNS: &str =
    "id, name, picture, email, education, expertise, created_at, updated_at";

pub fn insert_teacher(conn: &mut DbConn, teacher: &NewTeacher) -> Result<Teacher> {
    let sql = format!(
        "INSERT INTO teachers (name, picture, email, education, expertise) VALUES (?1, ?2, ?3, ?4, ?5) RETURNING {}",
        TEACHER_COLUMNS
    );

    conn.query_row(
        &sql,
        params![
            teacher.name,
            teacher.picture,
            teacher.email,
            teacher.education,
            teacher.expertise
        ],
        parse_teacher_row,
    )
    .context("Failed to insert teacher")
}

/// Applies the fields present in `update`; `None` when the teacher does not exist.
pub fn update_teacher(conn: &mut DbConn, update: &TeacherUpdate) -> Result<Option<Teacher>> {
    let sql = format!(
        "UPDATE teachers SET name = COALESCE(?1, name), picture = COALESCE(?2, picture), email = COALESCE(?3, email), education = COALESCE(?4, education), expertise = COALESCE(?5, expertise), updated_at = CURRENT_TIMESTAMP WHERE id = ?6 RETURNING {}",
        TEACHER_COLUMNS
    );

    conn.query_row(
        &sql,
        params![
            update.name,
            update.picture,
            update.email,
            update.education,
            update.expertise,
            update.id
        ],
        parse_teacher_row,
    )
    .optional()
    .context("Failed to update teacher")
}

pub fn find_by_id(conn: &mut DbConn, id: i64) -> Result<Option<Teacher>> {
    let sql = format!("SELECT {} FROM teachers WHERE id = ?1", TEACHER_COLUMNS);

    conn.query_row(&sql, params![id], parse_teacher_row)
        .optional()
        .context("Failed to query teacher by id")
}

/// Newest first; `search` keeps names containing it verbatim (case-sensitive).
pub fn search(conn: &mut DbConn, search: Option<&str>) -> Result<Vec<TeacherListItem>> {
    let needle = search.unwrap_or("");
    let sql = "SELECT id, name, picture FROM teachers \
               WHERE ?1 = '' OR instr(name, ?1) > 0 \
               ORDER BY created_at DESC, id DESC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![needle], |row| {
            Ok(TeacherListItem {
                id: row.get(0)?,
                name: row.get(1)?,
                picture: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn count_all(conn: &mut DbConn) -> Result<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM teachers", [], |r| r.get(0))
        .context("Failed to count teachers")?;
    Ok(count as usize)
}

fn parse_teacher_row(row: &rusqlite::Row) -> rusqlite::Result<Teacher> {
    Ok(Teacher {
        id: row.get(0)?,
        name: row.get(1)?,
        picture: row.get(2)?,
        email: row.get(3)?,
        education: row.get(4)?,
        expertise: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
