use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::Course;

pub fn insert_course(conn: &mut DbConn, name: &str, teacher_id: i64) -> Result<Course> {
    let sql = "INSERT INTO courses (name, teacher_id) VALUES (?1, ?2) RETURNING id, name, teacher_id, created_at, updated_at";

    conn.query_row(sql, params![name, teacher_id], parse_course_row)
        .context("Failed to insert course")
}

pub fn find_by_id(conn: &mut DbConn, id: i64) -> Result<Option<Course>> {
    let sql = "SELECT id, name, teacher_id, created_at, updated_at FROM courses WHERE id = ?1";

    conn.query_row(sql, params![id], parse_course_row)
        .optional()
        .context("Failed to query course by id")
}

/// Most recently reviewed or edited first.
pub fn list_by_teacher(conn: &mut DbConn, teacher_id: i64) -> Result<Vec<Course>> {
    let sql = "SELECT id, name, teacher_id, created_at, updated_at FROM courses WHERE teacher_id = ?1 ORDER BY updated_at DESC, id DESC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![teacher_id], parse_course_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Bumps `updated_at` on the course and on its teacher.
pub fn touch_with_teacher(conn: &mut DbConn, course_id: i64) -> Result<()> {
    conn.execute(
        "UPDATE courses SET updated_at = CURRENT_TIMESTAMP WHERE id = ?1",
        params![course_id],
    )
    .context("Failed to touch course")?;

    conn.execute(
        "UPDATE teachers SET updated_at = CURRENT_TIMESTAMP WHERE id = (SELECT teacher_id FROM courses WHERE id = ?1)",
        params![course_id],
    )
    .context("Failed to touch teacher of course")?;

    Ok(())
}

fn parse_course_row(row: &rusqlite::Row) -> rusqlite::Result<Course> {
    Ok(Course {
        id: row.get(0)?,
        name: row.get(1)?,
        teacher_id: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}
