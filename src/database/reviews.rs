use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::{Review, ReviewWithAuthor};
use crate::rating::ReviewerActivity;

const REVIEW_COLUMNS: &str = "id, course_id, user_id, rating, comment, created_at, updated_at";

pub fn list_ratings_for_course(conn: &mut DbConn, course_id: i64) -> Result<Vec<f64>> {
    let sql = "SELECT rating FROM reviews WHERE course_id = ?1";

    let mut stmt = conn.prepare(sql)?;
    let ratings = stmt
        .query_map(params![course_id], |row| row.get::<_, f64>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list ratings for course")?;

    Ok(ratings)
}

/// One entry per reviewer, identified by username or, failing that, student id.
pub fn count_reviews_by_reviewer(conn: &mut DbConn) -> Result<Vec<ReviewerActivity>> {
    let sql = "SELECT COALESCE(NULLIF(us.username, ''), u.student_id), COUNT(r.course_id) \
               FROM reviews r \
               JOIN users u ON u.id = r.user_id \
               LEFT JOIN user_settings us ON us.user_id = r.user_id \
               GROUP BY r.user_id \
               ORDER BY COUNT(r.course_id) DESC, r.user_id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ReviewerActivity {
                identity: row.get(0)?,
                review_count: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to count reviews by reviewer")?;

    Ok(rows)
}

pub fn count_by_user(conn: &mut DbConn, user_id: i64) -> Result<usize> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM reviews WHERE user_id = ?1",
            params![user_id],
            |r| r.get(0),
        )
        .context("Failed to count reviews for user")?;
    Ok(count as usize)
}

/// Newest edits first, with the author's forum username.
pub fn list_for_course(conn: &mut DbConn, course_id: i64) -> Result<Vec<ReviewWithAuthor>> {
    let sql = "SELECT r.id, r.course_id, r.user_id, us.username, r.rating, r.comment, r.created_at, r.updated_at \
               FROM reviews r \
               LEFT JOIN user_settings us ON us.user_id = r.user_id \
               WHERE r.course_id = ?1 \
               ORDER BY r.updated_at DESC, r.id DESC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![course_id], |row| {
            Ok(ReviewWithAuthor {
                id: row.get(0)?,
                course_id: row.get(1)?,
                user_id: row.get(2)?,
                username: row.get(3)?,
                rating: row.get(4)?,
                comment: row.get(5)?,
                created_at: row.get(6)?,
                updated_at: row.get(7)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn find_by_id(conn: &mut DbConn, id: i64) -> Result<Option<Review>> {
    let sql = format!("SELECT {} FROM reviews WHERE id = ?1", REVIEW_COLUMNS);

    conn.query_row(&sql, params![id], parse_review_row)
        .optional()
        .context("Failed to query review by id")
}

/// `None` when the user already reviewed the course.
pub fn insert_review(
    conn: &mut DbConn,
    course_id: i64,
    user_id: i64,
    rating: i32,
    comment: &str,
) -> Result<Option<Review>> {
    let sql = format!(
        "INSERT INTO reviews (course_id, user_id, rating, comment) VALUES (?1, ?2, ?3, ?4) \
         ON CONFLICT (course_id, user_id) DO NOTHING RETURNING {}",
        REVIEW_COLUMNS
    );

    conn.query_row(&sql, params![course_id, user_id, rating, comment], parse_review_row)
        .optional()
        .context("Failed to insert review")
}

pub fn update_comment(conn: &mut DbConn, id: i64, comment: &str) -> Result<Review> {
    let sql = format!(
        "UPDATE reviews SET comment = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2 RETURNING {}",
        REVIEW_COLUMNS
    );

    conn.query_row(&sql, params![comment, id], parse_review_row)
        .context("Failed to update review comment")
}

pub fn delete_review(conn: &mut DbConn, id: i64) -> Result<()> {
    conn.execute("DELETE FROM reviews WHERE id = ?1", params![id])
        .context("Failed to delete review")?;
    Ok(())
}

fn parse_review_row(row: &rusqlite::Row) -> rusqlite::Result<Review> {
    Ok(Review {
        id: row.get(0)?,
        course_id: row.get(1)?,
        user_id: row.get(2)?,
        rating: row.get(3)?,
        comment: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
