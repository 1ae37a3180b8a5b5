use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::{Post, PostAuthor, PostWithAuthor};

const POST_WITH_AUTHOR_SQL: &str = "SELECT p.id, p.user_id, p.title, p.content, p.anonymous, p.created_at, p.updated_at, u.name, u.picture, us.username \
     FROM posts p \
     JOIN users u ON u.id = p.user_id \
     LEFT JOIN user_settings us ON us.user_id = p.user_id";

pub fn insert_post(
    conn: &mut DbConn,
    user_id: i64,
    title: &str,
    content: &str,
    anonymous: bool,
) -> Result<Post> {
    let sql = "INSERT INTO posts (user_id, title, content, anonymous) VALUES (?1, ?2, ?3, ?4) RETURNING id, user_id, title, content, anonymous, created_at, updated_at";

    conn.query_row(sql, params![user_id, title, content, anonymous], |row| {
        Ok(Post {
            id: row.get(0)?,
            user_id: row.get(1)?,
            title: row.get(2)?,
            content: row.get(3)?,
            anonymous: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    })
    .context("Failed to insert post")
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<PostWithAuthor>> {
    let sql = format!("{} ORDER BY p.created_at DESC, p.id DESC", POST_WITH_AUTHOR_SQL);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_post_with_author_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn find_by_id(conn: &mut DbConn, id: i64) -> Result<Option<PostWithAuthor>> {
    let sql = format!("{} WHERE p.id = ?1", POST_WITH_AUTHOR_SQL);

    conn.query_row(&sql, params![id], parse_post_with_author_row)
        .optional()
        .context("Failed to query post by id")
}

fn parse_post_with_author_row(row: &rusqlite::Row) -> rusqlite::Result<PostWithAuthor> {
    let post = Post {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        anonymous: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    };
    let author = PostAuthor {
        id: post.user_id,
        name: row.get(7)?,
        picture: row.get(8)?,
        username: row.get(9)?,
    };

    Ok(PostWithAuthor { post, author })
}
