use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::{Book, BookDetail, BookListItem, BookUpdate, NewBook, Page, Seller};

const BOOK_COLUMNS: &str = "id, user_id, cover, title, author, isbn, price, publisher, category, delivery_method, content, sold, created_at, updated_at";

pub fn insert_book(conn: &mut DbConn, user_id: i64, book: &NewBook) -> Result<Book> {
    let sql = format!(
        "INSERT INTO books (user_id, cover, title, author, isbn, price, publisher, category, delivery_method, content, sold) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11) RETURNING {}",
        BOOK_COLUMNS
    );

    conn.query_row(
        &sql,
        params![
            user_id,
            book.cover,
            book.title,
            book.author,
            book.isbn,
            book.price,
            book.publisher,
            book.category,
            book.delivery_method,
            book.content,
            book.sold
        ],
        parse_book_row,
    )
    .context("Failed to insert book")
}

pub fn find_by_id(conn: &mut DbConn, id: i64) -> Result<Option<Book>> {
    let sql = format!("SELECT {} FROM books WHERE id = ?1", BOOK_COLUMNS);

    conn.query_row(&sql, params![id], parse_book_row)
        .optional()
        .context("Failed to query book by id")
}

pub fn find_detail(conn: &mut DbConn, id: i64) -> Result<Option<BookDetail>> {
    let Some(book) = find_by_id(conn, id)? else {
        return Ok(None);
    };

    let seller = conn
        .query_row(
            "SELECT student_id, picture FROM users WHERE id = ?1",
            params![book.user_id],
            |row| {
                Ok(Seller {
                    student_id: row.get(0)?,
                    picture: row.get(1)?,
                })
            },
        )
        .context("Failed to query book seller")?;

    Ok(Some(BookDetail { book, user: seller }))
}

/// Newest listings first.
pub fn list_page(conn: &mut DbConn, page: Page) -> Result<Vec<BookListItem>> {
    let sql = "SELECT b.id, b.cover, b.title, b.category, b.price, b.sold, b.delivery_method, b.created_at, u.student_id \
               FROM books b JOIN users u ON u.id = b.user_id \
               ORDER BY b.created_at DESC, b.id DESC \
               LIMIT ?1 OFFSET ?2";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![page.limit, page.offset], |row| {
            Ok(BookListItem {
                id: row.get(0)?,
                cover: row.get(1)?,
                title: row.get(2)?,
                category: row.get(3)?,
                price: row.get(4)?,
                sold: row.get(5)?,
                delivery_method: row.get(6)?,
                created_at: row.get(7)?,
                user: Seller {
                    student_id: row.get(8)?,
                    picture: None,
                },
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn count_all(conn: &mut DbConn) -> Result<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM books", [], |r| r.get(0))
        .context("Failed to count books")?;
    Ok(count as usize)
}

pub fn count_by_user(conn: &mut DbConn, user_id: i64) -> Result<usize> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM books WHERE user_id = ?1",
            params![user_id],
            |r| r.get(0),
        )
        .context("Failed to count books for user")?;
    Ok(count as usize)
}

/// Applies the fields present in `update` to book `id`.
pub fn update_book(conn: &mut DbConn, id: i64, update: &BookUpdate) -> Result<Book> {
    let sql = format!(
        "UPDATE books SET cover = COALESCE(?1, cover), title = COALESCE(?2, title), author = COALESCE(?3, author), isbn = COALESCE(?4, isbn), price = COALESCE(?5, price), publisher = COALESCE(?6, publisher), category = COALESCE(?7, category), delivery_method = COALESCE(?8, delivery_method), content = COALESCE(?9, content), sold = COALESCE(?10, sold), updated_at = CURRENT_TIMESTAMP WHERE id = ?11 RETURNING {}",
        BOOK_COLUMNS
    );

    conn.query_row(
        &sql,
        params![
            update.cover,
            update.title,
            update.author,
            update.isbn,
            update.price,
            update.publisher,
            update.category,
            update.delivery_method,
            update.content,
            update.sold,
            id
        ],
        parse_book_row,
    )
    .context("Failed to update book")
}

pub fn delete_book(conn: &mut DbConn, id: i64) -> Result<()> {
    conn.execute("DELETE FROM books WHERE id = ?1", params![id])
        .context("Failed to delete book")?;
    Ok(())
}

fn parse_book_row(row: &rusqlite::Row) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        user_id: row.get(1)?,
        cover: row.get(2)?,
        title: row.get(3)?,
        author: row.get(4)?,
        isbn: row.get(5)?,
        price: row.get(6)?,
        publisher: row.get(7)?,
        category: row.get(8)?,
        delivery_method: row.get(9)?,
        content: row.get(10)?,
        sold: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}
