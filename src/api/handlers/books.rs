use axum::{
    extract::State,
    response::Json,
};
use log::info;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::AppState;
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::auth::AuthUser;
use crate::config::settings::ListingSettings;
use crate::database::{self, BookUpdate, DbConn, NewBook, Page};
use crate::errors::{ApiResult, AppError};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookParams {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub user_id: Option<i64>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Deserialize)]
pub struct DeleteBookParams {
    pub id: Option<i64>,
}

fn page_window(params: &BookParams, listing: &ListingSettings) -> ApiResult<Page> {
    let page = params.page.unwrap_or(1).max(1);
    let per_page = params
        .per_page
        .unwrap_or(listing.default_page_size)
        .clamp(1, listing.max_page_size);

    let offset = (page - 1)
        .checked_mul(per_page)
        .ok_or_else(|| AppError::bad_request("Page out of range"))?;

    Ok(Page {
        limit: per_page,
        offset,
    })
}

/// Paginated listings, or `?type=count&userId=` for one seller's count.
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<BookParams>,
) -> ApiResult<Json<Value>> {
    let mut conn = state.connection()?;

    if let (Some("count"), Some(user_id)) = (params.kind.as_deref(), params.user_id) {
        let count = database::books::count_by_user(&mut conn, user_id)?;
        return Ok(Json(json!({ "msg": "Book count loaded", "count": count })));
    }

    let window = page_window(&params, &state.config.listing)?;
    let count = database::books::count_all(&mut conn)?;
    let books = database::books::list_page(&mut conn, window)?;

    Ok(Json(json!({ "msg": "Books loaded", "books": books, "count": count })))
}

pub async fn get_book(
    State(state): State<Arc<AppState>>,
    ApiPath(book_id): ApiPath<i64>,
) -> ApiResult<Json<Value>> {
    let mut conn = state.connection()?;

    let book = database::books::find_detail(&mut conn, book_id)?
        .ok_or_else(|| AppError::not_found("Book not found"))?;

    Ok(Json(json!({ "msg": "Book loaded", "book": book })))
}

pub async fn create_book(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiJson(book): ApiJson<NewBook>,
) -> ApiResult<Json<Value>> {
    if book.title.trim().is_empty() {
        return Err(AppError::bad_request("Book title is required"));
    }

    let mut conn = state.connection()?;
    let created = database::books::insert_book(&mut conn, auth.user_id, &book)?;
    info!("User {} listed book {}", auth.user_id, created.id);

    Ok(Json(json!({ "msg": "Book created", "book": created })))
}

/// PUT with the id in the path.
pub async fn replace_book(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiPath(book_id): ApiPath<i64>,
    ApiJson(update): ApiJson<BookUpdate>,
) -> ApiResult<Json<Value>> {
    let mut conn = state.connection()?;
    apply_update(&mut conn, &auth, book_id, &update)
}

/// PATCH with the id in the body.
pub async fn patch_book(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiJson(update): ApiJson<BookUpdate>,
) -> ApiResult<Json<Value>> {
    let book_id = update
        .id
        .ok_or_else(|| AppError::bad_request("Missing book id"))?;

    let mut conn = state.connection()?;
    apply_update(&mut conn, &auth, book_id, &update)
}

pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<DeleteBookParams>,
) -> ApiResult<Json<Value>> {
    let book_id = params
        .id
        .ok_or_else(|| AppError::bad_request("Missing book id"))?;

    let mut conn = state.connection()?;
    ensure_owner(&mut conn, &auth, book_id)?;
    database::books::delete_book(&mut conn, book_id)?;
    info!("User {} removed book {}", auth.user_id, book_id);

    Ok(Json(json!({ "msg": "Book deleted" })))
}

fn apply_update(
    conn: &mut DbConn,
    auth: &AuthUser,
    book_id: i64,
    update: &BookUpdate,
) -> ApiResult<Json<Value>> {
    ensure_owner(conn, auth, book_id)?;
    let updated = database::books::update_book(conn, book_id, update)?;

    Ok(Json(json!({ "msg": "Book updated", "book": updated })))
}

/// Missing books and other sellers' books are both refused.
fn ensure_owner(conn: &mut DbConn, auth: &AuthUser, book_id: i64) -> ApiResult<()> {
    match database::books::find_by_id(conn, book_id)? {
        Some(book) if book.user_id == auth.user_id => Ok(()),
        _ => Err(AppError::unauthorized("Insufficient permissions")),
    }
}
