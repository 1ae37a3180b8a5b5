use axum::{
    extract::State,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::AppState;
use crate::api::extract::{ApiJson, ApiQuery};
use crate::api::auth::AuthUser;
use crate::api::models::{PostDetail, PostListItem};
use crate::database;
use crate::errors::{ApiResult, AppError};

#[derive(Deserialize)]
pub struct PostParams {
    pub id: Option<i64>,
}

#[derive(Deserialize)]
pub struct NewPostBody {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub anonymous: bool,
}

pub async fn get_posts(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<PostParams>,
) -> ApiResult<Json<Value>> {
    let mut conn = state.connection()?;

    if let Some(post_id) = params.id {
        let post = database::posts::find_by_id(&mut conn, post_id)?
            .map(PostDetail::from)
            .ok_or_else(|| AppError::not_found("Post not found"))?;
        return Ok(Json(json!({ "msg": "Post loaded", "post": post })));
    }

    let posts: Vec<PostListItem> = database::posts::list_all(&mut conn)?
        .into_iter()
        .map(PostListItem::from)
        .collect();

    Ok(Json(json!({ "msg": "Posts loaded", "posts": posts })))
}

pub async fn create_post(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiJson(body): ApiJson<NewPostBody>,
) -> ApiResult<Json<Value>> {
    if body.title.trim().is_empty() {
        return Err(AppError::bad_request("Title must not be empty"));
    }
    if body.content.trim().is_empty() {
        return Err(AppError::bad_request("Content must not be empty"));
    }

    let mut conn = state.connection()?;
    let post = database::posts::insert_post(
        &mut conn,
        auth.user_id,
        &body.title,
        &body.content,
        body.anonymous,
    )?;

    Ok(Json(json!({ "msg": "Post created", "post": post })))
}
