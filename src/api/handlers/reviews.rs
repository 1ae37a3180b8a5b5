use axum::{
    extract::State,
    response::Json,
};
use log::info;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::{AppState, IdBody};
use crate::api::extract::{ApiJson, ApiQuery};
use crate::api::auth::AuthUser;
use crate::api::models::LeaderboardEntry;
use crate::database::{self, DbConn, Review};
use crate::errors::{ApiResult, AppError};
use crate::services::ratings;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Deserialize)]
pub struct ReviewParams {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub course: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReviewBody {
    pub course_id: i64,
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewBody {
    pub id: i64,
    pub comment: String,
}

/// `?type=count`, `?type=rank` or `?course=<id>`.
pub async fn get_reviews(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<ReviewParams>,
) -> ApiResult<Json<Value>> {
    let mut conn = state.connection()?;

    match params.kind.as_deref() {
        Some("count") => {
            let count = database::reviews::count_by_user(&mut conn, auth.user_id)?;
            Ok(Json(json!({ "msg": "Review count loaded", "count": count })))
        }
        Some("rank") => {
            let rank: Vec<LeaderboardEntry> = ratings::reviewer_leaderboard(&mut conn)?
                .into_iter()
                .map(LeaderboardEntry::from)
                .collect();
            Ok(Json(json!({ "msg": "Review ranking loaded", "rank": rank })))
        }
        _ => {
            let course_id = params
                .course
                .ok_or_else(|| AppError::bad_request("Course is required"))?;
            let comments = database::reviews::list_for_course(&mut conn, course_id)?;
            Ok(Json(json!({ "msg": "Reviews loaded", "comments": comments })))
        }
    }
}

/// One review per user and course.
pub async fn create_review(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiJson(body): ApiJson<NewReviewBody>,
) -> ApiResult<Json<Value>> {
    if !(MIN_RATING..=MAX_RATING).contains(&body.rating) {
        return Err(AppError::bad_request(format!(
            "Rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        )));
    }

    let mut conn = state.connection()?;
    if database::courses::find_by_id(&mut conn, body.course_id)?.is_none() {
        return Err(AppError::not_found("Course not found"));
    }

    let review = database::reviews::insert_review(
        &mut conn,
        body.course_id,
        auth.user_id,
        body.rating,
        &body.comment,
    )?
    .ok_or_else(|| AppError::bad_request("Course already reviewed"))?;
    database::courses::touch_with_teacher(&mut conn, review.course_id)?;
    info!("User {} reviewed course {}", auth.user_id, review.course_id);

    Ok(Json(json!({ "msg": "Review created", "comment": review })))
}

pub async fn update_review(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiJson(body): ApiJson<UpdateReviewBody>,
) -> ApiResult<Json<Value>> {
    let mut conn = state.connection()?;
    let review = owned_review(&mut conn, body.id, &auth)?;

    let updated = database::reviews::update_comment(&mut conn, review.id, &body.comment)?;
    database::courses::touch_with_teacher(&mut conn, updated.course_id)?;

    Ok(Json(json!({ "msg": "Review updated", "comment": updated })))
}

pub async fn delete_review(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiJson(body): ApiJson<IdBody>,
) -> ApiResult<Json<Value>> {
    let mut conn = state.connection()?;
    let review = owned_review(&mut conn, body.id, &auth)?;

    database::reviews::delete_review(&mut conn, review.id)?;
    info!("User {} deleted review {}", auth.user_id, review.id);

    Ok(Json(json!({ "msg": "Review deleted" })))
}

fn owned_review(conn: &mut DbConn, id: i64, auth: &AuthUser) -> ApiResult<Review> {
    database::reviews::find_by_id(conn, id)?
        .filter(|review| review.user_id == auth.user_id)
        .ok_or_else(|| AppError::unauthorized("Insufficient permissions"))
}
