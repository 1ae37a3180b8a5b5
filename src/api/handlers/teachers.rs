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
use crate::api::models::TeacherDetail;
use crate::database::{self, NewTeacher, TeacherUpdate};
use crate::errors::{ApiResult, AppError};
use crate::services::ratings;

#[derive(Deserialize)]
pub struct TeacherSearchParams {
    pub search: Option<String>,
}

pub async fn list_teachers(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<TeacherSearchParams>,
) -> ApiResult<Json<Value>> {
    let mut conn = state.connection()?;

    let count = database::teachers::count_all(&mut conn)?;
    let teachers = database::teachers::search(&mut conn, params.search.as_deref())?;

    Ok(Json(json!({
        "msg": "Teachers loaded",
        "teachers": teachers,
        "count": count,
    })))
}

pub async fn get_teacher(
    State(state): State<Arc<AppState>>,
    ApiPath(teacher_id): ApiPath<i64>,
) -> ApiResult<Json<Value>> {
    let mut conn = state.connection()?;

    let rated = ratings::teacher_rating(&mut conn, teacher_id)?
        .ok_or_else(|| AppError::not_found("Teacher not found"))?;

    Ok(Json(json!({
        "msg": "Teacher loaded",
        "teacher": TeacherDetail::from(rated),
    })))
}

pub async fn create_teacher(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiJson(teacher): ApiJson<NewTeacher>,
) -> ApiResult<Json<Value>> {
    auth.require_staff()?;
    if teacher.name.trim().is_empty() {
        return Err(AppError::bad_request("Teacher name is required"));
    }

    let mut conn = state.connection()?;
    let created = database::teachers::insert_teacher(&mut conn, &teacher)?;
    info!("User {} added teacher {}", auth.user_id, created.id);

    Ok(Json(json!({ "msg": "Teacher created", "teacher": created })))
}

pub async fn update_teacher(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiJson(update): ApiJson<TeacherUpdate>,
) -> ApiResult<Json<Value>> {
    auth.require_staff()?;

    let mut conn = state.connection()?;
    let updated = database::teachers::update_teacher(&mut conn, &update)?
        .ok_or_else(|| AppError::not_found("Teacher not found"))?;

    Ok(Json(json!({ "msg": "Teacher updated", "teacher": updated })))
}
