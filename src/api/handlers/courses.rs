use axum::{
    extract::State,
    response::Json,
};
use log::info;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::AppState;
use crate::api::extract::{ApiJson, ApiQuery};
use crate::api::auth::AuthUser;
use crate::api::models::{CourseDetail, CourseListItem, TeacherName};
use crate::database;
use crate::errors::{ApiResult, AppError};
use crate::services::ratings;

#[derive(Deserialize)]
pub struct CourseParams {
    pub teacher: Option<i64>,
    pub course: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourseBody {
    pub name: Option<String>,
    pub teacher_id: Option<i64>,
}

/// `?teacher=` lists a teacher's courses, `?course=` loads one course.
pub async fn get_courses(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    ApiQuery(params): ApiQuery<CourseParams>,
) -> ApiResult<Json<Value>> {
    let mut conn = state.connection()?;

    if let Some(teacher_id) = params.teacher {
        let courses: Vec<CourseListItem> = ratings::courses_with_ratings(&mut conn, teacher_id)?
            .into_iter()
            .map(CourseListItem::from)
            .collect();

        return Ok(Json(json!({ "msg": "Courses loaded", "courses": courses })));
    }

    let Some(course_id) = params.course else {
        return Err(AppError::bad_request("Either teacher or course is required"));
    };

    let rated = ratings::course_rating(&mut conn, course_id)?
        .ok_or_else(|| AppError::not_found("Course not found"))?;
    let teacher = database::teachers::find_by_id(&mut conn, rated.course.teacher_id)?
        .ok_or_else(|| AppError::not_found("Teacher not found"))?;

    let course = CourseDetail {
        id: rated.course.id,
        name: rated.course.name,
        teacher_id: rated.course.teacher_id,
        teacher: TeacherName { name: teacher.name },
        total_rating: rated.summary.count,
        average_rating: rated.summary.average,
    };

    Ok(Json(json!({ "msg": "Course loaded", "course": course })))
}

pub async fn create_course(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiJson(body): ApiJson<NewCourseBody>,
) -> ApiResult<Json<Value>> {
    auth.require_staff()?;

    let (Some(name), Some(teacher_id)) = (
        body.name.filter(|n| !n.trim().is_empty()),
        body.teacher_id,
    ) else {
        return Err(AppError::bad_request("Course name and teacher are required"));
    };

    let mut conn = state.connection()?;
    if database::teachers::find_by_id(&mut conn, teacher_id)?.is_none() {
        return Err(AppError::not_found("Teacher not found"));
    }

    let course = database::courses::insert_course(&mut conn, &name, teacher_id)?;
    info!("User {} added course {} for teacher {}", auth.user_id, course.id, teacher_id);

    Ok(Json(json!({ "msg": "Course created", "course": course })))
}
