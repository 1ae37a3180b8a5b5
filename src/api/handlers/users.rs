use axum::{
    extract::State,
    response::Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use super::{AppState, TypeParams};
use crate::api::extract::{ApiJson, ApiQuery};
use crate::api::auth::AuthUser;
use crate::api::models::ContactInfo;
use crate::database::{self, SettingsUpdate};
use crate::errors::{ApiResult, AppError};

/// Full profile by default, `?type=auth` for just the id, `?type=settings` for contact details.
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<TypeParams>,
) -> ApiResult<Json<Value>> {
    let mut conn = state.connection()?;

    match params.kind.as_deref() {
        Some("settings") => {
            let settings = database::users::find_settings(&mut conn, auth.user_id)?
                .ok_or_else(|| AppError::bad_request("User settings not found"))?;
            Ok(Json(json!({
                "msg": "Contact settings loaded",
                "contact": ContactInfo::from(settings),
            })))
        }
        Some("auth") => {
            let user = database::users::find_by_id(&mut conn, auth.user_id)?
                .ok_or_else(|| AppError::bad_request("User not found"))?;
            Ok(Json(json!({ "msg": "User loaded", "user": { "id": user.id } })))
        }
        _ => {
            let user = database::users::find_by_id(&mut conn, auth.user_id)?
                .ok_or_else(|| AppError::bad_request("User not found"))?;
            Ok(Json(json!({ "msg": "User loaded", "user": user })))
        }
    }
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<TypeParams>,
    ApiJson(update): ApiJson<SettingsUpdate>,
) -> ApiResult<Json<Value>> {
    if params.kind.as_deref() != Some("settings") {
        return Err(AppError::bad_request("Unsupported update type"));
    }

    let mut conn = state.connection()?;
    let settings = database::users::update_settings(&mut conn, auth.user_id, &update)?
        .ok_or_else(|| AppError::bad_request("User settings not found"))?;

    Ok(Json(json!({
        "msg": "Contact settings updated",
        "contact": ContactInfo::from(settings),
    })))
}
