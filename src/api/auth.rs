use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use chrono::Utc;
use std::sync::Arc;

use crate::api::handlers::AppState;
use crate::database::{self, Role};
use crate::errors::AppError;

/// The signed-in caller, resolved from `Authorization: Bearer <token>`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuthUser {
    pub user_id: i64,
    pub role: Role,
}

impl AuthUser {
    /// Editors of the teacher/course directory.
    pub fn require_staff(&self) -> Result<(), AppError> {
        match self.role {
            Role::User => Err(AppError::forbidden("Insufficient permissions")),
            Role::Admin => Ok(()),
        }
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::unauthorized("Missing bearer token"))?;

        let mut conn = state.connection()?;
        let session = database::sessions::find_active(&mut conn, token, Utc::now().naive_utc())?
            .ok_or_else(|| AppError::unauthorized("Invalid or expired session"))?;

        Ok(AuthUser {
            user_id: session.user_id,
            role: session.role,
        })
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers), Some("abc123"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc123"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_only_admins_are_staff() {
        let user = AuthUser { user_id: 1, role: Role::User };
        let admin = AuthUser { user_id: 2, role: Role::Admin };

        assert!(user.require_staff().is_err());
        assert!(admin.require_staff().is_ok());
    }
}
