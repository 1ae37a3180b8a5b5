use serde::Deserialize;

use crate::config::settings::AppConfig;
use crate::database::{DbConn, DbPool};
use crate::errors::AppError;

pub mod books;
pub mod courses;
pub mod posts;
pub mod reviews;
pub mod teachers;
pub mod users;

pub struct AppState {
    pub pool: DbPool,
    pub config: AppConfig,
}

impl AppState {
    pub fn connection(&self) -> Result<DbConn, AppError> {
        Ok(self.pool.get()?)
    }
}

/// `?type=` selector shared by several resources.
#[derive(Debug, Default, Deserialize)]
pub struct TypeParams {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// `{ "id": ... }` body used by PATCH/DELETE endpoints.
#[derive(Debug, Deserialize)]
pub struct IdBody {
    pub id: i64,
}
