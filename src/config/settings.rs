use std::env;
use std::fmt::Display;
use std::str::FromStr;

use log::{info, warn};

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub database_path: String,
    /// Allowed CORS origin; any origin is allowed when unset.
    pub frontend_url: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            database_path: "campus_forum.db".to_string(),
            frontend_url: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub session_ttl_days: i64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self { session_ttl_days: 7 }
    }
}

#[derive(Debug, Clone)]
pub struct ListingSettings {
    pub default_page_size: i64,
    pub max_page_size: i64,
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub auth: AuthSettings,
    pub listing: ListingSettings,
}

impl AppConfig {
    /// Defaults overridden by `DATABASE_PATH`, `FRONTEND_URL` and `SESSION_TTL_DAYS`.
    pub fn new() -> Self {
        let defaults = Self::default();

        Self {
            server: ServerSettings {
                database_path: env::var("DATABASE_PATH")
                    .unwrap_or(defaults.server.database_path),
                frontend_url: env::var("FRONTEND_URL").ok().filter(|url| !url.is_empty()),
            },
            auth: AuthSettings {
                session_ttl_days: parse_or("SESSION_TTL_DAYS", defaults.auth.session_ttl_days),
            },
            listing: defaults.listing,
        }
    }
}

fn parse_or<T: FromStr + Display>(key: &str, default: T) -> T
where
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
            default
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}
