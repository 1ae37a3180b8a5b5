use anyhow::{Context, Result};
use axum::http::HeaderValue;
use log::{info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::api::handlers::AppState;
use crate::api::routes::create_router;
use crate::config::settings::AppConfig;
use crate::database;

pub struct ServerService {
    port: u16,
    config: AppConfig,
}

impl ServerService {
    pub fn new(port: u16, config: AppConfig) -> Self {
        Self { port, config }
    }

    pub async fn run(&self) -> Result<()> {
        let pool = database::create_pool(&self.config.server.database_path)?;
        {
            let mut conn = database::get_connection(&pool)?;
            database::setup::ensure_schema(&mut conn)?;
        }
        info!("Using database {}", self.config.server.database_path);

        let state = Arc::new(AppState {
            pool,
            config: self.config.clone(),
        });

        let app = create_router(state).layer(self.cors_layer());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!("Server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }

    fn cors_layer(&self) -> CorsLayer {
        let Some(origin) = self.config.server.frontend_url.as_deref() else {
            return CorsLayer::permissive();
        };

        match origin.parse::<HeaderValue>() {
            Ok(origin) => CorsLayer::very_permissive().allow_origin(origin),
            Err(e) => {
                warn!("Ignoring invalid FRONTEND_URL {:?}: {}", origin, e);
                CorsLayer::permissive()
            }
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
