//! Core library for the health service: configuration, database access,
//! system monitoring, health probes, and the HTTP surface.

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod health;
pub mod monitoring;

pub use config::{AppConfig, DatabaseConfig, HealthConfig, ServerConfig};
pub use database::{get_database_pool, DatabaseManager};
pub use error::{AppError, Result};
pub use handlers::routes::{create_routes, WELCOME_MESSAGE};
pub use health::{
    HealthProbe, HealthReport, HealthService, ProbeResult, ProbeStatus, ReportStatus,
};
pub use monitoring::{CountingAllocator, SystemMonitor};

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub health: Arc<HealthService>,
}

impl AppState {
    pub fn new(health: HealthService) -> Self {
        Self {
            app_name: "Health Service".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            health: Arc::new(health),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
