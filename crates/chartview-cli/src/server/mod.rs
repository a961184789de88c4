//! HTTP surface
//!
//! Routes:
//! - `GET  /repos`                                           - Registered repositories
//! - `GET  /charts/{repo}`                                   - Chart list of a repository
//! - `GET  /charts/{repo}/{chart}/{version}`                 - Values and templates (`?kube-version=` adds compatibility)
//! - `GET  /charts/values/{repo}/{chart}/{version}`          - Declared values
//! - `GET  /charts/templates/{repo}/{chart}/{version}`       - Template sources
//! - `POST /charts/manifests/render/{repo}/{chart}/{version}` - Render with override values
//! - `GET  /charts/manifests/{repo}/{chart}/{version}/{hash}` - Cached render as plain text

mod error;
mod handlers;
mod middleware;

use axum::{
    Router,
    routing::{get, post},
};
use chartview_service::ChartService;
use tokio::signal;

use crate::config::Settings;
use crate::error::{CliError, Result};

pub use error::ApiError;

/// Build the router over a service
pub fn create_router(service: ChartService) -> Router {
    Router::new()
        .route("/repos", get(handlers::list_repositories))
        .route("/charts/{repo}", get(handlers::list_charts))
        .route("/charts/{repo}/{chart}/{version}", get(handlers::chart))
        .route("/charts/values/{repo}/{chart}/{version}", get(handlers::values))
        .route(
            "/charts/templates/{repo}/{chart}/{version}",
            get(handlers::templates),
        )
        .route(
            "/charts/manifests/render/{repo}/{chart}/{version}",
            post(handlers::render),
        )
        .route(
            "/charts/manifests/{repo}/{chart}/{version}/{hash}",
            get(handlers::stringified),
        )
        .layer(axum::middleware::from_fn(middleware::cors))
        .layer(axum::middleware::from_fn(middleware::log_request))
        .with_state(service)
}

/// Serve until SIGINT or SIGTERM
pub async fn serve(settings: &Settings, service: ChartService) -> Result<()> {
    let address = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| CliError::server(format!("failed to bind {}: {}", address, e)))?;

    tracing::info!(%address, "HTTP server listening");

    axum::serve(listener, create_router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CliError::server(e.to_string()))?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received SIGINT"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
