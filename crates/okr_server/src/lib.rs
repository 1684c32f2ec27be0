//! REST backend for the OKR dashboard.
//!
//! # Responsibility
//! - Expose `OkrService` over the `/api/okrs` JSON surface.
//! - Map service errors to HTTP status codes and failure envelopes.
//!
//! # Invariants
//! - Every response body is an `ApiEnvelope`.
//! - The service lock is never held across an await point.

mod error;
mod routes;

pub use error::{ServerError, ServerResult};

use axum::routing::{get, patch, put};
use axum::Router;
use okr_core::{OkrService, SqliteObjectiveRepository};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub type SqliteOkrService = OkrService<SqliteObjectiveRepository>;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    service: Arc<Mutex<SqliteOkrService>>,
}

impl AppState {
    pub fn new(service: SqliteOkrService) -> Self {
        Self {
            service: Arc::new(Mutex::new(service)),
        }
    }

    /// Runs `f` with exclusive access to the service.
    pub fn with_service<T>(&self, f: impl FnOnce(&mut SqliteOkrService) -> T) -> T {
        let mut service = self.service.lock();
        f(&mut service)
    }
}

/// Builds the `/api/okrs` router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/okrs",
            get(routes::list_objectives).post(routes::create_objective),
        )
        .route(
            "/api/okrs/{id}",
            put(routes::update_objective).delete(routes::delete_objective),
        )
        .route("/api/okrs/{id}/status", patch(routes::set_objective_status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the router on an already bound listener until the task is dropped
/// or the process receives ctrl-c.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    log::info!("event=server_listen module=server status=ok addr={addr}");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::warn!("event=server_shutdown module=server status=error error={err}");
        std::future::pending::<()>().await;
    }
    log::info!("event=server_shutdown module=server status=ok");
}
