//! REST surface over the state actor

mod error;
mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use eyre::{Context, Result};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::scheduler::{Clock, Reminder};
use crate::state::StateManager;

pub use error::{ApiError, ApiResult};

/// Shared handler state
#[derive(Clone)]
pub struct ApiState {
    pub state: StateManager,
    pub clock: Arc<dyn Clock>,
    pub reminder: Reminder,
}

impl ApiState {
    pub fn new(state: StateManager, clock: Arc<dyn Clock>, reminder: Reminder) -> Self {
        Self { state, clock, reminder }
    }
}

/// Build the `/api` router
pub fn router(api: ApiState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route(
            "/api/categories",
            get(routes::list_categories)
                .post(routes::create_category)
                .delete(routes::delete_all_categories),
        )
        .route(
            "/api/categories/{id}",
            put(routes::update_category).delete(routes::delete_category),
        )
        .route("/api/categories/{id}/checked", put(routes::set_category_checked))
        .route(
            "/api/items",
            get(routes::list_items)
                .post(routes::create_item)
                .delete(routes::delete_all_items),
        )
        .route("/api/items/reset", post(routes::reset_items))
        .route("/api/items/category/{category_id}", get(routes::list_items_by_category))
        .route("/api/items/{id}", put(routes::update_item).delete(routes::delete_item))
        .route("/api/settings", get(routes::get_settings).put(routes::update_settings))
        .route("/api/status", get(routes::status))
        .route("/api/notifications/test", post(routes::test_notification))
        .with_state(api)
}

/// Bind `addr` and serve until a shutdown signal arrives
pub async fn run_server(addr: &str, api: ApiState, shutdown_rx: mpsc::Receiver<()>) -> Result<()> {
    debug!(%addr, "run_server: called");
    let listener = TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind {}", addr))?;
    serve(listener, api, shutdown_rx).await
}

/// Serve on an already-bound listener until a shutdown signal arrives
pub async fn serve(listener: TcpListener, api: ApiState, mut shutdown_rx: mpsc::Receiver<()>) -> Result<()> {
    let local_addr = listener.local_addr()?;
    info!("HTTP server listening on http://{local_addr}");

    axum::serve(listener, router(api))
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            debug!("serve: shutdown signal received");
        })
        .await
        .context("HTTP server failed")?;

    info!("HTTP server stopped");
    Ok(())
}
