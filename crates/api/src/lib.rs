//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Authentication middleware
//! - Read-only static serving of the durable receipt area

pub mod middleware;
pub mod response;
pub mod routes;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use recibo_core::receipt::ReceiptStore;
use recibo_shared::JwtService;

/// Room for a maximum-size receipt plus the rest of the multipart form.
const BODY_LIMIT: usize = 12 * 1024 * 1024;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Receipt store for the attachment lifecycle.
    pub receipts: Arc<ReceiptStore>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let durable_root = state.receipts.config().durable_root().to_path_buf();

    Router::new()
        .nest("/api", routes::api_routes_with_state(state.clone()))
        .nest_service("/uploads/receipts", ServeDir::new(durable_root))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
