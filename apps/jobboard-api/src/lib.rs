//! Job board listing service
//!
//! Provides REST endpoints for:
//! - Active listings, optionally restricted to role categories
//! - The newest listings for the home page
//! - Listing details
//! - Employer submissions, held for moderation
//! - Moderator approval

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

pub use config::Args;
pub use error::ApiError;
pub use state::AppState;

/// Build the router with all routes and middleware
pub fn build_router(state: Arc<AppState>) -> Router {
    // CORS configuration for web clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Listing queries
        .route(
            "/api/jobs",
            get(handlers::list_jobs).post(handlers::submit_job),
        )
        .route("/api/jobs/latest", get(handlers::latest_jobs))
        .route("/api/jobs/:id", get(handlers::get_job))
        // Moderation
        .route("/api/admin/jobs/:id/approve", post(handlers::approve_job))
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
