//! API route definitions and router builder.

pub mod ai;
pub mod health;
pub mod records;
pub mod telegram;

use axum::Router;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // AI command pipeline
        .route("/ai/parse", post(ai::parse_command))
        .route("/ai/command", post(ai::run_command))
        // Generic record CRUD
        .route(
            "/records/{table}",
            get(records::list_records).post(records::create_record),
        )
        // Telegram webhook
        .route("/telegram/webhook", post(telegram::webhook));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}
