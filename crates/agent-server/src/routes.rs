//! Router

use std::path::Path;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::handlers::{call_tool, chat_handler, health_check, list_tools};
use crate::state::AppState;

pub fn router(state: AppState, static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        // Chat page posts here
        .route("/chat", post(chat_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/tools", get(list_tools))
        .route("/api/tools/call", post(call_tool))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
