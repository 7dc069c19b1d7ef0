//! API route definitions

use axum::routing::get;
use axum::routing::post;
use axum::Router;

use super::handlers::AppState;
use super::handlers::{
    self,
};

/// Routes mounted under `/api/v1`
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Chat
        .route("/chat", post(handlers::chat))
        .route(
            "/chat/history/:user_id",
            get(handlers::get_chat_history).delete(handlers::clear_chat_history),
        )
        .with_state(state)
}
