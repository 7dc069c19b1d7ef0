//! API request handlers

use std::sync::Arc;

use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::info;
use tracing::warn;

use crate::api::types::ApiResponse;
use crate::api::types::ChatRequest;
use crate::api::types::HealthResponse;
use crate::api::types::WelcomeResponse;
use crate::chat::ChatResponse;
use crate::chat::ChatbotService;
use crate::models::ChatTurn;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub chatbot: Arc<ChatbotService>,
}

impl AppState {
    pub fn new(chatbot: ChatbotService) -> Self {
        Self {
            chatbot: Arc::new(chatbot),
        }
    }
}

/// Root greeting
pub async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to CropConnect Direct API".to_string(),
    })
}

/// Health check handler
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Process a chat message (POST /api/v1/chat). Upstream model failures are
/// reported with 502 and the `error` field set.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> (StatusCode, Json<ChatResponse>) {
    info!(
        "POST /api/v1/chat (language={:?}, user_id={:?})",
        request.language, request.user_id
    );

    let response = state
        .chatbot
        .process_message(
            &request.message,
            request.language.as_deref(),
            request.user_id.as_deref(),
        )
        .await;

    let status = if let Some(error) = &response.error {
        warn!("Chat request degraded: {}", error);
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::OK
    };
    (status, Json(response))
}

/// Chat history of one user (GET /api/v1/chat/history/:user_id)
pub async fn get_chat_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<ApiResponse<Vec<ChatTurn>>> {
    info!("GET /api/v1/chat/history/{}", user_id);
    Json(ApiResponse::success(state.chatbot.get_chat_history(&user_id)))
}

/// Clear the chat history of one user (DELETE /api/v1/chat/history/:user_id)
pub async fn clear_chat_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<ApiResponse<bool>> {
    info!("DELETE /api/v1/chat/history/{}", user_id);
    Json(ApiResponse::success(
        state.chatbot.clear_chat_history(&user_id),
    ))
}
