//! HTTP server implementation

use axum::routing::get;
use axum::Router;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers;
use crate::api::handlers::AppState;
use crate::api::routes;
use crate::chat::ChatbotService;
use crate::config::AppConfig;
use crate::Result;

/// Full application router: `/`, `/api/v1/*`, tracing and optional CORS
pub fn build_router(state: AppState, enable_cors: bool) -> Router {
    let mut app = Router::new()
        .route("/", get(handlers::root))
        .nest("/api/v1", routes::api_routes(state))
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Start the API server
pub async fn serve_api(config: &AppConfig, host: String, port: u16, enable_cors: bool) -> Result<()> {
    info!("🚀 Starting CropConnect chat server...");

    if config.llm.api_key.is_empty() {
        tracing::warn!("No LLM API key configured; chat requests will fail upstream");
    }

    let state = AppState::new(ChatbotService::from_config(config)?);
    let app = build_router(state, enable_cors);
    if enable_cors {
        info!("✅ CORS enabled");
    }

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 API server listening on http://{}", addr);
    info!("Available endpoints:");
    info!("  GET    /                              - Welcome message");
    info!("  GET    /api/v1/health                 - Health check");
    info!("  POST   /api/v1/chat                   - Chat with the farming assistant");
    info!("  GET    /api/v1/chat/history/:user_id  - Conversation history");
    info!("  DELETE /api/v1/chat/history/:user_id  - Clear conversation history");

    axum::serve(listener, app).await?;

    Ok(())
}
