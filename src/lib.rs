pub mod api;
pub mod chat;
pub mod cli;
pub mod config;
pub mod embeddings;
pub mod errors;
pub mod language;
pub mod llm;
pub mod logging;
pub mod models;
pub mod navigation;
pub mod rag;


pub use chat::ChatResponse;
pub use chat::ChatbotService;
pub use config::AppConfig;
pub use errors::*;
