//! Chat service composing language detection, the LLM client, navigation
//! scoring and per-user history

pub mod history;
pub mod service;

pub use history::ChatHistoryStore;
pub use service::ChatResponse;
pub use service::ChatbotService;
