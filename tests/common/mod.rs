#![allow(dead_code)]

use ai_mitra::chat::ChatbotService;
use ai_mitra::language::LanguageDetector;
use ai_mitra::language::LanguageService;
use ai_mitra::AppConfig;
use serde_json::json;

pub const MESSAGES_PATH: &str = "/v1/messages";

/// Detector that always reports the same language
pub struct FixedDetector(pub &'static str);

impl LanguageDetector for FixedDetector {
    fn detect(&self, _text: &str) -> Option<String> {
        Some(self.0.to_string())
    }
}

pub fn test_config(server_url: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.llm.endpoint = format!("{server_url}{MESSAGES_PATH}");
    config.llm.api_key = "test-key".to_string();
    config.logging.file_output = false;
    config
}

pub fn chatbot(config: &AppConfig) -> ChatbotService {
    ChatbotService::from_config(config)
        .unwrap()
        .with_language_service(
            LanguageService::with_detector("en", Box::new(FixedDetector("en"))).unwrap(),
        )
}

/// Messages API body whose single text block is `text`
pub fn reply_body(text: &str) -> String {
    json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "model": "claude-3-opus-20240229",
        "content": [{"type": "text", "text": text}]
    })
    .to_string()
}

/// Messages API body carrying a well-formed `{message, tags}` object
pub fn tagged_reply(message: &str, tags: serde_json::Value) -> String {
    reply_body(&json!({ "message": message, "tags": tags }).to_string())
}
