//! Extraction of the `{message, tags}` object from model output

use serde_json::Value;
use tracing::debug;

use crate::models::Tags;

/// Message used when the model returned no text blocks
pub const EMPTY_REPLY_MESSAGE: &str = "Sorry, I couldn't generate a response.";

/// Result of one model call. `error` is set when the upstream call failed;
/// `message` then carries a human-readable description of the failure.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LlmReply {
    pub message: String,
    pub tags: Tags,
    pub error: Option<String>,
}

impl LlmReply {
    pub fn failure(error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            message: error.clone(),
            tags: Tags::default(),
            error: Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Parse model text into a reply. Text that is not a JSON object with both
/// `message` and `tags` becomes the message verbatim with empty tags.
pub fn parse_model_output(text: &str) -> LlmReply {
    if let Some(reply) = candidates(text).find_map(parse_object) {
        return reply;
    }

    debug!("Model output is not the expected JSON shape, using raw text");
    LlmReply {
        message: text.to_string(),
        ..LlmReply::default()
    }
}

/// The whole text first, then the span from the first `{` to the last `}`
fn candidates(text: &str) -> impl Iterator<Item = &str> {
    let trimmed = text.trim();
    let embedded = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => Some(&text[start..=end]),
        _ => None,
    };
    std::iter::once(trimmed).chain(embedded)
}

fn parse_object(candidate: &str) -> Option<LlmReply> {
    let Value::Object(mut object) = serde_json::from_str::<Value>(candidate).ok()? else {
        return None;
    };
    if !object.contains_key("message") || !object.contains_key("tags") {
        return None;
    }

    let message = match object.remove("message")? {
        Value::String(message) => message,
        other => other.to_string(),
    };
    let tags = object
        .remove("tags")
        .and_then(|tags| serde_json::from_value::<Tags>(tags).ok())
        .unwrap_or_default();

    Some(LlmReply {
        message,
        tags,
        error: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clean_json() {
        let reply = parse_model_output(
            r#"{"message": "गेहूं की बुवाई नवंबर में करें", "tags": {"crops": ["wheat"], "city": "Indore", "topics": ["sowing"], "issues": [], "seasons": ["rabi"]}}"#,
        );
        assert_eq!(reply.message, "गेहूं की बुवाई नवंबर में करें");
        assert_eq!(reply.tags.crops, vec!["wheat"]);
        assert_eq!(reply.tags.city.as_deref(), Some("Indore"));
        assert_eq!(reply.tags.seasons, vec!["rabi"]);
        assert!(!reply.is_error());
    }

    #[test]
    fn test_parse_json_wrapped_in_prose() {
        let reply = parse_model_output(
            "Here is the answer:\n```json\n{\"message\": \"Water twice a week\", \"tags\": {\"crops\": [\"tomato\"]}}\n```",
        );
        assert_eq!(reply.message, "Water twice a week");
        assert_eq!(reply.tags.crops, vec!["tomato"]);
        assert!(reply.tags.issues.is_empty());
    }

    #[test]
    fn test_plain_text_is_used_verbatim() {
        let text = "Use neem oil against aphids.";
        let reply = parse_model_output(text);
        assert_eq!(reply.message, text);
        assert_eq!(reply.tags, Tags::default());
        assert!(reply.error.is_none());
    }

    #[test]
    fn test_json_missing_keys_is_used_verbatim() {
        let text = r#"{"answer": "Irrigate early"}"#;
        let reply = parse_model_output(text);
        assert_eq!(reply.message, text);
        assert_eq!(reply.tags, Tags::default());
    }

    #[test]
    fn test_invalid_json_is_used_verbatim() {
        let text = r#"{"message": "unterminated", "tags": {"#;
        assert_eq!(parse_model_output(text).message, text);
    }

    #[test]
    fn test_malformed_tags_keep_message() {
        let reply = parse_model_output(r#"{"message": "ok", "tags": "none"}"#);
        assert_eq!(reply.message, "ok");
        assert_eq!(reply.tags, Tags::default());
    }

    #[test]
    fn test_null_tag_lists_become_empty() {
        let reply =
            parse_model_output(r#"{"message": "ok", "tags": {"crops": null, "city": null}}"#);
        assert!(reply.tags.crops.is_empty());
        assert!(reply.tags.city.is_none());
    }

    #[test]
    fn test_failure_reply() {
        let reply = LlmReply::failure("API Error: 500");
        assert_eq!(reply.message, "API Error: 500");
        assert_eq!(reply.error.as_deref(), Some("API Error: 500"));
        assert!(reply.is_error());
    }
}
