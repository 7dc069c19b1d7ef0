//! Client for the Anthropic messages API

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::error;

use super::prompts::build_system_prompt;
use super::response::parse_model_output;
use super::response::LlmReply;
use super::response::EMPTY_REPLY_MESSAGE;
use crate::config::LlmConfig;
use crate::errors::AiMitraError;
use crate::errors::Result;
use crate::language::LanguageService;
use crate::models::ChatTurn;
use crate::models::NavigationContext;
use crate::models::Role;

const DEFAULT_PROMPT_ROUTES: usize = 10;

/// One entry of the `messages` array
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: &'a [Message],
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

/// Client for generating farming advice through the messages API
pub struct LlmClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    api_version: String,
    max_prompt_routes: usize,
}

impl LlmClient {
    /// Create a new client. The underlying HTTP client is built once and
    /// reused for every call.
    ///
    /// # Errors
    /// - `LlmError` when no model is named or `max_tokens` is zero
    /// - HTTP client build errors (invalid TLS configuration)
    pub fn new(config: &LlmConfig) -> Result<Self> {
        if config.model.trim().is_empty() {
            return Err(AiMitraError::LlmError("llm.model must not be empty".to_string()));
        }
        if config.max_tokens == 0 {
            return Err(AiMitraError::LlmError(
                "llm.max_tokens must be greater than zero".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AiMitraError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            api_version: config.api_version.clone(),
            max_prompt_routes: DEFAULT_PROMPT_ROUTES,
        })
    }

    /// Limit the number of routes listed in the system prompt
    #[must_use]
    pub fn with_max_prompt_routes(mut self, max_prompt_routes: usize) -> Self {
        self.max_prompt_routes = max_prompt_routes;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Ask for advice in `language` plus tag extraction. Never fails: upstream
    /// problems come back as a reply with `error` set.
    pub async fn generate_farming_response(
        &self,
        message: &str,
        language: &str,
        navigation: &[NavigationContext],
        history: &[ChatTurn],
    ) -> LlmReply {
        let system = build_system_prompt(
            LanguageService::language_name(language),
            navigation,
            self.max_prompt_routes,
        );
        let messages = conversation(history, message);
        self.complete(&system, &messages).await
    }

    /// Send one non-streaming request and parse the first text block
    pub async fn complete(&self, system: &str, messages: &[Message]) -> LlmReply {
        match self.send(system, messages).await {
            Ok(Ok(text)) => parse_model_output(&text),
            Ok(Err(status)) => {
                error!("LLM API returned status {}", status);
                LlmReply::failure(format!("API Error: {status}"))
            }
            Err(e) => {
                error!("LLM request failed: {}", e);
                LlmReply::failure(format!("Error communicating with Claude API: {e}"))
            }
        }
    }

    /// Outer error is transport or decoding, inner error is a non-2xx status
    async fn send(
        &self,
        system: &str,
        messages: &[Message],
    ) -> std::result::Result<std::result::Result<String, u16>, reqwest::Error> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system,
            messages,
        };

        debug!(
            "Calling LLM API: {} ({} messages, model {})",
            self.endpoint,
            messages.len(),
            self.model
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Ok(Err(status.as_u16()));
        }

        let body: MessagesResponse = response.json().await?;
        let text = body
            .content
            .into_iter()
            .next()
            .map_or_else(|| EMPTY_REPLY_MESSAGE.to_string(), |block| block.text);
        Ok(Ok(text))
    }
}

/// Stored turns followed by the current user message. Leading assistant
/// turns are dropped so the sequence opens with a user turn.
pub fn conversation(history: &[ChatTurn], message: &str) -> Vec<Message> {
    history
        .iter()
        .skip_while(|turn| turn.role == Role::Assistant)
        .map(|turn| Message {
            role: turn.role,
            content: turn.content.clone(),
        })
        .chain(std::iter::once(Message::user(message)))
        .collect()
}
