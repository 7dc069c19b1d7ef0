//! Chat orchestration: language handling, history, LLM call and navigation

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use tracing::info;
use tracing::warn;

use super::history::ChatHistoryStore;
use crate::config::AppConfig;
use crate::embeddings::Encoder;
use crate::embeddings::MockEncoder;
use crate::errors::Result;
use crate::language::LanguageService;
use crate::llm::LlmClient;
use crate::models::AppContext;
use crate::models::ChatTurn;
use crate::models::Tags;
use crate::navigation::NavigationService;
use crate::rag::ContextRetriever;

/// Answer to one chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
    pub navigations: Vec<String>,
    pub tags: Tags,
    /// Language the answer was requested in
    pub language: String,
    /// Language detected in the incoming message
    pub source_language: Option<String>,
    /// Set when the upstream model call failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Main entry point for processing farmer messages
pub struct ChatbotService {
    app_context: AppContext,
    language: LanguageService,
    navigation: NavigationService,
    retriever: ContextRetriever,
    llm: LlmClient,
    history: ChatHistoryStore,
    enhance_queries: bool,
}

impl ChatbotService {
    /// Build every component from configuration. A missing navigation file
    /// leaves the service with an empty catalog.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let app_context = AppContext::load_or_empty(&config.navigation.context_path);

        let encoder: Arc<dyn Encoder> = Arc::new(MockEncoder::with_model_name(
            config.embedding_dimension(),
            config.embeddings.model.clone(),
        ));
        let retriever = match &config.rag.index_path {
            Some(path) if path.exists() => {
                info!("Loading context index from {}", path.display());
                ContextRetriever::from_index_file(path, encoder, config.rag.top_k)?
            }
            Some(path) => {
                warn!(
                    "Context index {} not found, building from navigation data",
                    path.display()
                );
                ContextRetriever::new(&app_context, encoder, config.rag.top_k)?
            }
            None => ContextRetriever::new(&app_context, encoder, config.rag.top_k)?,
        };

        let language = LanguageService::new(config.default_language())?;
        let navigation = NavigationService::new(&app_context)?;
        let llm = LlmClient::new(&config.llm)?
            .with_max_prompt_routes(config.navigation.max_prompt_routes);
        info!("Using model {} at {}", llm.model(), llm.endpoint());

        Ok(Self {
            app_context,
            language,
            navigation,
            retriever,
            llm,
            history: ChatHistoryStore::new(config.chat.history_limit),
            enhance_queries: config.rag.enhance_queries,
        })
    }

    /// Replace the language service (e.g. with a fixed detector)
    #[must_use]
    pub fn with_language_service(mut self, language: LanguageService) -> Self {
        self.language = language;
        self
    }

    pub fn app_context(&self) -> &AppContext {
        &self.app_context
    }

    pub fn language_service(&self) -> &LanguageService {
        &self.language
    }

    pub fn navigation_service(&self) -> &NavigationService {
        &self.navigation
    }

    pub fn retriever(&self) -> &ContextRetriever {
        &self.retriever
    }

    pub fn llm(&self) -> &LlmClient {
        &self.llm
    }

    /// Process a chat message and return advice with navigation suggestions.
    /// `language` overrides the detected language when given.
    pub async fn process_message(
        &self,
        message: &str,
        language: Option<&str>,
        user_id: Option<&str>,
    ) -> ChatResponse {
        let detected_language = self.language.detect_language(message);
        let request_language = language
            .filter(|code| !code.trim().is_empty())
            .map_or_else(|| detected_language.clone(), str::to_string);
        let clean_message = self.language.clean_language_prefix(message);
        let user_id = user_id.filter(|id| !id.is_empty());

        let history = user_id
            .map(|id| self.history.recent(id))
            .unwrap_or_default();

        let model_input = if self.enhance_queries {
            match self.retriever.enhance_query_with_context(&clean_message) {
                Ok(enhanced) => enhanced,
                Err(e) => {
                    warn!("Context retrieval failed, sending message as is: {}", e);
                    clean_message.clone()
                }
            }
        } else {
            clean_message.clone()
        };

        let reply = self
            .llm
            .generate_farming_response(
                &model_input,
                &request_language,
                &self.app_context.navigation_contexts,
                &history,
            )
            .await;

        if let Some(id) = user_id {
            self.history
                .append_exchange(id, &clean_message, &reply.message);
        }

        let navigations = self
            .navigation
            .suggest_navigations(&clean_message, &reply.tags);
        info!(
            "Chat turn: user={:?} detected={} language={} navigations={:?}",
            user_id, detected_language, request_language, navigations
        );

        ChatResponse {
            message: reply.message,
            navigations,
            tags: reply.tags,
            language: request_language,
            source_language: Some(detected_language),
            error: reply.error,
        }
    }

    /// Stored turns for `user_id`, oldest first
    pub fn get_chat_history(&self, user_id: &str) -> Vec<ChatTurn> {
        self.history.recent(user_id)
    }

    /// Empty the history of `user_id`; false when the user had none
    pub fn clear_chat_history(&self, user_id: &str) -> bool {
        self.history.clear(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_response_omits_absent_error() {
        let response = ChatResponse {
            message: "ok".to_string(),
            navigations: vec!["/chatbot".to_string()],
            tags: Tags::default(),
            language: "en".to_string(),
            source_language: Some("en".to_string()),
            error: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["source_language"], "en");
        assert_eq!(json["tags"]["city"], serde_json::Value::Null);
    }

    #[test]
    fn test_from_config_with_missing_context_file() {
        let mut config = AppConfig::default();
        config.navigation.context_path = "does/not/exist.json".into();

        let service = ChatbotService::from_config(&config).unwrap();
        assert!(service.app_context().navigation_contexts.is_empty());
        assert!(service.retriever().store().is_empty());
        assert_eq!(
            service
                .navigation_service()
                .suggest_navigations("anything", &Tags::default()),
            vec!["/chatbot", "/podcasts", "/community"]
        );
    }

    #[test]
    fn test_from_config_loads_bundled_context() {
        let service = ChatbotService::from_config(&AppConfig::default()).unwrap();
        assert!(!service.app_context().navigation_contexts.is_empty());
        assert!(service.navigation_service().context("/chatbot").is_some());
    }
}
