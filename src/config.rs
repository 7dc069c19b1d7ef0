use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use tracing::warn;

use crate::AiMitraError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_enable_cors() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: default_enable_cors(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_file_output")]
    pub file_output: bool,
    #[serde(default = "default_log_directory")]
    pub directory: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_file_output() -> bool {
    true
}

fn default_log_directory() -> String {
    "logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_output: default_file_output(),
            directory: default_log_directory(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Value of the `anthropic-version` protocol header
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

pub(crate) fn default_llm_endpoint() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

pub(crate) fn default_llm_model() -> String {
    "claude-3-opus-20240229".to_string()
}

pub(crate) fn default_max_tokens() -> u32 {
    1000
}

pub(crate) fn default_temperature() -> f32 {
    0.7
}

pub(crate) fn default_api_version() -> String {
    "2023-06-01".to_string()
}

pub(crate) fn default_timeout_secs() -> u64 {
    30
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            api_key: String::new(),
            model: default_llm_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    #[serde(default = "default_dimension")]
    pub dimension: usize,
    /// Name of the embedding model the mock encoder stands in for
    #[serde(default = "default_embedding_model")]
    pub model: String,
}

pub(crate) fn default_dimension() -> usize {
    384
}

fn default_embedding_model() -> String {
    "all-MiniLM-L6-v2".to_string()
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            dimension: default_dimension(),
            model: default_embedding_model(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    #[serde(default = "default_context_path")]
    pub context_path: PathBuf,
    /// Number of routes listed in the system prompt
    #[serde(default = "default_max_prompt_routes")]
    pub max_prompt_routes: usize,
}

fn default_context_path() -> PathBuf {
    PathBuf::from("data/app_context.json")
}

pub(crate) fn default_max_prompt_routes() -> usize {
    10
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            context_path: default_context_path(),
            max_prompt_routes: default_max_prompt_routes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

pub(crate) fn default_history_limit() -> usize {
    10
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageConfig {
    #[serde(default = "default_language")]
    pub default: String,
}

pub(crate) fn default_language() -> String {
    "en".to_string()
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            default: default_language(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Append retrieved navigation context to the message sent to the model
    #[serde(default)]
    pub enhance_queries: bool,
    /// Prebuilt vector store to load instead of indexing at startup
    #[serde(default)]
    pub index_path: Option<PathBuf>,
}

pub(crate) fn default_top_k() -> usize {
    3
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            enhance_queries: false,
            index_path: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub language: LanguageConfig,
    #[serde(default)]
    pub rag: RagConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from the default config file path, then apply
    /// environment overrides and validate
    pub fn load() -> crate::Result<Self> {
        let mut config = if Path::new("config.toml").exists() {
            Self::from_file("config.toml")?
        } else if Path::new("config.example.toml").exists() {
            warn!("Using config.example.toml. Please create config.toml for production use.");
            Self::from_file("config.example.toml")?
        } else {
            warn!("No config file found, using built-in defaults");
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from environment-style variables.
    ///
    /// `lookup` is injected so tests do not have to mutate the process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> crate::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("ANTHROPIC_API_KEY") {
            self.llm.api_key = key;
        }
        if let Some(model) = lookup("CLAUDE_MODEL") {
            self.llm.model = model;
        }
        if let Some(value) = lookup("CLAUDE_MAX_TOKENS") {
            self.llm.max_tokens = value.parse().map_err(|_| {
                AiMitraError::ConfigError(format!("CLAUDE_MAX_TOKENS is not a number: {value}"))
            })?;
        }
        if let Some(value) = lookup("CLAUDE_TEMPERATURE") {
            self.llm.temperature = value.parse().map_err(|_| {
                AiMitraError::ConfigError(format!("CLAUDE_TEMPERATURE is not a number: {value}"))
            })?;
        }
        if let Some(host) = lookup("APP_HOST") {
            self.server.host = host;
        }
        if let Some(value) = lookup("APP_PORT") {
            self.server.port = value.parse().map_err(|_| {
                AiMitraError::ConfigError(format!("APP_PORT is not a valid port: {value}"))
            })?;
        }
        Ok(())
    }

    /// Reject settings that would break the service at runtime
    pub fn validate(&self) -> crate::Result<()> {
        if self.embeddings.dimension == 0 {
            return Err(AiMitraError::ConfigError(
                "embeddings.dimension must be greater than zero".to_string(),
            ));
        }
        if self.chat.history_limit == 0 {
            return Err(AiMitraError::ConfigError(
                "chat.history_limit must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.llm.temperature) {
            return Err(AiMitraError::ConfigError(format!(
                "llm.temperature must be within [0, 1], got {}",
                self.llm.temperature
            )));
        }
        url::Url::parse(&self.llm.endpoint).map_err(|e| {
            AiMitraError::ConfigError(format!("llm.endpoint is not a valid URL: {e}"))
        })?;
        Ok(())
    }

    /// Get server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Get embedding dimension
    pub fn embedding_dimension(&self) -> usize {
        self.embeddings.dimension
    }

    /// Get LLM endpoint
    pub fn llm_endpoint(&self) -> &str {
        &self.llm.endpoint
    }

    /// Get LLM model
    pub fn llm_model(&self) -> &str {
        &self.llm.model
    }

    /// Get the default response language
    pub fn default_language(&self) -> &str {
        &self.language.default
    }

    /// Copy of the configuration that is safe to print
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if !config.llm.api_key.is_empty() {
            config.llm.api_key = "********".to_string();
        }
        config
    }
}
