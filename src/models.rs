//! Domain records shared across services

use std::path::Path;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use tracing::info;
use tracing::warn;

/// One in-app destination that can be suggested to the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationContext {
    #[serde(default)]
    pub route: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub intent_keywords: Vec<String>,
    #[serde(default)]
    pub user_needs: Vec<String>,
    #[serde(default)]
    pub sample_questions: Vec<String>,
}

/// App-level description used for retrieval
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppMeta {
    #[serde(default)]
    pub app_name: String,
    #[serde(default)]
    pub app_description: String,
    #[serde(default)]
    pub key_features: Vec<String>,
}

/// The static navigation-context document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppContext {
    #[serde(default)]
    pub navigation_contexts: Vec<NavigationContext>,
    #[serde(default)]
    pub meta: Option<AppMeta>,
}

impl AppContext {
    /// Parse the document from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let context = serde_json::from_str(&content)?;
        Ok(context)
    }

    /// Load the document, falling back to an empty context when the file is
    /// missing or unreadable. Navigation suggestions then use the defaults.
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok(context) => {
                info!(
                    "Loaded {} navigation contexts from {}",
                    context.navigation_contexts.len(),
                    path.display()
                );
                context
            }
            Err(e) => {
                warn!(
                    "Could not load app context from {}: {}. Using an empty context.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }
}

/// Entities extracted from a farmer's message. Values are always English.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tags {
    #[serde(default, deserialize_with = "null_as_default")]
    pub crops: Vec<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub topics: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub issues: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub seasons: Vec<String>,
    /// Keys the model returned beyond the known five
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Tags {
    pub fn has_crops(&self) -> bool {
        !self.crops.is_empty()
    }

    pub fn has_city(&self) -> bool {
        self.city.as_deref().is_some_and(|city| !city.is_empty())
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Speaker of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// Chat message in conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}
