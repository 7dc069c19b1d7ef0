//! Context retrieval over the app's navigation metadata

use std::path::Path;
use std::sync::Arc;

use serde_json::json;
use serde_json::Value;
use tracing::debug;
use tracing::info;

use super::vector_store::Metadata;
use super::vector_store::VectorStore;
use crate::embeddings::Encoder;
use crate::errors::AiMitraError;
use crate::errors::Result;
use crate::models::AppContext;
use crate::models::NavigationContext;

/// Document kinds stored in the retrieval index
pub const DOC_TYPE_NAVIGATION: &str = "navigation";
pub const DOC_TYPE_META: &str = "meta";
pub const DOC_TYPE_FEATURE: &str = "feature";

/// Retriever backed by an in-memory [`VectorStore`]
pub struct ContextRetriever {
    store: VectorStore,
    encoder: Arc<dyn Encoder>,
    top_k: usize,
}

impl ContextRetriever {
    /// Index every navigation context, the app description and each key
    /// feature of `app_context`
    pub fn new(app_context: &AppContext, encoder: Arc<dyn Encoder>, top_k: usize) -> Result<Self> {
        let mut store = VectorStore::new(encoder.dimension());

        for nav in &app_context.navigation_contexts {
            let text = navigation_document(nav);
            store.add(
                encoder.encode(&text),
                object(json!({
                    "type": DOC_TYPE_NAVIGATION,
                    "route": nav.route,
                    "title": nav.title,
                    "description": nav.description,
                })),
            )?;
        }

        if let Some(meta) = &app_context.meta {
            let app_description = format!("{} - {}", meta.app_name, meta.app_description);
            store.add(
                encoder.encode(&app_description),
                object(json!({ "type": DOC_TYPE_META, "content": app_description })),
            )?;

            for feature in &meta.key_features {
                store.add(
                    encoder.encode(feature),
                    object(json!({ "type": DOC_TYPE_FEATURE, "content": feature })),
                )?;
            }
        }

        info!("Context index built with {} documents", store.len());
        Ok(Self {
            store,
            encoder,
            top_k,
        })
    }

    /// Use a previously saved index instead of rebuilding it
    pub fn from_index_file<P: AsRef<Path>>(
        path: P,
        encoder: Arc<dyn Encoder>,
        top_k: usize,
    ) -> Result<Self> {
        let store = VectorStore::from_file(path)?;
        if store.dimension() != encoder.dimension() {
            return Err(AiMitraError::DimensionMismatch {
                expected: encoder.dimension(),
                actual: store.dimension(),
            });
        }
        Ok(Self {
            store,
            encoder,
            top_k,
        })
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    /// Metadata of the `top_k` documents closest to `query`
    pub fn get_relevant_context(&self, query: &str, top_k: usize) -> Result<Vec<Metadata>> {
        let query_vector = self.encoder.encode(query);
        let hits = self.store.search(&query_vector, top_k)?;
        Ok(hits.into_iter().map(|hit| hit.metadata).collect())
    }

    /// `query` followed by a bullet list of the relevant navigation routes,
    /// or `query` unchanged when none were retrieved
    pub fn enhance_query_with_context(&self, query: &str) -> Result<String> {
        let routes: Vec<String> = self
            .get_relevant_context(query, self.top_k)?
            .iter()
            .filter(|ctx| ctx.get("type").and_then(Value::as_str) == Some(DOC_TYPE_NAVIGATION))
            .filter_map(|ctx| {
                let route = ctx.get("route").and_then(Value::as_str)?;
                let title = ctx.get("title").and_then(Value::as_str).unwrap_or_default();
                let description = ctx
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                Some(format!("- {route}: {title} - {description}"))
            })
            .collect();

        if routes.is_empty() {
            return Ok(query.to_string());
        }

        debug!("Enhanced query with {} navigation routes", routes.len());
        Ok(format!("{query}\n\nRelevant app features:\n{}", routes.join("\n")))
    }
}

/// Title, description, sample questions and user needs as one text blob
fn navigation_document(nav: &NavigationContext) -> String {
    let mut text = format!("{}. {}.", nav.title, nav.description);
    if !nav.sample_questions.is_empty() {
        text.push_str(" Sample questions: ");
        text.push_str(&nav.sample_questions.join(" "));
    }
    if !nav.user_needs.is_empty() {
        text.push_str(" User needs: ");
        text.push_str(&nav.user_needs.join(" "));
    }
    text
}

fn object(value: Value) -> Metadata {
    match value {
        Value::Object(map) => map,
        _ => Metadata::new(),
    }
}
