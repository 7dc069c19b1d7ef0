//! CLI output formatting utilities

use serde_json::Value;

use crate::chat::ChatResponse;
use crate::rag::Metadata;
use crate::AppConfig;

/// Truncate at a character boundary, appending "..." when shortened
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

fn join_or_dash(values: &[String]) -> String {
    if values.is_empty() {
        "-".to_string()
    } else {
        values.join(", ")
    }
}

/// Print a chat answer with its tags and suggestions
pub fn print_chat_response(response: &ChatResponse) {
    if let Some(error) = &response.error {
        println!("❌ Upstream error: {error}");
        println!();
    }

    println!("💬 {}", response.message);
    println!();
    println!(
        "🌐 Language: {} (detected: {})",
        response.language,
        response.source_language.as_deref().unwrap_or("-")
    );
    println!("🏷️  Tags:");
    println!("  Crops: {}", join_or_dash(&response.tags.crops));
    println!("  City: {}", response.tags.city.as_deref().unwrap_or("-"));
    println!("  Topics: {}", join_or_dash(&response.tags.topics));
    println!("  Issues: {}", join_or_dash(&response.tags.issues));
    println!("  Seasons: {}", join_or_dash(&response.tags.seasons));
    println!("🧭 Navigations: {}", response.navigations.join(", "));
}

/// Print per-route scores followed by the final suggestion list
pub fn print_navigation(scores: &[(String, u32)], suggestions: &[String]) {
    println!("📊 Route scores:");
    for (route, score) in scores {
        println!("  {score:>3}  {route}");
    }
    println!();
    println!("🧭 Suggested: {}", suggestions.join(", "));
}

/// Print retrieved context documents
pub fn print_context(results: &[Metadata]) {
    println!("🔍 Found {} documents:", results.len());
    for (i, metadata) in results.iter().enumerate() {
        let kind = metadata.get("type").and_then(Value::as_str).unwrap_or("?");
        let summary = match metadata.get("route").and_then(Value::as_str) {
            Some(route) => {
                let title = metadata.get("title").and_then(Value::as_str).unwrap_or("");
                format!("{route} ({title})")
            }
            None => metadata
                .get("content")
                .and_then(Value::as_str)
                .map(|c| truncate_str(c, 80))
                .unwrap_or_default(),
        };
        println!("  {}. [{kind}] {summary}", i + 1);
    }
}

/// Print configuration. Pass a redacted copy to hide the API key.
pub fn print_config(config: &AppConfig) {
    println!("📋 CropConnect Assistant Configuration:");
    println!();

    println!("🌐 Server:");
    println!("  Bind address: {}", config.bind_address());
    println!("  CORS: {}", config.server.enable_cors);
    println!();

    println!("📝 Logging:");
    println!("  Level: {}", config.logging.level);
    println!("  File output: {}", config.logging.file_output);
    println!("  Directory: {}", config.logging.directory);
    println!();

    println!("🤖 LLM:");
    println!("  Endpoint: {}", config.llm_endpoint());
    println!("  Model: {}", config.llm_model());
    println!("  API key: {}", config.llm.api_key);
    println!("  Max tokens: {}", config.llm.max_tokens);
    println!("  Temperature: {}", config.llm.temperature);
    println!("  Timeout: {}s", config.llm.timeout_secs);
    println!();

    println!("🧠 Embeddings:");
    println!("  Dimension: {}", config.embedding_dimension());
    println!("  Model: {}", config.embeddings.model);
    println!();

    println!("🧭 Navigation:");
    println!("  Context file: {}", config.navigation.context_path.display());
    println!("  Routes in prompt: {}", config.navigation.max_prompt_routes);
    println!();

    println!("💬 Chat:");
    println!("  History limit: {}", config.chat.history_limit);
    println!("  Default language: {}", config.default_language());
    println!();

    println!("🔍 RAG:");
    println!("  Top k: {}", config.rag.top_k);
    println!("  Enhance queries: {}", config.rag.enhance_queries);
    match &config.rag.index_path {
        Some(path) => println!("  Index file: {}", path.display()),
        None => println!("  Index file: (built at startup)"),
    }
}
