//! CLI command handlers

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::api::serve_api;
use crate::chat::ChatbotService;
use crate::cli::commands::Commands;
use crate::cli::output::*;
use crate::embeddings::Encoder;
use crate::embeddings::MockEncoder;
use crate::language::LanguageService;
use crate::models::AppContext;
use crate::models::Tags;
use crate::navigation::NavigationService;
use crate::rag::ContextRetriever;
use crate::AppConfig;
use crate::Result;

/// Dispatch a parsed command
pub async fn run_command(command: Commands, config: &AppConfig) -> Result<()> {
    match command {
        Commands::Serve {
            host,
            port,
            no_cors,
        } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let cors = config.server.enable_cors && !no_cors;
            handle_serve(config, host, port, cors).await
        }
        Commands::Ask {
            message,
            language,
            user_id,
        } => handle_ask(config, &message, language.as_deref(), user_id.as_deref()).await,
        Commands::Navigate {
            message,
            crops,
            city,
            topics,
            issues,
        } => {
            let tags = Tags {
                crops,
                city,
                topics,
                issues,
                ..Tags::default()
            };
            handle_navigate(config, &message, &tags)
        }
        Commands::Detect { text } => handle_detect(config, &text),
        Commands::Context { query, top_k } => {
            handle_context(config, &query, top_k.unwrap_or(config.rag.top_k))
        }
        Commands::Index { output } => handle_index(config, &output),
        Commands::Config => {
            print_config(&config.redacted());
            Ok(())
        }
    }
}

pub async fn handle_serve(config: &AppConfig, host: String, port: u16, cors: bool) -> Result<()> {
    println!("🚀 Starting CropConnect Assistant API Server");
    println!("============================================\n");
    println!("📍 Host: {host}");
    println!("🔌 Port: {port}");
    println!("🌐 CORS: {}", if cors { "Enabled" } else { "Disabled" });
    println!();

    serve_api(config, host, port, cors).await
}

pub async fn handle_ask(
    config: &AppConfig,
    message: &str,
    language: Option<&str>,
    user_id: Option<&str>,
) -> Result<()> {
    let chatbot = ChatbotService::from_config(config)?;
    let response = chatbot.process_message(message, language, user_id).await;
    print_chat_response(&response);
    Ok(())
}

pub fn handle_navigate(config: &AppConfig, message: &str, tags: &Tags) -> Result<()> {
    let app_context = AppContext::load_or_empty(&config.navigation.context_path);
    let navigation = NavigationService::new(&app_context)?;

    let scores = navigation.score_routes(message, tags);
    let suggestions = navigation.suggest_navigations(message, tags);
    print_navigation(&scores, &suggestions);
    Ok(())
}

pub fn handle_detect(config: &AppConfig, text: &str) -> Result<()> {
    let language = LanguageService::new(config.default_language())?;
    let code = language.detect_language(text);

    println!(
        "🌐 Detected: {} ({})",
        code,
        LanguageService::language_name(&code)
    );
    let cleaned = language.clean_language_prefix(text);
    if cleaned != text {
        println!("✂️  Without prefix: {cleaned}");
    }
    Ok(())
}

pub fn handle_context(config: &AppConfig, query: &str, top_k: usize) -> Result<()> {
    let retriever = build_retriever(config)?;
    let results = retriever.get_relevant_context(query, top_k)?;
    print_context(&results);
    Ok(())
}

pub fn handle_index(config: &AppConfig, output: &Path) -> Result<()> {
    let retriever = build_retriever(config)?;
    retriever.store().save(output)?;

    info!(
        "Saved {} documents to {}",
        retriever.store().len(),
        output.display()
    );
    println!(
        "✅ Indexed {} documents (dimension {}) into {}",
        retriever.store().len(),
        retriever.store().dimension(),
        output.display()
    );
    Ok(())
}

fn build_retriever(config: &AppConfig) -> Result<ContextRetriever> {
    let app_context = AppContext::load_or_empty(&config.navigation.context_path);
    let encoder: Arc<dyn Encoder> = Arc::new(MockEncoder::with_model_name(
        config.embedding_dimension(),
        config.embeddings.model.clone(),
    ));
    ContextRetriever::new(&app_context, encoder, config.rag.top_k)
}
