//! Logging configuration for ai-mitra

use std::path::Path;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;

use crate::config::AppConfig;
use crate::AiMitraError;
use crate::Result;

const LOG_FILE_PREFIX: &str = "ai-mitra.log";

/// Initialize logging with configuration
pub fn init_logging_with_config(config: &AppConfig) -> Result<()> {
    let level = &config.logging.level;
    let env_filter = EnvFilter::new(format!("{level},ai_mitra={level}"));
    let directory = config
        .logging
        .file_output
        .then(|| Path::new(&config.logging.directory));
    install(env_filter, directory)?;

    tracing::info!("Logging initialized with level: {}", level);
    if config.logging.file_output {
        tracing::info!(
            "Log files will be saved to: {}/{}.YYYY-MM-DD",
            config.logging.directory,
            LOG_FILE_PREFIX
        );
    }
    Ok(())
}

/// Initialize logging with custom log level
pub fn init_logging_with_level(level: &str) -> Result<()> {
    let env_filter = EnvFilter::new(format!("{level},ai_mitra={level}"));
    install(env_filter, Some(Path::new("logs")))?;

    tracing::info!("Logging initialized with level: {}", level);
    Ok(())
}

/// Initialize simple logging for testing and one-shot commands
pub fn init_simple_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(true)
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AiMitraError::Custom(format!("Failed to initialize logging: {e}")))?;

    tracing::info!("Simple logging initialized");
    Ok(())
}

fn install(env_filter: EnvFilter, directory: Option<&Path>) -> Result<()> {
    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);

    let file_layer = match directory {
        Some(dir) => {
            if !dir.exists() {
                std::fs::create_dir_all(dir)?;
            }
            let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            // The writer must outlive every span, so the guard lives until exit.
            std::mem::forget(guard);

            Some(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_writer(non_blocking)
                    .with_ansi(false),
            )
        }
        None => None,
    };

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| AiMitraError::Custom(format!("Failed to initialize logging: {e}")))
}
