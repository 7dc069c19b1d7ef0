use ai_mitra::cli::run_command;
use ai_mitra::cli::Cli;
use ai_mitra::config::AppConfig;
use ai_mitra::Result;
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    if cli.verbose {
        ai_mitra::logging::init_logging_with_level("debug")?;
    } else {
        ai_mitra::logging::init_logging_with_config(&config)?;
    }
    info!("Configuration loaded successfully");

    run_command(cli.command, &config).await
}
