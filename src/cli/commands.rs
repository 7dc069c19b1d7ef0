//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(name = "ai-mitra")]
#[command(about = "CropConnect farming assistant: chat API server and local diagnostics")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (default: from config)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to (default: from config)
        #[arg(short, long)]
        port: Option<u16>,
        /// Disable the permissive CORS layer
        #[arg(long)]
        no_cors: bool,
    },
    /// Send one message through the full chat pipeline
    Ask {
        /// The farmer's message
        message: String,
        /// Response language code (default: detected)
        #[arg(short, long)]
        language: Option<String>,
        /// User id for conversation history
        #[arg(short, long)]
        user_id: Option<String>,
    },
    /// Score navigation routes for a message without calling the model
    Navigate {
        /// Message text
        message: String,
        /// Crops (comma-separated)
        #[arg(long, value_delimiter = ',')]
        crops: Vec<String>,
        /// City or location
        #[arg(long)]
        city: Option<String>,
        /// Topics (comma-separated)
        #[arg(long, value_delimiter = ',')]
        topics: Vec<String>,
        /// Issues (comma-separated)
        #[arg(long, value_delimiter = ',')]
        issues: Vec<String>,
    },
    /// Detect the language of a text
    Detect {
        /// Text to classify
        text: String,
    },
    /// Show the app context most relevant to a query
    Context {
        /// Query text
        query: String,
        /// Number of documents to retrieve (default: from config)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },
    /// Build the context index and save it to a file
    Index {
        /// Output path for the vector store
        output: PathBuf,
    },
    /// Show current configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_navigate_lists() {
        let cli = Cli::try_parse_from([
            "ai-mitra",
            "navigate",
            "my wheat has a problem",
            "--crops",
            "wheat,rice",
            "--city",
            "Pune",
        ])
        .unwrap();

        match cli.command {
            Commands::Navigate {
                message,
                crops,
                city,
                topics,
                ..
            } => {
                assert_eq!(message, "my wheat has a problem");
                assert_eq!(crops, vec!["wheat", "rice"]);
                assert_eq!(city.as_deref(), Some("Pune"));
                assert!(topics.is_empty());
            }
            _ => panic!("expected navigate command"),
        }
    }

    #[test]
    fn test_parse_serve_and_verbose() {
        let cli = Cli::try_parse_from(["ai-mitra", "-v", "serve", "--port", "9000", "--no-cors"])
            .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Serve {
                host,
                port,
                no_cors,
            } => {
                assert!(host.is_none());
                assert_eq!(port, Some(9000));
                assert!(no_cors);
            }
            _ => panic!("expected serve command"),
        }
    }
}
