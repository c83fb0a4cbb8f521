use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use pumice::config::{Config, VisionBackend};
use pumice::profanity::matcher;
use pumice::profanity::store::TermList;
use pumice::vision::claude::ClaudeAnalyzer;
use pumice::vision::google::GeminiAnalyzer;
use pumice::vision::traits::VisionAnalyzer;

/// Pumice: AI-assisted image moderation gateway.
///
/// Accepts base64-encoded images over HTTP, extracts visible text via a
/// pluggable vision provider, screens it against a profanity list, and
/// returns a combined pass/fail verdict with a copyright-risk assessment.
#[derive(Parser)]
#[command(name = "pumice", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the moderation API server
    Serve {
        /// Port to listen on (defaults to the PORT env var, then 8080)
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind (default: 0.0.0.0)
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
    },

    /// Scan a piece of text against the profanity list and exit
    Check {
        /// The text to scan
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pumice=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            // Provider selection and credentials are checked here, once —
            // a misconfigured provider must never surface as a 502 later.
            config.require_vision()?;

            let terms = Arc::new(TermList::load(&config.terms_path)?);
            let vision = create_analyzer(&config);

            let port = port.unwrap_or(config.port);
            pumice::web::run_server(config, terms, vision, port, &bind).await?;
        }

        Commands::Check { text } => {
            let config = Config::load()?;
            let terms = TermList::load(&config.terms_path)?;

            let result = matcher::check(&terms, Some(&text));
            if result.flagged {
                println!(
                    "{} {}",
                    "flagged:".red().bold(),
                    result.matches.join(", ")
                );
            } else {
                println!("{}", "clean".green());
            }
        }
    }

    Ok(())
}

/// Create a vision analyzer based on the configured backend.
fn create_analyzer(config: &Config) -> Arc<dyn VisionAnalyzer> {
    match config.vision_backend {
        VisionBackend::Claude => {
            info!("Using Claude vision provider");
            Arc::new(ClaudeAnalyzer::new(config.anthropic_api_key.clone()))
        }
        VisionBackend::Google => {
            info!("Using Gemini vision provider");
            Arc::new(GeminiAnalyzer::new(config.google_api_key.clone()))
        }
    }
}
