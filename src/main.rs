//! OpenSASE PhishGuard - Main Entry Point

use clap::{Parser, Subcommand};
use phishguard::{build_router, AppState, FeatureVector, InferenceEngine, ServerConfig, UrlClassifier};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "phishguard-server")]
#[command(version)]
#[command(about = "Lexical URL phishing classifier", long_about = None)]
struct Cli {
    /// Config file (JSON)
    #[arg(long, short, env = "PHISHGUARD_CONFIG", default_value = phishguard::config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Listen address, overrides the config file
    #[arg(long, env = "PHISHGUARD_BIND")]
    bind: Option<SocketAddr>,

    /// Model artifact, overrides the config file
    #[arg(long, env = "PHISHGUARD_MODEL")]
    model: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API (default)
    Serve,
    /// Print the feature vector of each URL as a JSON line
    Extract {
        /// URLs to extract
        #[arg(required = true)]
        urls: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Extract { urls } => {
            for url in urls {
                let line = serde_json::json!({
                    "url": url,
                    "features": FeatureVector::from_url(&url),
                });
                println!("{}", line);
            }
            Ok(())
        }
        Commands::Serve => {
            tracing::info!("OpenSASE PhishGuard v{}", env!("CARGO_PKG_VERSION"));

            let config = ServerConfig::load_or_default(&cli.config)?
                .with_overrides(cli.bind, cli.model);

            let classifier = UrlClassifier::load(&config.model_path).map_err(|e| {
                tracing::error!(path = %config.model_path.display(), error = %e, "Model load failed");
                e
            })?;
            let state = Arc::new(AppState::new(InferenceEngine::new(classifier)));
            let app = build_router(state, config.cors_permissive);

            let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
            tracing::info!("PhishGuard API listening on {}", config.bind_addr);
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            tracing::info!("PhishGuard stopped");
            Ok(())
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
    }
}
