//! AEDCO One Platform server binary
//!
//! Run with: cargo run -p aedco-newsletter --bin aedco-newsletter-server

use aedco_newsletter::{config::NewsletterConfig, server::NewsletterServer};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "aedco-newsletter-server", version, about = "Sector newsletter generation server")]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "AEDCO_CONFIG")]
    config: Option<PathBuf>,

    /// Bind address (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aedco_newsletter=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                   AEDCO One Platform                      ║
║          Weekly Sector Newsletters (HTML editions)        ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    let mut config = NewsletterConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Configuration loaded ({})", config.environment);
    tracing::info!("  - Model: {}", config.openai.model);
    tracing::info!("  - Timezone: {}", config.timezone);
    tracing::info!("  - Runs: {}", config.storage.runs_dir.display());
    if config.openai.api_key.is_empty() {
        tracing::warn!("OPENAI_API_KEY is not set; generation requests will fail");
    }

    let server = NewsletterServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/generate                     - Generate a sector newsletter");
    println!("  GET  /api/sectors                      - Available sectors");
    println!("  POST /api/upload-past-issue            - Upload a past issue");
    println!("  GET  /api/download-run/:sector/:date   - Download a run as ZIP");
    println!("  GET  /api/run-status/:sector/:date     - Run manifest");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
