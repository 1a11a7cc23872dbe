//! Hamada Tool server binary
//!
//! Run with: cargo run -p hamada-tool --bin hamada-tool-server

use clap::Parser;
use hamada_tool::{config::HamadaConfig, server::HamadaServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "hamada-tool-server", version, about = "Tender processing server")]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "HAMADA_CONFIG")]
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
                .unwrap_or_else(|_| "hamada_tool=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                        Hamada Tool                        ║
║        Tender Reading & Supplier Quotation Service        ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    let mut config = HamadaConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("  - Suppliers: {}", config.storage.suppliers_csv.display());
    tracing::info!("  - Orders: {}", config.storage.orders_csv.display());
    tracing::info!("  - Activity DB: {}", config.storage.database_path.display());
    tracing::info!("  - Supplier buffer: {} days", config.deadlines.buffer_days);

    let server = HamadaServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/documents/parse  - Upload a tender document");
    println!("  GET  /api/suppliers        - Browse the supplier registry");
    println!("  POST /api/emails/generate  - Draft quotation requests");
    println!("  POST /api/deadlines/calculate - Supplier deadline");
    println!("  GET  /api/orders           - Tracked orders");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
