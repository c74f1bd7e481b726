//! Edge Gateway
//!
//! An HTTP edge gateway in front of independently deployed backend services.
//! Each `/api/{service}/...` request is resolved to a live backend instance
//! through a service directory and forwarded, including long-lived
//! server-sent-event streams. A fixed pipeline (recovery, access logging,
//! CORS, bearer-token auth) wraps every request.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use edge_gateway::config::{load_config, GatewayConfig};
use edge_gateway::lifecycle::signals;
use edge_gateway::{observability, GatewayServer, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "edge-gateway", about = "Dynamic routing edge gateway")]
struct Args {
    /// Path to the YAML configuration file.
    #[arg(long, default_value = "gateway.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let config = if args.config.exists() {
        load_config(&args.config)?
    } else {
        GatewayConfig::default()
    };

    observability::logging::init(&config.observability);

    if !args.config.exists() {
        tracing::warn!(path = %args.config.display(), "config file not found, using defaults");
    }

    tracing::info!(
        bind_address = %config.server.bind_address,
        directory = %config.directory.address,
        api_prefix = %config.routing.api_prefix,
        auth_enabled = config.auth.enabled,
        "configuration loaded"
    );

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    let server = GatewayServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
