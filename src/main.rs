//! edge-allowlist
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────── EDGE ────────────────────────┐
//!   Viewer request   │  ┌─────────────┐   ┌──────────────┐   ┌───────────┐  │
//!   ─────────────────┼─▶│ request id  │──▶│ edge filter  │──▶│ forwarder │──┼──┐
//!                    │  │ + trace     │   │ (allowlist)  │   │           │  │  │
//!                    │  └─────────────┘   └──────┬───────┘   └───────────┘  │  │
//!                    │                           │ get("allowIps")          │  │
//!                    │                    ┌──────▼───────┐                  │  │
//!   403 Forbidden ◀──┼────── deny ────────│    store     │                  │  │
//!                    │                    └──────────────┘                  │  │
//!                    └──────────────────────────────────────────────────────┘  │
//!                                                       x-client-ip: <viewer>  │
//!                    ┌──────────────────────── ORIGIN ──────────────────────┐  │
//!   {"ip": ...}  ◀───┼──────────────── GET /api/getClientIp ◀───────────────┼──┘
//!                    └──────────────────────────────────────────────────────┘
//! ```

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use edge_allowlist::config::{self, watcher::AllowlistWatcher, AppConfig};
use edge_allowlist::lifecycle::Shutdown;
use edge_allowlist::observability::{logging, metrics};
use edge_allowlist::store::{self, ImportDocument};
use edge_allowlist::{EdgeServer, OriginServer};

type BoxError = Box<dyn std::error::Error>;

#[derive(Parser)]
#[command(name = "edge-allowlist", version)]
#[command(about = "IP allowlist edge filter and client IP echo origin", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "EDGE_ALLOWLIST_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the viewer-facing edge server
    Edge,
    /// Run the origin echo server
    Origin,
    /// Run edge and origin in one process
    All,
    /// Print a store import document for an allowlist
    Import {
        /// Comma-separated IP addresses.
        #[arg(long, env = "ALLOW_IPS", value_delimiter = ',')]
        ips: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();

    if let Commands::Import { ips } = &cli.command {
        return print_import_document(ips);
    }

    let config = config::load_or_default(cli.config.as_deref())?;
    logging::init_logging(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "edge-allowlist starting");

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    match cli.command {
        Commands::Edge => run_edge(&config, &shutdown).await?,
        Commands::Origin => run_origin(&config, &shutdown).await?,
        Commands::All => {
            tokio::try_join!(run_origin(&config, &shutdown), run_edge(&config, &shutdown))?;
        }
        Commands::Import { .. } => {}
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn run_edge(config: &AppConfig, shutdown: &Shutdown) -> Result<(), BoxError> {
    let (store, file_store) = store::from_config(&config.store)?;

    // Dropping the watcher stops reloads, so it lives until the server returns.
    let _watcher = match file_store {
        Some(file_store) if config.store.watch => Some(AllowlistWatcher::new(file_store).run()?),
        _ => None,
    };

    let server = EdgeServer::new(config.clone(), store)?;
    let listener = TcpListener::bind(&config.edge.bind_address).await?;
    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}

async fn run_origin(config: &AppConfig, shutdown: &Shutdown) -> Result<(), BoxError> {
    let server = OriginServer::new(config);
    let listener = TcpListener::bind(&config.origin.bind_address).await?;
    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}

fn print_import_document(ips: &[String]) -> Result<(), BoxError> {
    for ip in ips.iter().map(|ip| ip.trim()).filter(|ip| !ip.is_empty()) {
        ip.parse::<IpAddr>()
            .map_err(|e| format!("invalid IP address {:?}: {}", ip, e))?;
    }
    println!("{}", ImportDocument::allowlist(ips).to_json()?);
    Ok(())
}
