//! pollwatch - HTTP endpoint liveness poller.
//!
//! Probes every configured target on a fixed cycle and serves the aggregated
//! latest results as a status page.

mod config;
mod probe;
mod registry;
mod scheduler;
mod status;
mod store;
mod web;

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::RwLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use scheduler::Scheduler;
use store::ResultStore;
use web::{AppState, Server};

/// Command-line options.
#[derive(Parser, Debug)]
#[command(name = "pollwatch", about = "HTTP endpoint liveness poller")]
struct Cli {
    /// Config filename
    #[arg(short = 'c', long = "config", default_value = "config.json")]
    config: PathBuf,

    /// Requests filename
    #[arg(short = 'r', long = "requests")]
    requests: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pollwatch=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let Some(requests_path) = cli.requests else {
        eprintln!("missing required flag -r <requests filename>");
        process::exit(1);
    };

    // Load configuration; any failure here is fatal.
    let cfg = Config::load(&cli.config)?;
    let targets = registry::load_targets(&requests_path)?;
    tracing::info!(
        "Loaded {} targets from {}",
        targets.len(),
        requests_path.display()
    );

    let domains = Arc::new(cfg.domain_map());
    let targets = Arc::new(RwLock::new(targets));
    let store = ResultStore::new();

    // Start the polling engine in the background.
    let scheduler = Arc::new(Scheduler::new(
        domains,
        targets.clone(),
        store.clone(),
        cfg.interval,
    )?);
    scheduler.start();

    // Serve the status page until killed.
    let state = AppState {
        store,
        targets,
        requests_path,
    };
    let server = Server::new(cfg.site.clone(), state);
    server.start().await?;

    Ok(())
}
