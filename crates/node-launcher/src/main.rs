//! # Quantum-Chain Node
//!
//! Entry point of the `qc-node` binary.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging (`QC_LOG_LEVEL`, default `info`)
//! 2. Parse options (command line, then `QC_*` environment variables)
//! 3. Validate and resolve the configuration; `--dumpconfig` stops here
//! 4. Read the password file for accounts to unlock
//! 5. Register and construct services for the selected sync mode
//! 6. Start services, wait for Ctrl+C, shut down in reverse order
//!
//! Any failure in steps 2-6 prints `Fatal: <reason>` and exits with status 1.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use node_launcher::accounts::UnlockPlan;
use node_launcher::adapters::StandbyBackend;
use node_launcher::options::cli;
use node_launcher::ports::ServiceBackend;
use node_launcher::{register_services, resolve_config, NodeRuntime, ServiceRegistry};

/// Environment variable holding the log filter.
const LOG_LEVEL_ENV: &str = "QC_LOG_LEVEL";

#[tokio::main]
async fn main() {
    if let Err(e) = init_logging() {
        eprintln!("Fatal: {e:#}");
        std::process::exit(1);
    }

    if let Err(e) = run().await {
        error!("{:#}", e);
        eprintln!("Fatal: {e:#}");
        std::process::exit(1);
    }
}

fn init_logging() -> Result<()> {
    let filter =
        EnvFilter::try_from_env(LOG_LEVEL_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install log subscriber")?;
    Ok(())
}

async fn run() -> Result<()> {
    let invocation = cli::parse();
    let config = resolve_config(&invocation.options).context("invalid configuration")?;

    if invocation.dump_config {
        print!("{}", config.to_toml().context("failed to render configuration")?);
        return Ok(());
    }

    let unlock = UnlockPlan::load(&config.accounts)?;
    for (index, account) in unlock.accounts().iter().enumerate() {
        info!(
            "Account {} queued for unlock (password {})",
            account,
            if unlock.password_for(index).is_some() {
                "from file"
            } else {
                "missing"
            }
        );
    }
    if !config.console.preload.is_empty() {
        info!("Console preloads: {:?}", config.console.preload);
    }

    let config = Arc::new(config);
    let backend: Arc<dyn ServiceBackend> = Arc::new(StandbyBackend);
    let mut registry = ServiceRegistry::new();
    register_services(&mut registry, backend, &config)?;
    let services = registry.construct_all(&config)?;

    let runtime = NodeRuntime::new(services);
    runtime.start().await?;

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;

    runtime.shutdown().await;
    Ok(())
}
