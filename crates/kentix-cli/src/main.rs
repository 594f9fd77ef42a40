//! Command-line interface for the Kentix connector.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kentix_api::ServerState;
use kentix_collector::{Collector, HttpAssetPlatform, PollScheduler};
use kentix_core::config::{self, defaults, env_vars};
use kentix_core::{ConfigStore, DeviceTypeTable};
use kentix_devices::HttpDeviceClient;
use kentix_storage::{seed_defaults, MemoryConfigStore, RedbConfigStore};
use tokio::sync::watch;

/// Kentix connector - poll Kentix gateways and forward their readings.
#[derive(Parser, Debug)]
#[command(name = "kentix")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Action to perform.
    #[command(subcommand)]
    command: Command,

    /// Directory holding the configuration store.
    #[arg(long, global = true, env = env_vars::DATA_DIR, default_value = defaults::DATA_DIR)]
    data_dir: PathBuf,

    /// Keep configurations in memory instead of on disk.
    #[arg(long, global = true)]
    memory: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Run the poll scheduler and the admin API.
    Serve {
        /// Host to bind the admin API to.
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        /// Admin API port.
        #[arg(short, long, env = env_vars::API_SERVER_PORT, default_value_t = defaults::API_SERVER_PORT)]
        port: u16,
        /// Device type table, e.g. `1=access-point,8=alarm-manager,110=multi-sensor`.
        #[arg(long, env = env_vars::DEVICE_TYPES)]
        device_types: Option<String>,
    },
    /// List stored configurations.
    Configs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let store = open_store(&args.data_dir, args.memory)?;

    match args.command {
        Command::Serve {
            host,
            port,
            device_types,
        } => run_serve(store, &host, port, device_types.as_deref()).await,
        Command::Configs => list_configs(store.as_ref()),
    }
}

/// Configure the global tracing subscriber.
fn init_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(defaults::LOG_FILTER));

    if config::log_json() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .compact()
            .init();
    }
}

fn open_store(data_dir: &Path, memory: bool) -> Result<Arc<dyn ConfigStore>> {
    if memory {
        tracing::info!("Using in-memory configuration store");
        return Ok(Arc::new(MemoryConfigStore::new()));
    }

    let path = data_dir.join(defaults::STORE_FILE);
    let store: Arc<dyn ConfigStore> = RedbConfigStore::open(&path)
        .with_context(|| format!("Failed to open store at {}", path.display()))?;
    tracing::info!(path = %path.display(), "Opened configuration store");
    Ok(store)
}

fn device_type_table(spec: Option<&str>) -> Result<DeviceTypeTable> {
    match spec {
        Some(spec) if !spec.trim().is_empty() => spec
            .parse()
            .with_context(|| format!("Invalid device type table '{}'", spec)),
        _ => Ok(DeviceTypeTable::default()),
    }
}

/// Run the scheduler and the admin API until Ctrl+C or SIGTERM.
async fn run_serve(
    store: Arc<dyn ConfigStore>,
    host: &str,
    port: u16,
    device_types: Option<&str>,
) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid address: {}:{}", host, port))?;

    let seeded = seed_defaults(store.as_ref()).context("Failed to seed default configurations")?;
    if seeded > 0 {
        tracing::info!(count = seeded, "Seeded default configurations");
    }

    let devices = Arc::new(HttpDeviceClient::with_device_types(device_type_table(
        device_types,
    )?));
    let platform = Arc::new(HttpAssetPlatform::from_env());
    tracing::info!(endpoint = platform.endpoint(), "Forwarding to platform");

    let collector = Arc::new(Collector::new(store.clone(), devices, platform));
    let scheduler = Arc::new(PollScheduler::new(store.clone(), collector));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let scheduler_task = {
        let scheduler = scheduler.clone();
        let shutdown = shutdown_rx.clone();
        tokio::spawn(async move { scheduler.run(shutdown).await })
    };

    let mut api_shutdown = shutdown_rx;
    let mut server = tokio::spawn(kentix_api::run(ServerState::new(store), addr, async move {
        let _ = api_shutdown.wait_for(|stop| *stop).await;
    }));

    let server_result = tokio::select! {
        _ = kentix_api::shutdown::shutdown_signal() => None,
        result = &mut server => Some(result),
    };

    let _ = shutdown_tx.send(true);
    let server_result = match server_result {
        Some(result) => result,
        None => server.await,
    };
    if let Err(e) = scheduler_task.await {
        tracing::warn!(error = %e, "Scheduler task ended abnormally");
    }

    match scheduler.lifecycle().deactivate_all() {
        Ok(count) => tracing::info!(count, "Deactivated configurations"),
        Err(e) => tracing::error!(error = %e, "Failed to deactivate configurations"),
    }

    server_result??;
    tracing::info!("Shutdown complete");
    Ok(())
}

fn list_configs(store: &dyn ConfigStore) -> Result<()> {
    let configs = store.list_configurations()?;
    if configs.is_empty() {
        println!("No configurations stored.");
        return Ok(());
    }

    for config in configs {
        println!(
            "{}\t{}\t{}\trefresh={}s\tprojects=[{}]",
            config.id.map(|id| id.to_string()).unwrap_or_default(),
            config.state(),
            config.address,
            config.refresh_interval,
            config.project_ids().join(",")
        );
    }
    Ok(())
}
