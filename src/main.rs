use std::{env, io};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod abi;
mod cli;
mod client;
mod constants;
mod contract;
mod error;
mod multicall;
mod network;
mod pipeline;
mod snapshot;
#[cfg(test)]
mod testing;

use cli::{Cli, LogFormat};
use contract::load_contract;
use pipeline::{REGISTRY_FUNCTIONS, SnapshotPipeline};

fn init_logging(format: LogFormat) -> Result<()> {
    const LOG_CONFIGURATION_ENVVAR: &str = "RUST_LOG";

    let filter = EnvFilter::new(
        env::var(LOG_CONFIGURATION_ENVVAR)
            .as_deref()
            .unwrap_or("info"),
    );

    let subscriber = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(true)
        .with_env_filter(filter);

    match format {
        LogFormat::Json => subscriber.json().try_init(),
        LogFormat::Text => subscriber.try_init(),
    }
    .map_err(|err| anyhow!(err))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format)?;

    let config = cli.network_config()?;
    let batch_size = cli.batch_size()?;
    info!(network = cli.network.name(), ?config, "Starting gauge snapshot");

    let registry = load_contract(config.registry, &cli.abi)?;
    registry.require(&REGISTRY_FUNCTIONS)?;

    let reader = client::connect(cli.rpc_url()?, config.home_chain_id, cli.block)
        .await
        .context("Failed to set up RPC client")?;

    let records = SnapshotPipeline::new(&reader, &config, &registry, batch_size)
        .run()
        .await
        .context(format!("Snapshot failed on {}", cli.network.name()))?;

    if cli.dry_run {
        let rendered = snapshot::render(&records)?;
        println!("{}", String::from_utf8_lossy(&rendered));
        return Ok(());
    }

    let epoch = snapshot::current_epoch()?;
    let paths = snapshot::write_snapshot(&cli.out_dir, epoch, &records, config.write_latest)
        .context("Failed to write snapshot")?;
    info!(epoch, files = paths.len(), gauges = records.len(), "Snapshot complete");

    Ok(())
}
