use std::path::PathBuf;

use alloy::primitives::Address;
use clap::{Parser, ValueEnum};
use url::Url;

use crate::{
    constants::{DEFAULT_ABI_PATH, DEFAULT_BATCH_SIZE, DEFAULT_OUT_DIR, ETH_RPC_URL_ENV},
    error::ConfigError,
    network::{NetworkConfig, NetworkPreset, Overrides},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Snapshot the live gauges of a gauge registry into a weekly JSON file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Deployment supplying default contract addresses
    #[arg(long, value_enum, default_value_t = NetworkPreset::Ethereum)]
    pub network: NetworkPreset,

    /// JSON-RPC endpoint of the home network
    #[arg(long, env = ETH_RPC_URL_ENV, value_name = "URL")]
    pub rpc_url: Option<Url>,

    /// Gauge registry (GaugeController) address
    #[arg(long, value_name = "ADDRESS")]
    pub registry: Option<Address>,

    /// Distributor tracking killed gauges
    #[arg(long, value_name = "ADDRESS")]
    pub distributor: Option<Address>,

    /// CCIP sender holding root gauge destinations; enables cross-chain labels
    #[arg(long, value_name = "ADDRESS")]
    pub sender: Option<Address>,

    /// Chain id the RPC endpoint must serve
    #[arg(long)]
    pub home_chain_id: Option<u64>,

    /// Also write gauge_choices-latest.json
    #[arg(long)]
    pub write_latest: bool,

    /// Interface descriptor of the gauge registry
    #[arg(long, value_name = "FILE", default_value = DEFAULT_ABI_PATH)]
    pub abi: PathBuf,

    /// Directory receiving the snapshot files
    #[arg(long, value_name = "DIR", default_value = DEFAULT_OUT_DIR)]
    pub out_dir: PathBuf,

    /// Block to read at, defaults to the current head
    #[arg(long)]
    pub block: Option<u64>,

    /// Maximum number of calls per multicall round trip
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Print the snapshot instead of writing it
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Cli {
    pub fn network_config(&self) -> Result<NetworkConfig, ConfigError> {
        self.network.resolve(&Overrides {
            registry: self.registry,
            distributor: self.distributor,
            sender: self.sender,
            home_chain_id: self.home_chain_id,
            write_latest: self.write_latest,
        })
    }

    pub fn rpc_url(&self) -> Result<Url, ConfigError> {
        self.rpc_url
            .clone()
            .ok_or(ConfigError::MissingRpcUrl(ETH_RPC_URL_ENV))
    }

    pub fn batch_size(&self) -> Result<usize, ConfigError> {
        match self.batch_size {
            0 => Err(ConfigError::ZeroBatchSize),
            size => Ok(size),
        }
    }
}
