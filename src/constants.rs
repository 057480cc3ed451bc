use alloy::primitives::{Address, address};

pub const MULTICALL3_ADDRESS: Address = address!("cA11bde05977b3631167028862bE2a173976CA11");
pub const ETH_RPC_URL_ENV: &str = "ETH_RPC_URL";

pub const ETHEREUM_CHAIN_ID: u64 = 1;
pub const ARBITRUM_CHAIN_ID: u64 = 42161;
pub const POLYGON_CHAIN_ID: u64 = 137;

// CCIP chain selectors
pub const ARBITRUM_SELECTOR: u64 = 4949039107694359620;
pub const POLYGON_SELECTOR: u64 = 4051577828743386545;

// Ethereum mainnet deployments
pub const GAUGE_CONTROLLER_ADDRESS: Address = address!("3C56A223fE8F61269E25eF1116f9f185074c6C44");
pub const DFX_DISTRIBUTOR_ADDRESS: Address = address!("86E8C4e7549fBCa7eba1AefBdBc23993F721e5CA");

pub const DEFAULT_ABI_PATH: &str = "./tasks/abi/GaugeController.json";
pub const DEFAULT_OUT_DIR: &str = "./snapshots";
pub const DEFAULT_BATCH_SIZE: usize = 500;
// Upper bound on registry size, far above any real deployment
pub const MAX_GAUGES: usize = 10_000;

pub const WEEK_SECONDS: u64 = 7 * 24 * 60 * 60;
