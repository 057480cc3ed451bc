use std::{io, path::PathBuf, time::SystemTimeError};

use alloy::{contract, primitives::Address, transports::TransportError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    BatchCall(#[from] BatchCallError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error("Failed to write snapshot {path:?}")]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize snapshot")]
    Serialize(#[from] serde_json::Error),

    #[error("System clock is set before the Unix epoch")]
    Clock(#[from] SystemTimeError),
}

/// Missing or invalid local configuration. Raised before any gauge is read.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No RPC endpoint configured, set `{0}` or pass --rpc-url")]
    MissingRpcUrl(&'static str),

    #[error("Network preset `{preset}` needs --{flag}")]
    MissingAddress {
        preset: &'static str,
        flag: &'static str,
    },

    #[error("Batch size must be at least 1")]
    ZeroBatchSize,

    #[error("Failed to read interface descriptor {path:?}")]
    DescriptorRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed interface descriptor {path:?}")]
    DescriptorParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Interface descriptor {path:?} has no function `{function}`")]
    MissingFunction { path: PathBuf, function: String },

    #[error("Failed to reach the RPC endpoint")]
    Connect(#[source] TransportError),

    #[error("RPC endpoint serves chain {actual}, expected {expected}")]
    ChainIdMismatch { expected: u64, actual: u64 },
}

/// A read against the chain failed as a whole.
#[derive(Debug, Error)]
pub enum BatchCallError {
    #[error("Duplicate result key `{0}` in batch")]
    DuplicateKey(String),

    #[error("Call to {target} failed")]
    Call {
        target: Address,
        #[source]
        source: TransportError,
    },

    #[error("Multicall execution of {calls} calls failed")]
    Aggregate {
        calls: usize,
        #[source]
        source: contract::Error,
    },

    #[error("Multicall returned {actual} results for {expected} calls")]
    ResultCount { expected: usize, actual: usize },

    #[error("Call `{key}` to {target} reverted")]
    Reverted { key: String, target: Address },
}

/// The chain answered, but with something the snapshot cannot use.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Failed to encode or decode `{function}`")]
    Abi {
        function: String,
        #[source]
        source: alloy::dyn_abi::Error,
    },

    #[error("Failed to decode result `{key}`")]
    Decode {
        key: String,
        #[source]
        source: alloy::sol_types::Error,
    },

    #[error("`{function}` returned an unexpected value: {value}")]
    UnexpectedOutput { function: String, value: String },

    #[error("Registry reports {count} gauges, more than the limit of {limit}")]
    TooManyGauges { count: usize, limit: usize },

    #[error("Missing result for `{0}`")]
    MissingResult(String),

    #[error("Gauge {0} has an empty symbol")]
    EmptyLabel(Address),

    #[error("Gauge {gauge} routes to unknown chain selector {selector}")]
    UnknownSelector { gauge: Address, selector: u64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
