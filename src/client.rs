use alloy::{
    eips::BlockId,
    primitives::{Address, Bytes},
    providers::{Provider, ProviderBuilder},
    rpc::types::{TransactionInput, TransactionRequest},
    transports::Transport,
};
use tracing::info;
use url::Url;

use crate::{
    abi::Multicall3::{self, Multicall3Instance},
    constants::MULTICALL3_ADDRESS,
    error::{BatchCallError, ConfigError},
};

/// Read-only access to chain state. Every read of one reader observes the same block.
pub trait ChainReader {
    /// Single `eth_call` against `target`.
    async fn call(&self, target: Address, input: Bytes) -> Result<Bytes, BatchCallError>;

    /// One `aggregate3` round trip through Multicall3.
    async fn aggregate(
        &self,
        calls: Vec<Multicall3::Call3>,
    ) -> Result<Vec<Multicall3::Result>, BatchCallError>;
}

pub struct RpcChainReader<T, P> {
    multicall: Multicall3Instance<T, P>,
    block: BlockId,
}

impl<T, P> RpcChainReader<T, P>
where
    T: Transport + Clone,
    P: Provider<T>,
{
    pub fn new(provider: P, block: BlockId) -> Self {
        Self {
            multicall: Multicall3::new(MULTICALL3_ADDRESS, provider),
            block,
        }
    }
}

impl<T, P> ChainReader for RpcChainReader<T, P>
where
    T: Transport + Clone,
    P: Provider<T>,
{
    async fn call(&self, target: Address, input: Bytes) -> Result<Bytes, BatchCallError> {
        let tx = TransactionRequest::default()
            .to(target)
            .input(TransactionInput::new(input));

        self.multicall
            .provider()
            .call(&tx)
            .block(self.block)
            .await
            .map_err(|source| BatchCallError::Call { target, source })
    }

    async fn aggregate(
        &self,
        calls: Vec<Multicall3::Call3>,
    ) -> Result<Vec<Multicall3::Result>, BatchCallError> {
        let count = calls.len();
        let result = self
            .multicall
            .aggregate3(calls)
            .block(self.block)
            .call()
            .await
            .map_err(|source| BatchCallError::Aggregate {
                calls: count,
                source,
            })?;

        Ok(result.returnData)
    }
}

/// Connects to `rpc_url`, checks it serves `home_chain_id` and pins all reads to `block`,
/// or to the current head when no block is given.
pub async fn connect(
    rpc_url: Url,
    home_chain_id: u64,
    block: Option<u64>,
) -> Result<impl ChainReader, ConfigError> {
    let provider = ProviderBuilder::new().on_http(rpc_url);

    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(ConfigError::Connect)?;
    if chain_id != home_chain_id {
        return Err(ConfigError::ChainIdMismatch {
            expected: home_chain_id,
            actual: chain_id,
        });
    }

    let block = match block {
        Some(block) => block,
        None => provider
            .get_block_number()
            .await
            .map_err(ConfigError::Connect)?,
    };
    info!(chain_id, block, "Connected to RPC endpoint");

    Ok(RpcChainReader::new(provider, BlockId::number(block)))
}
