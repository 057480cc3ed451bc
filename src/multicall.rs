use std::collections::{HashMap, HashSet};

use alloy::{primitives::Address, sol_types::SolCall};
use tracing::debug;

use crate::{
    abi::Multicall3,
    client::ChainReader,
    error::{BatchCallError, DataError, Result},
};

/// One read inside a batch: `call` against `target`, stored under `key` after `decode`.
pub struct BatchCall<C: SolCall, T> {
    pub target: Address,
    pub call: C,
    pub key: String,
    pub decode: fn(C::Return) -> T,
}

impl<C: SolCall, T> BatchCall<C, T> {
    pub fn new(
        target: Address,
        call: C,
        key: impl Into<String>,
        decode: fn(C::Return) -> T,
    ) -> Self {
        Self {
            target,
            call,
            key: key.into(),
            decode,
        }
    }
}

/// Decoded batch results by key, iterated in the order the calls were issued.
#[derive(Debug)]
pub struct CallResultMap<T> {
    entries: Vec<(String, T)>,
    index: HashMap<String, usize>,
}

impl<T> CallResultMap<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    fn insert(&mut self, key: String, value: T) {
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// Like [`Self::get`], but a missing key is a data error.
    pub fn require(&self, key: &str) -> Result<&T, DataError> {
        self.get(key)
            .ok_or_else(|| DataError::MissingResult(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn into_values(self) -> impl Iterator<Item = T> {
        self.entries.into_iter().map(|(_, value)| value)
    }
}

/// Runs `calls` as Multicall3 `aggregate3` rounds of at most `chunk_size` calls.
///
/// No call may fail on its own: a revert anywhere aborts the whole batch. Keys must be unique
/// within the batch.
pub async fn execute_batch<R, C, T>(
    reader: &R,
    calls: Vec<BatchCall<C, T>>,
    chunk_size: usize,
) -> Result<CallResultMap<T>>
where
    R: ChainReader,
    C: SolCall,
{
    let mut seen = HashSet::with_capacity(calls.len());
    for call in &calls {
        if !seen.insert(call.key.as_str()) {
            return Err(BatchCallError::DuplicateKey(call.key.clone()).into());
        }
    }

    let mut results = CallResultMap::with_capacity(calls.len());
    for chunk in calls.chunks(chunk_size.max(1)) {
        let requests = chunk
            .iter()
            .map(|call| Multicall3::Call3 {
                target: call.target,
                allowFailure: false,
                callData: call.call.abi_encode().into(),
            })
            .collect::<Vec<_>>();

        debug!(calls = requests.len(), function = C::SIGNATURE, "Executing batch");
        let responses = reader.aggregate(requests).await?;
        if responses.len() != chunk.len() {
            return Err(BatchCallError::ResultCount {
                expected: chunk.len(),
                actual: responses.len(),
            }
            .into());
        }

        for (call, response) in chunk.iter().zip(responses) {
            if !response.success {
                return Err(BatchCallError::Reverted {
                    key: call.key.clone(),
                    target: call.target,
                }
                .into());
            }
            let decoded = C::abi_decode_returns(&response.returnData, true).map_err(|source| {
                DataError::Decode {
                    key: call.key.clone(),
                    source,
                }
            })?;
            results.insert(call.key.clone(), (call.decode)(decoded));
        }
    }

    debug!(results = results.len(), function = C::SIGNATURE, "Batch complete");
    Ok(results)
}
