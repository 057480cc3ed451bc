use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
};

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, Bytes, U256, keccak256},
    sol_types::{SolCall, SolValue},
    transports::TransportErrorKind,
};

use crate::{
    abi::{CcipSender, Gauge, GaugeController, GaugeDistributor, Multicall3},
    client::ChainReader,
    error::BatchCallError,
};

/// In-memory chain serving the gauge registry, distributor, gauges and CCIP sender.
#[derive(Default)]
pub struct MockChain {
    count_output: Option<Vec<u8>>,
    gauges: Vec<Address>,
    killed: HashSet<Address>,
    symbols: HashMap<Address, String>,
    selectors: HashMap<Address, u64>,
    failing: bool,
    direct_calls: RefCell<Vec<Address>>,
    batch_sizes: RefCell<Vec<usize>>,
    gauge_indices: RefCell<Vec<usize>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abi_path() -> &'static str {
        concat!(env!("CARGO_MANIFEST_DIR"), "/tasks/abi/GaugeController.json")
    }

    pub fn gauge_addresses(count: usize) -> Vec<Address> {
        (0..count)
            .map(|i| Address::with_last_byte(0xa0 + i as u8))
            .collect()
    }

    /// Overrides the registry count, which otherwise follows the registered gauges.
    pub fn with_gauge_count(mut self, count: u64) -> Self {
        self.count_output = Some(U256::from(count).abi_encode());
        self
    }

    /// Answers `n_gauges()` with an arbitrary value, e.g. an `int128`.
    pub fn with_count_output(mut self, value: DynSolValue) -> Self {
        self.count_output = Some(value.abi_encode());
        self
    }

    pub fn with_gauges(mut self, gauges: &[Address]) -> Self {
        self.gauges = gauges.to_vec();
        self
    }

    pub fn with_gauge(mut self, gauge: Address, symbol: &str, killed: bool) -> Self {
        self.gauges.push(gauge);
        self.symbols.insert(gauge, symbol.to_string());
        if killed {
            self.killed.insert(gauge);
        }
        self
    }

    pub fn with_destination(mut self, gauge: Address, selector: u64) -> Self {
        self.selectors.insert(gauge, selector);
        self
    }

    /// Every aggregated call reverts.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn direct_calls(&self) -> Vec<Address> {
        self.direct_calls.borrow().clone()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes.borrow().clone()
    }

    /// Registry indices requested through `gauges(uint256)`, in request order.
    pub fn gauge_indices(&self) -> Vec<usize> {
        self.gauge_indices.borrow().clone()
    }

    fn respond(&self, call: &Multicall3::Call3) -> Vec<u8> {
        let data = &call.callData[..];
        let selector: [u8; 4] = data[..4].try_into().unwrap();

        if selector == GaugeController::gaugesCall::SELECTOR {
            let request = GaugeController::gaugesCall::abi_decode(data, true).unwrap();
            let index = request.index.to::<usize>();
            self.gauge_indices.borrow_mut().push(index);
            let gauge = self.gauges[index];
            GaugeController::gaugesCall::abi_encode_returns(&(gauge,))
        } else if selector == GaugeDistributor::killedGaugesCall::SELECTOR {
            let request = GaugeDistributor::killedGaugesCall::abi_decode(data, true).unwrap();
            let killed = self.killed.contains(&request.gauge);
            GaugeDistributor::killedGaugesCall::abi_encode_returns(&(killed,))
        } else if selector == Gauge::symbolCall::SELECTOR {
            let symbol = self.symbols.get(&call.target).cloned().unwrap_or_default();
            Gauge::symbolCall::abi_encode_returns(&(symbol,))
        } else if selector == CcipSender::destinationsCall::SELECTOR {
            let request = CcipSender::destinationsCall::abi_decode(data, true).unwrap();
            let chain_selector = self.selectors[&request.gauge];
            CcipSender::destinationsCall::abi_encode_returns(&(Bytes::new(), chain_selector))
        } else {
            panic!("unexpected call {selector:?} to {}", call.target)
        }
    }
}

impl ChainReader for MockChain {
    async fn call(&self, target: Address, input: Bytes) -> Result<Bytes, BatchCallError> {
        assert_eq!(
            input[..],
            keccak256("n_gauges()")[..4],
            "unexpected direct call to {target}"
        );
        self.direct_calls.borrow_mut().push(target);

        let output = self
            .count_output
            .clone()
            .unwrap_or_else(|| U256::from(self.gauges.len()).abi_encode());
        Ok(output.into())
    }

    async fn aggregate(
        &self,
        calls: Vec<Multicall3::Call3>,
    ) -> Result<Vec<Multicall3::Result>, BatchCallError> {
        self.batch_sizes.borrow_mut().push(calls.len());
        if self.failing {
            return Err(BatchCallError::Aggregate {
                calls: calls.len(),
                source: TransportErrorKind::custom_str("execution reverted").into(),
            });
        }

        Ok(calls
            .iter()
            .map(|call| Multicall3::Result {
                success: true,
                returnData: self.respond(call).into(),
            })
            .collect())
    }
}
