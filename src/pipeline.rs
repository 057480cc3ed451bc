use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, U256},
};
use tracing::info;

use crate::{
    abi::{CcipSender, Gauge, GaugeController, GaugeDistributor},
    client::ChainReader,
    constants::MAX_GAUGES,
    contract::ContractHandle,
    error::{DataError, Result},
    multicall::{BatchCall, execute_batch},
    network::{CrossChain, NetworkConfig},
    snapshot::GaugeRecord,
};

pub const REGISTRY_FUNCTIONS: [&str; 2] = ["n_gauges", "gauges"];

/// Gauges deployed on the home network follow this naming; everything else is a root gauge
/// bridging rewards elsewhere.
pub fn is_same_network(label: &str) -> bool {
    label.starts_with("dfx-") && label.ends_with("-v3-gauge")
}

pub fn cross_network_label(label: &str, network: &str) -> String {
    format!("dfx-{label}-{network}")
}

fn address_key(address: &Address) -> String {
    address.to_string()
}

/// `gauges(i)` for every registry index, keyed `gauge-{i}`.
fn gauge_address_calls(
    registry: Address,
    count: usize,
) -> Vec<BatchCall<GaugeController::gaugesCall, Address>> {
    (0..count)
        .map(|i| {
            BatchCall::new(
                registry,
                GaugeController::gaugesCall {
                    index: U256::from(i),
                },
                format!("gauge-{i}"),
                |ret| ret._0,
            )
        })
        .collect()
}

/// Reads the gauge registry and turns it into snapshot records.
pub struct SnapshotPipeline<'a, R> {
    reader: &'a R,
    config: &'a NetworkConfig,
    registry: &'a ContractHandle,
    batch_size: usize,
}

impl<'a, R: ChainReader> SnapshotPipeline<'a, R> {
    pub fn new(
        reader: &'a R,
        config: &'a NetworkConfig,
        registry: &'a ContractHandle,
        batch_size: usize,
    ) -> Self {
        Self {
            reader,
            config,
            registry,
            batch_size,
        }
    }

    pub async fn run(&self) -> Result<Vec<GaugeRecord>> {
        let count = self.gauge_count().await?;
        info!(count, registry = %self.registry.address(), "Registry reports gauges");

        let gauges = self.gauge_addresses(count).await?;
        let active = self.active_gauges(&gauges).await?;
        info!(
            active = active.len(),
            killed = gauges.len() - active.len(),
            "Filtered killed gauges"
        );

        let labelled = self.gauge_labels(&active).await?;
        let home_chain_id = self.config.home_chain_id;

        let Some(cross_chain) = &self.config.cross_chain else {
            return Ok(labelled
                .into_iter()
                .map(|(address, label)| GaugeRecord {
                    address,
                    label,
                    network: home_chain_id,
                })
                .collect());
        };

        let (same, cross): (Vec<_>, Vec<_>) = labelled
            .into_iter()
            .partition(|(_, label)| is_same_network(label));
        info!(
            same_network = same.len(),
            cross_network = cross.len(),
            "Classified gauges"
        );

        let mut records = same
            .into_iter()
            .map(|(address, label)| GaugeRecord {
                address,
                label,
                network: home_chain_id,
            })
            .collect::<Vec<_>>();
        records.extend(self.route_cross_network(cross, cross_chain).await?);

        Ok(records)
    }

    async fn gauge_count(&self) -> Result<usize> {
        let output = self
            .registry
            .call(self.reader, REGISTRY_FUNCTIONS[0], &[])
            .await?;

        let count = match output.as_slice() {
            [DynSolValue::Uint(count, _)] => usize::try_from(*count).ok(),
            [DynSolValue::Int(count, _)] if !count.is_negative() => {
                usize::try_from(count.into_raw()).ok()
            }
            _ => None,
        };
        let count = count.ok_or_else(|| DataError::UnexpectedOutput {
            function: REGISTRY_FUNCTIONS[0].to_string(),
            value: format!("{output:?}"),
        })?;
        if count > MAX_GAUGES {
            return Err(DataError::TooManyGauges {
                count,
                limit: MAX_GAUGES,
            }
            .into());
        }
        Ok(count)
    }

    /// Registered gauges in registry index order.
    async fn gauge_addresses(&self, count: usize) -> Result<Vec<Address>> {
        let calls = gauge_address_calls(self.config.registry, count);
        let results = execute_batch(self.reader, calls, self.batch_size).await?;
        Ok(results.into_values().collect())
    }

    /// Gauges the distributor has not killed, in the order given.
    async fn active_gauges(&self, gauges: &[Address]) -> Result<Vec<Address>> {
        let calls = gauges
            .iter()
            .map(|gauge| {
                BatchCall::new(
                    self.config.distributor,
                    GaugeDistributor::killedGaugesCall { gauge: *gauge },
                    address_key(gauge),
                    |ret| ret._0,
                )
            })
            .collect();

        let killed = execute_batch(self.reader, calls, self.batch_size).await?;
        let mut active = Vec::with_capacity(gauges.len());
        for gauge in gauges {
            if !*killed.require(&address_key(gauge))? {
                active.push(*gauge);
            }
        }
        Ok(active)
    }

    async fn gauge_labels(&self, gauges: &[Address]) -> Result<Vec<(Address, String)>> {
        let calls = gauges
            .iter()
            .map(|gauge| {
                BatchCall::new(*gauge, Gauge::symbolCall {}, address_key(gauge), |ret| ret._0)
            })
            .collect();

        let symbols = execute_batch(self.reader, calls, self.batch_size).await?;
        gauges
            .iter()
            .map(|gauge| -> Result<(Address, String)> {
                let label = symbols.require(&address_key(gauge))?;
                if label.is_empty() {
                    return Err(DataError::EmptyLabel(*gauge).into());
                }
                Ok((*gauge, label.clone()))
            })
            .collect()
    }

    /// Labels root gauges with the network their rewards are bridged to.
    async fn route_cross_network(
        &self,
        gauges: Vec<(Address, String)>,
        cross_chain: &CrossChain,
    ) -> Result<Vec<GaugeRecord>> {
        let calls = gauges
            .iter()
            .map(|(gauge, _)| {
                BatchCall::new(
                    cross_chain.sender,
                    CcipSender::destinationsCall { gauge: *gauge },
                    address_key(gauge),
                    |ret| ret.chainSelector,
                )
            })
            .collect();

        let selectors = execute_batch(self.reader, calls, self.batch_size).await?;
        gauges
            .into_iter()
            .map(|(gauge, label)| -> Result<GaugeRecord> {
                let selector = *selectors.require(&address_key(&gauge))?;
                let network = cross_chain
                    .resolve(selector)
                    .ok_or(DataError::UnknownSelector { gauge, selector })?;
                Ok(GaugeRecord {
                    address: gauge,
                    label: cross_network_label(&label, network.name),
                    network: network.chain_id,
                })
            })
            .collect()
    }
}
