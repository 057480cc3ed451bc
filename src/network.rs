use std::collections::BTreeMap;

use alloy::primitives::Address;
use clap::ValueEnum;

use crate::{
    constants::{
        ARBITRUM_CHAIN_ID, ARBITRUM_SELECTOR, DFX_DISTRIBUTOR_ADDRESS, ETHEREUM_CHAIN_ID,
        GAUGE_CONTROLLER_ADDRESS, POLYGON_CHAIN_ID, POLYGON_SELECTOR,
    },
    error::ConfigError,
};

/// Destination of a cross-chain gauge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkDescriptor {
    pub name: &'static str,
    pub chain_id: u64,
}

/// CCIP selectors of the networks that root gauges may stream rewards to.
pub fn chain_selectors() -> BTreeMap<u64, NetworkDescriptor> {
    BTreeMap::from([
        (
            ARBITRUM_SELECTOR,
            NetworkDescriptor {
                name: "arbitrum",
                chain_id: ARBITRUM_CHAIN_ID,
            },
        ),
        (
            POLYGON_SELECTOR,
            NetworkDescriptor {
                name: "polygon",
                chain_id: POLYGON_CHAIN_ID,
            },
        ),
    ])
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrossChain {
    pub sender: Address,
    pub selectors: BTreeMap<u64, NetworkDescriptor>,
}

impl CrossChain {
    pub fn resolve(&self, selector: u64) -> Option<&NetworkDescriptor> {
        self.selectors.get(&selector)
    }
}

/// Everything that differs between deployments the snapshot runs against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkConfig {
    pub registry: Address,
    pub distributor: Address,
    pub cross_chain: Option<CrossChain>,
    pub home_chain_id: u64,
    pub write_latest: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum NetworkPreset {
    /// Ethereum mainnet gauges, all paying out on mainnet
    Ethereum,
    /// Ethereum mainnet v3 gauges, including root gauges bridged over CCIP
    EthereumCcip,
}

/// Values given on the command line that take precedence over a preset.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub registry: Option<Address>,
    pub distributor: Option<Address>,
    pub sender: Option<Address>,
    pub home_chain_id: Option<u64>,
    pub write_latest: bool,
}

impl NetworkPreset {
    pub fn name(self) -> &'static str {
        match self {
            NetworkPreset::Ethereum => "ethereum",
            NetworkPreset::EthereumCcip => "ethereum-ccip",
        }
    }

    pub fn resolve(self, overrides: &Overrides) -> Result<NetworkConfig, ConfigError> {
        let missing = |flag| ConfigError::MissingAddress {
            preset: self.name(),
            flag,
        };

        let (registry, distributor, sender, write_latest) = match self {
            NetworkPreset::Ethereum => (
                overrides.registry.unwrap_or(GAUGE_CONTROLLER_ADDRESS),
                overrides.distributor.unwrap_or(DFX_DISTRIBUTOR_ADDRESS),
                overrides.sender,
                overrides.write_latest,
            ),
            // The v3 deployment has no addresses baked in.
            NetworkPreset::EthereumCcip => (
                overrides.registry.ok_or_else(|| missing("registry"))?,
                overrides.distributor.ok_or_else(|| missing("distributor"))?,
                Some(overrides.sender.ok_or_else(|| missing("sender"))?),
                true,
            ),
        };

        Ok(NetworkConfig {
            registry,
            distributor,
            cross_chain: sender.map(|sender| CrossChain {
                sender,
                selectors: chain_selectors(),
            }),
            home_chain_id: overrides.home_chain_id.unwrap_or(ETHEREUM_CHAIN_ID),
            write_latest,
        })
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;

    const REGISTRY: Address = address!("1000000000000000000000000000000000000001");
    const DISTRIBUTOR: Address = address!("1000000000000000000000000000000000000002");
    const SENDER: Address = address!("1000000000000000000000000000000000000003");

    #[test]
    fn ethereum_preset_uses_mainnet_deployment() {
        let config = NetworkPreset::Ethereum
            .resolve(&Overrides::default())
            .unwrap();

        assert_eq!(config.registry, GAUGE_CONTROLLER_ADDRESS);
        assert_eq!(config.distributor, DFX_DISTRIBUTOR_ADDRESS);
        assert_eq!(config.home_chain_id, 1);
        assert!(config.cross_chain.is_none());
        assert!(!config.write_latest);
    }

    #[test]
    fn sender_override_enables_cross_chain_labels() {
        let overrides = Overrides {
            sender: Some(SENDER),
            ..Default::default()
        };
        let config = NetworkPreset::Ethereum.resolve(&overrides).unwrap();

        let cross_chain = config.cross_chain.unwrap();
        assert_eq!(cross_chain.sender, SENDER);
        assert_eq!(cross_chain.selectors, chain_selectors());
    }

    #[test]
    fn ccip_preset_requires_every_address() {
        let overrides = Overrides {
            registry: Some(REGISTRY),
            distributor: Some(DISTRIBUTOR),
            ..Default::default()
        };
        let result = NetworkPreset::EthereumCcip.resolve(&overrides);

        assert!(matches!(
            result,
            Err(ConfigError::MissingAddress { flag: "sender", .. })
        ));
    }

    #[test]
    fn ccip_preset_writes_latest_alias() {
        let overrides = Overrides {
            registry: Some(REGISTRY),
            distributor: Some(DISTRIBUTOR),
            sender: Some(SENDER),
            home_chain_id: Some(11155111),
            write_latest: false,
        };
        let config = NetworkPreset::EthereumCcip.resolve(&overrides).unwrap();

        assert_eq!(config.registry, REGISTRY);
        assert_eq!(config.distributor, DISTRIBUTOR);
        assert_eq!(config.home_chain_id, 11155111);
        assert!(config.write_latest);
        assert!(config.cross_chain.is_some());
    }

    #[test]
    fn selectors_resolve_to_known_networks() {
        let cross_chain = CrossChain {
            sender: SENDER,
            selectors: chain_selectors(),
        };

        assert_eq!(
            cross_chain.resolve(4949039107694359620),
            Some(&NetworkDescriptor {
                name: "arbitrum",
                chain_id: 42161
            })
        );
        assert_eq!(cross_chain.resolve(4051577828743386545).unwrap().chain_id, 137);
        assert_eq!(cross_chain.resolve(1), None);
    }
}
