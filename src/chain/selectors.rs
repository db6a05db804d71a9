// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Chain selector catalog
//!
//! Chain selectors are canonical, family-agnostic `u64` identifiers for
//! blockchain networks. This module centralizes the selectors this crate knows
//! about together with each chain's native chain id and family, and provides
//! lookups in both directions.

use alloy_chains::NamedChain;

use crate::error::{DeployError, Result};
use crate::protocol::ChainFamily;

/// Catalog entry for one chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainDetails {
    /// Canonical chain selector
    pub selector: u64,
    /// Family-native chain identifier (EVM chain id, Solana genesis hash, ...)
    pub chain_id: &'static str,
    /// Canonical chain name
    pub name: &'static str,
    pub family: ChainFamily,
}

impl ChainDetails {
    const fn evm(selector: u64, chain_id: &'static str, name: &'static str) -> Self {
        Self {
            selector,
            chain_id,
            name,
            family: ChainFamily::Evm,
        }
    }

    /// Returns the numeric EVM chain id, or `None` for non-EVM chains.
    pub fn evm_chain_id(&self) -> Option<u64> {
        match self.family {
            ChainFamily::Evm => self.chain_id.parse().ok(),
            _ => None,
        }
    }

    /// Returns the alloy [`NamedChain`] for EVM chains alloy knows by name.
    pub fn named_chain(&self) -> Option<NamedChain> {
        self.evm_chain_id()
            .and_then(|id| NamedChain::try_from(id).ok())
    }
}

// EVM mainnets

/// Ethereum mainnet
pub const ETHEREUM_MAINNET: ChainDetails =
    ChainDetails::evm(5009297550715157269, "1", "ethereum-mainnet");

/// Arbitrum One
pub const ARBITRUM_MAINNET: ChainDetails =
    ChainDetails::evm(4949039107694359620, "42161", "ethereum-mainnet-arbitrum-1");

/// OP Mainnet
pub const OPTIMISM_MAINNET: ChainDetails =
    ChainDetails::evm(3734403246176062136, "10", "ethereum-mainnet-optimism-1");

/// Base
pub const BASE_MAINNET: ChainDetails =
    ChainDetails::evm(15971525489660198786, "8453", "ethereum-mainnet-base-1");

/// Polygon PoS
pub const POLYGON_MAINNET: ChainDetails =
    ChainDetails::evm(4051577828743386545, "137", "polygon-mainnet");

/// Avalanche C-Chain
pub const AVALANCHE_MAINNET: ChainDetails =
    ChainDetails::evm(6433500567565415381, "43114", "avalanche-mainnet");

/// BNB Smart Chain
pub const BSC_MAINNET: ChainDetails =
    ChainDetails::evm(11344663589394136015, "56", "binance_smart_chain-mainnet");

// EVM testnets

/// Ethereum Sepolia
pub const ETHEREUM_SEPOLIA: ChainDetails =
    ChainDetails::evm(16015286601757825753, "11155111", "ethereum-testnet-sepolia");

/// Arbitrum Sepolia
pub const ARBITRUM_SEPOLIA: ChainDetails = ChainDetails::evm(
    3478487238524512106,
    "421614",
    "ethereum-testnet-sepolia-arbitrum-1",
);

/// OP Sepolia
pub const OPTIMISM_SEPOLIA: ChainDetails = ChainDetails::evm(
    5224473277236331295,
    "11155420",
    "ethereum-testnet-sepolia-optimism-1",
);

/// Base Sepolia
pub const BASE_SEPOLIA: ChainDetails =
    ChainDetails::evm(10344971235874465080, "84532", "ethereum-testnet-sepolia-base-1");

/// Avalanche Fuji
pub const AVALANCHE_FUJI: ChainDetails =
    ChainDetails::evm(14767482510784806043, "43113", "avalanche-testnet-fuji");

/// Polygon Amoy
pub const POLYGON_AMOY: ChainDetails =
    ChainDetails::evm(16281711391670634445, "80002", "polygon-testnet-amoy");

/// BNB Smart Chain testnet
pub const BSC_TESTNET: ChainDetails =
    ChainDetails::evm(13264668187771770619, "97", "binance_smart_chain-testnet");

// Local and simulated chains

/// Local geth dev chain
pub const GETH_TESTNET: ChainDetails = ChainDetails::evm(3379446385462418246, "1337", "geth-testnet");

/// Local anvil dev chain
pub const ANVIL_DEVNET: ChainDetails = ChainDetails::evm(7759470850252068959, "31337", "anvil-devnet");

/// First simulated test chain
pub const TEST_90000001: ChainDetails =
    ChainDetails::evm(909606746561742123, "90000001", "test-90000001");

/// Second simulated test chain
pub const TEST_90000002: ChainDetails =
    ChainDetails::evm(5548718428018410741, "90000002", "test-90000002");

/// Third simulated test chain
pub const TEST_90000003: ChainDetails =
    ChainDetails::evm(789068866484373046, "90000003", "test-90000003");

// Non-EVM chains

/// Solana mainnet-beta
pub const SOLANA_MAINNET: ChainDetails = ChainDetails {
    selector: 124615329519749607,
    chain_id: "5eykt4UsFv8P8NJdTREpY1vzqKqZKvdpKuc147dw2N9d",
    name: "solana-mainnet",
    family: ChainFamily::Solana,
};

/// Solana devnet
pub const SOLANA_DEVNET: ChainDetails = ChainDetails {
    selector: 16423721717087811551,
    chain_id: "EtWTRABZaYq6iMfeYKouRu166VU2xqa1wcaWoxPkrZBG",
    name: "solana-devnet",
    family: ChainFamily::Solana,
};

/// Aptos mainnet
pub const APTOS_MAINNET: ChainDetails = ChainDetails {
    selector: 4741433654826277614,
    chain_id: "1",
    name: "aptos-mainnet",
    family: ChainFamily::Aptos,
};

/// Aptos testnet
pub const APTOS_TESTNET: ChainDetails = ChainDetails {
    selector: 743186221051783445,
    chain_id: "2",
    name: "aptos-testnet",
    family: ChainFamily::Aptos,
};

/// Every chain known to the catalog.
pub const ALL_CHAINS: &[ChainDetails] = &[
    ETHEREUM_MAINNET,
    ARBITRUM_MAINNET,
    OPTIMISM_MAINNET,
    BASE_MAINNET,
    POLYGON_MAINNET,
    AVALANCHE_MAINNET,
    BSC_MAINNET,
    ETHEREUM_SEPOLIA,
    ARBITRUM_SEPOLIA,
    OPTIMISM_SEPOLIA,
    BASE_SEPOLIA,
    AVALANCHE_FUJI,
    POLYGON_AMOY,
    BSC_TESTNET,
    GETH_TESTNET,
    ANVIL_DEVNET,
    TEST_90000001,
    TEST_90000002,
    TEST_90000003,
    SOLANA_MAINNET,
    SOLANA_DEVNET,
    APTOS_MAINNET,
    APTOS_TESTNET,
];

/// Looks up a chain by selector.
///
/// # Example
///
/// ```rust
/// use ccip_deploy::{chain_by_selector, ChainFamily};
///
/// let details = chain_by_selector(5009297550715157269).unwrap();
/// assert_eq!(details.name, "ethereum-mainnet");
/// assert_eq!(details.family, ChainFamily::Evm);
/// assert!(chain_by_selector(42).is_err());
/// ```
pub fn chain_by_selector(selector: u64) -> Result<&'static ChainDetails> {
    ALL_CHAINS
        .iter()
        .find(|details| details.selector == selector)
        .ok_or(DeployError::InvalidChainSelector(selector))
}

/// Looks up a chain by its family-native chain id.
pub fn chain_by_id(chain_id: &str, family: ChainFamily) -> Result<&'static ChainDetails> {
    ALL_CHAINS
        .iter()
        .find(|details| details.family == family && details.chain_id == chain_id)
        .ok_or_else(|| {
            DeployError::InvalidConfig(format!("no {family} chain with id {chain_id} in catalog"))
        })
}

/// Returns true if the selector resolves in the catalog.
#[inline]
pub fn is_known_selector(selector: u64) -> bool {
    chain_by_selector(selector).is_ok()
}

/// Chain selector lookups for alloy's [`NamedChain`].
///
/// # Example
///
/// ```rust
/// use ccip_deploy::ChainSelectorExt;
/// use alloy_chains::NamedChain;
///
/// assert_eq!(NamedChain::Mainnet.chain_selector().unwrap(), 5009297550715157269);
/// assert!(NamedChain::Mainnet.has_chain_selector());
/// ```
pub trait ChainSelectorExt {
    /// Returns the chain selector for this chain.
    fn chain_selector(&self) -> Result<u64>;

    /// Returns true if the catalog has a selector for this chain.
    fn has_chain_selector(&self) -> bool {
        self.chain_selector().is_ok()
    }
}

impl ChainSelectorExt for NamedChain {
    fn chain_selector(&self) -> Result<u64> {
        let chain_id = *self as u64;
        chain_by_id(&chain_id.to_string(), ChainFamily::Evm).map(|details| details.selector)
    }
}
