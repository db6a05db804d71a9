// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Runtime configuration: confirmation polling and RPC endpoints

use std::collections::{BTreeMap, HashMap};

use alloy_network::{Ethereum, EthereumWallet};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use url::Url;

use crate::chain::selectors::chain_by_selector;
use crate::error::{DeployError, Result};

/// Environment variable holding `<selector>=<url>` pairs separated by commas.
pub const RPC_URLS_ENV: &str = "CCIP_RPC_URLS";

/// Configuration for transaction confirmation polling.
///
/// Controls how [`ReceiptConfirmer`](crate::providers::ReceiptConfirmer) polls
/// a chain for a transaction's receipt before giving up.
///
/// # Examples
///
/// ```rust
/// use ccip_deploy::ConfirmConfig;
///
/// // Use defaults (120 attempts, 5 second intervals)
/// let config = ConfirmConfig::default();
///
/// // Customize polling behavior
/// let config = ConfirmConfig::default()
///     .with_max_attempts(20)
///     .with_poll_interval_secs(12);
///
/// // Preset for local dev chains (60 attempts, 1 second intervals)
/// let config = ConfirmConfig::fast();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmConfig {
    /// Maximum number of receipt lookups before giving up.
    pub max_attempts: u32,
    /// Seconds to wait between receipt lookups.
    pub poll_interval_secs: u64,
}

impl Default for ConfirmConfig {
    /// 120 attempts at 5 second intervals, a ten minute budget that covers
    /// slow public testnets.
    fn default() -> Self {
        Self {
            max_attempts: 120,
            poll_interval_secs: 5,
        }
    }
}

impl ConfirmConfig {
    /// 60 attempts at 1 second intervals, for local dev chains that mine
    /// instantly.
    pub fn fast() -> Self {
        Self {
            max_attempts: 60,
            poll_interval_secs: 1,
        }
    }

    /// Sets the maximum number of receipt lookups.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ccip_deploy::ConfirmConfig;
    ///
    /// let config = ConfirmConfig::default().with_max_attempts(10);
    /// assert_eq!(config.max_attempts, 10);
    /// ```
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sets the interval between receipt lookups in seconds.
    pub fn with_poll_interval_secs(mut self, secs: u64) -> Self {
        self.poll_interval_secs = secs;
        self
    }

    /// Returns the total maximum wait time in seconds.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ccip_deploy::ConfirmConfig;
    ///
    /// assert_eq!(ConfirmConfig::default().total_timeout_secs(), 600);
    /// ```
    pub fn total_timeout_secs(&self) -> u64 {
        self.max_attempts as u64 * self.poll_interval_secs
    }
}

/// A JSON-RPC endpoint for one chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcEndpoint {
    pub selector: u64,
    pub url: Url,
}

impl RpcEndpoint {
    /// Connects an HTTP provider that signs locally with `wallet`.
    ///
    /// Transactions are sent as `eth_sendRawTransaction`, so the wallet must
    /// hold a signer for every `from` address used on this chain, normally
    /// the chain's deployer key.
    pub fn connect(&self, wallet: EthereumWallet) -> DynProvider<Ethereum> {
        ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(self.url.clone())
            .erased()
    }
}

/// RPC endpoints keyed by chain selector.
///
/// # Example
///
/// ```rust
/// use ccip_deploy::RpcConfig;
///
/// let config = RpcConfig::parse(
///     "5009297550715157269=https://eth.example.com,16015286601757825753=http://localhost:8545",
/// )
/// .unwrap();
/// assert_eq!(config.selectors(), vec![5009297550715157269, 16015286601757825753]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RpcConfig {
    endpoints: BTreeMap<u64, RpcEndpoint>,
}

impl RpcConfig {
    /// Loads `.env` if present, then parses [`RPC_URLS_ENV`].
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let raw = std::env::var(RPC_URLS_ENV)
            .map_err(|_| DeployError::InvalidConfig(format!("{RPC_URLS_ENV} is not set")))?;
        Self::parse(&raw)
    }

    /// Parses `<selector>=<url>` pairs separated by commas.
    ///
    /// Every selector must be in the chain catalog and appear once.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut endpoints = BTreeMap::new();

        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (selector, url) = entry.split_once('=').ok_or_else(|| {
                DeployError::InvalidConfig(format!("expected <selector>=<url>, got {entry:?}"))
            })?;
            let selector: u64 = selector.trim().parse().map_err(|_| {
                DeployError::InvalidConfig(format!("chain selector {selector:?} is not a u64"))
            })?;
            chain_by_selector(selector)?;
            let url = Url::parse(url.trim())?;

            if endpoints
                .insert(selector, RpcEndpoint { selector, url })
                .is_some()
            {
                return Err(DeployError::InvalidConfig(format!(
                    "duplicate RPC endpoint for chain {selector}"
                )));
            }
        }

        Ok(Self { endpoints })
    }

    pub fn endpoint(&self, selector: u64) -> Result<&RpcEndpoint> {
        self.endpoints
            .get(&selector)
            .ok_or(DeployError::ChainNotConnected(selector))
    }

    /// Configured selectors in ascending order.
    pub fn selectors(&self) -> Vec<u64> {
        self.endpoints.keys().copied().collect()
    }

    pub fn endpoints(&self) -> impl Iterator<Item = &RpcEndpoint> {
        self.endpoints.values()
    }

    /// Connects a signing provider to every endpoint, keyed by selector.
    pub fn connect_all(&self, wallet: &EthereumWallet) -> HashMap<u64, DynProvider<Ethereum>> {
        self.endpoints
            .iter()
            .map(|(selector, endpoint)| (*selector, endpoint.connect(wallet.clone())))
            .collect()
    }
}
