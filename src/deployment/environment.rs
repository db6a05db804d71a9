// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Connected chains and the environment workflows run against

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, TxHash};
use bon::Builder;
use tracing::Span;

use crate::chain::{chain_by_selector, ChainDetails};
use crate::deployment::address_book::AddressBook;
use crate::deployment::nodes::Nodes;
use crate::error::{DeployError, Result};
use crate::spans;
use crate::traits::{ChainClient, Confirmer, OffchainClient};

/// Upper bound on a single [`Chain::confirm`] call unless overridden.
pub const DEFAULT_CONFIRM_TIMEOUT: Duration = Duration::from_secs(600);

const UNKNOWN_REVERT_REASON: &str = "unknown revert reason";

/// One connected chain.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::time::Duration;
/// use ccip_deploy::testing::{FakeChainClient, FakeConfirmer, FakeLedger};
/// use ccip_deploy::Chain;
/// use alloy_primitives::Address;
///
/// let ledger = FakeLedger::new();
/// let chain = Chain::builder()
///     .selector(7759470850252068959)
///     .client(Arc::new(FakeChainClient::new()))
///     .deployer_key(Address::repeat_byte(0x01))
///     .confirmer(Arc::new(FakeConfirmer::new(ledger)))
///     .confirm_timeout(Duration::from_secs(30))
///     .build();
/// assert_eq!(chain.name(), "anvil-devnet");
/// ```
#[derive(Builder, Clone)]
pub struct Chain {
    selector: u64,
    client: Arc<dyn ChainClient>,
    /// Address of the key that signs this chain's transactions
    deployer_key: Address,
    confirmer: Arc<dyn Confirmer>,
    #[builder(default = DEFAULT_CONFIRM_TIMEOUT)]
    confirm_timeout: Duration,
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("selector", &self.selector)
            .field("deployer_key", &self.deployer_key)
            .field("confirm_timeout", &self.confirm_timeout)
            .finish_non_exhaustive()
    }
}

impl Chain {
    #[inline]
    pub fn selector(&self) -> u64 {
        self.selector
    }

    pub fn client(&self) -> &Arc<dyn ChainClient> {
        &self.client
    }

    #[inline]
    pub fn deployer_key(&self) -> Address {
        self.deployer_key
    }

    #[inline]
    pub fn confirm_timeout(&self) -> Duration {
        self.confirm_timeout
    }

    /// Catalog entry for this chain.
    pub fn details(&self) -> Result<&'static ChainDetails> {
        chain_by_selector(self.selector)
    }

    /// Catalog name, or the selector when it is not in the catalog.
    pub fn name(&self) -> String {
        self.details()
            .map(|d| d.name.to_string())
            .unwrap_or_else(|_| self.selector.to_string())
    }

    /// Waits for `tx_hash` to be final and returns its block number.
    ///
    /// # Errors
    ///
    /// - [`DeployError::ConfirmTimeout`] if [`confirm_timeout`](Self::confirm_timeout) elapses
    /// - [`DeployError::TransactionReverted`] if the transaction reverted
    /// - Any RPC error surfaced by the confirmer
    pub async fn confirm(&self, tx_hash: TxHash) -> Result<u64> {
        match tokio::time::timeout(self.confirm_timeout, self.confirmer.confirm(tx_hash)).await {
            Ok(result) => result,
            Err(_) => Err(DeployError::ConfirmTimeout {
                selector: self.selector,
                tx_hash,
                timeout: self.confirm_timeout,
            }),
        }
    }
}

/// Everything a deployment workflow needs: connected chains, the contracts
/// already deployed on them and the off-chain node service.
///
/// Workflows only read the environment. Callers record newly deployed
/// contracts in [`existing_addresses`](Self::existing_addresses) themselves.
#[derive(Builder, Clone)]
pub struct Environment {
    #[builder(into)]
    name: String,
    existing_addresses: Arc<dyn AddressBook>,
    #[builder(default)]
    chains: HashMap<u64, Chain>,
    #[builder(default)]
    node_ids: Vec<String>,
    offchain: Arc<dyn OffchainClient>,
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("name", &self.name)
            .field("chains", &self.all_chain_selectors())
            .field("node_ids", &self.node_ids)
            .finish_non_exhaustive()
    }
}

impl Environment {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn existing_addresses(&self) -> &Arc<dyn AddressBook> {
        &self.existing_addresses
    }

    pub fn chains(&self) -> &HashMap<u64, Chain> {
        &self.chains
    }

    pub fn node_ids(&self) -> &[String] {
        &self.node_ids
    }

    pub fn offchain(&self) -> &Arc<dyn OffchainClient> {
        &self.offchain
    }

    /// Root span for workflows run against this environment.
    pub fn span(&self) -> Span {
        spans::environment(&self.name, self.chains.len())
    }

    /// Looks up a connected chain.
    pub fn chain(&self, selector: u64) -> Result<&Chain> {
        self.chains
            .get(&selector)
            .ok_or(DeployError::ChainNotConnected(selector))
    }

    /// Selectors of every connected chain, ascending.
    pub fn all_chain_selectors(&self) -> Vec<u64> {
        let mut selectors: Vec<u64> = self.chains.keys().copied().collect();
        selectors.sort_unstable();
        selectors
    }

    /// Selectors of every connected chain not in `excluding`, ascending.
    pub fn all_chain_selectors_excluding(&self, excluding: &[u64]) -> Vec<u64> {
        let mut selectors: Vec<u64> = self
            .chains
            .keys()
            .copied()
            .filter(|selector| !excluding.contains(selector))
            .collect();
        selectors.sort_unstable();
        selectors
    }

    /// Deployer key of every connected chain, in no particular order.
    pub fn all_deployer_keys(&self) -> Vec<Address> {
        self.chains.values().map(Chain::deployer_key).collect()
    }

    /// Loads node descriptors for [`node_ids`](Self::node_ids) from the
    /// off-chain service.
    pub async fn nodes(&self) -> Result<Nodes> {
        Nodes::from_offchain(&self.node_ids, self.offchain.as_ref()).await
    }
}

/// Confirms a submitted transaction, or enriches the submission error.
///
/// If submission failed with on-chain revert data, returns
/// [`DeployError::ExecutionReverted`] carrying the decoded revert reason and
/// the raw payload. Any other submission error is returned unchanged. On
/// successful submission, waits on [`Chain::confirm`].
///
/// # Example
///
/// ```rust,ignore
/// let tx_hash = router.apply_ramp_updates(from, on_ramps, vec![], vec![]).await;
/// let block = confirm_if_no_error(chain, tx_hash).await?;
/// ```
pub async fn confirm_if_no_error(chain: &Chain, submitted: Result<TxHash>) -> Result<u64> {
    match submitted {
        Ok(tx_hash) => chain.confirm(tx_hash).await,
        Err(e) => Err(enrich_submission_error(chain.selector(), e)),
    }
}

/// Rewrites an error carrying revert data as [`DeployError::ExecutionReverted`].
pub(crate) fn enrich_submission_error(selector: u64, error: DeployError) -> DeployError {
    match error.revert_data() {
        Some(data) => DeployError::ExecutionReverted {
            selector,
            reason: alloy_sol_types::decode_revert_reason(&data)
                .unwrap_or_else(|| UNKNOWN_REVERT_REASON.to_string()),
            data,
        },
        None => error,
    }
}
