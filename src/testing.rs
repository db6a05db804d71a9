// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Test utilities and fake implementations for deployment workflows
//!
//! This module provides fake implementations of the chain, contract and
//! off-chain traits so that workflows can be exercised end to end, including
//! reverts, stalled confirmations and RPC failures, without a node or a job
//! distributor.
//!
//! Fake contracts and the fake confirmer share a [`FakeLedger`], which hands
//! out transaction hashes, decides which of them revert and records every
//! submitted call in order.
//!
//! Only compiled for this crate's own tests or with the `testing` feature:
//!
//! ```toml
//! [dev-dependencies]
//! ccip-deploy = { version = "0.1", features = ["testing"] }
//! ```

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use alloy_primitives::{Address, Bytes, TxHash, B256, U256};
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::contracts::{
    FeeQuoter, FeeQuoterBinding, OffRamp, OffRampBinding, OnRamp, OnRampBinding, Router,
    RouterBinding,
};
use crate::deployment::offchain::{JobProposal, NodeChainConfig, OffchainNode, ProposalStatus};
use crate::error::{DeployError, Result};
use crate::lane::CcipChainState;
use crate::traits::{ChainClient, Clock, Confirmer, OffchainClient, TxStatus};

// ============================================================================
// Fake Ledger
// ============================================================================

/// A contract call submitted through one of the fake contracts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerCall {
    pub contract: Address,
    pub method: &'static str,
    pub from: Address,
    /// `None` when submission was configured to fail
    pub tx_hash: Option<TxHash>,
}

#[derive(Debug, Default)]
struct LedgerState {
    tx_counter: u64,
    block_height: u64,
    calls: Vec<LedgerCall>,
    submit_failures: HashMap<(Address, &'static str), Option<Bytes>>,
    revert_calls: HashSet<(Address, &'static str)>,
    reverts: HashSet<TxHash>,
    confirmed: Vec<TxHash>,
}

/// Shared record of simulated transactions.
///
/// Cloning yields a handle to the same ledger.
#[derive(Clone, Debug, Default)]
pub struct FakeLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl FakeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh, unique transaction hash
    pub fn next_tx_hash(&self) -> TxHash {
        let mut state = self.state.lock();
        state.tx_counter += 1;
        B256::from(U256::from(state.tx_counter))
    }

    /// Make confirmation of `tx_hash` report a revert
    pub fn revert_on_confirm(&self, tx_hash: TxHash) {
        self.state.lock().reverts.insert(tx_hash);
    }

    /// Make submission of `method` on `contract` fail.
    ///
    /// With revert data the binding returns [`DeployError::Revert`], otherwise
    /// a [`DeployError::Provider`] error.
    pub fn fail_submit(&self, contract: Address, method: &'static str, revert_data: Option<Bytes>) {
        self.state
            .lock()
            .submit_failures
            .insert((contract, method), revert_data);
    }

    /// Make the transaction submitted for `method` on `contract` revert when
    /// confirmed
    pub fn revert_call(&self, contract: Address, method: &'static str) {
        self.state.lock().revert_calls.insert((contract, method));
    }

    /// Every submitted call, in submission order
    pub fn calls(&self) -> Vec<LedgerCall> {
        self.state.lock().calls.clone()
    }

    /// Number of transactions confirmed without revert
    pub fn confirmed_count(&self) -> usize {
        self.state.lock().confirmed.len()
    }

    pub fn is_confirmed(&self, tx_hash: TxHash) -> bool {
        self.state.lock().confirmed.contains(&tx_hash)
    }

    fn submit(&self, contract: Address, method: &'static str, from: Address) -> Result<TxHash> {
        let mut state = self.state.lock();

        if let Some(failure) = state.submit_failures.get(&(contract, method)).cloned() {
            state.calls.push(LedgerCall {
                contract,
                method,
                from,
                tx_hash: None,
            });
            return Err(match failure {
                Some(data) => DeployError::Revert { data },
                None => DeployError::Provider(format!("simulated submission failure for {method}")),
            });
        }

        state.tx_counter += 1;
        let tx_hash = B256::from(U256::from(state.tx_counter));
        if state.revert_calls.contains(&(contract, method)) {
            state.reverts.insert(tx_hash);
        }
        state.calls.push(LedgerCall {
            contract,
            method,
            from,
            tx_hash: Some(tx_hash),
        });
        Ok(tx_hash)
    }

    fn mine(&self, selector: u64, tx_hash: TxHash) -> Result<u64> {
        let mut state = self.state.lock();
        state.block_height += 1;
        let block_number = state.block_height;

        if state.reverts.contains(&tx_hash) {
            return Err(DeployError::TransactionReverted {
                selector,
                tx_hash,
                block_number,
            });
        }
        state.confirmed.push(tx_hash);
        Ok(block_number)
    }
}

// ============================================================================
// Fake Confirmer
// ============================================================================

/// A confirmer that mines transactions in the shared [`FakeLedger`].
///
/// Every confirmation lands in the next block, starting at block 1.
#[derive(Clone, Debug)]
pub struct FakeConfirmer {
    ledger: FakeLedger,
    selector: u64,
    stalled: bool,
}

impl FakeConfirmer {
    pub fn new(ledger: FakeLedger) -> Self {
        Self {
            ledger,
            selector: 0,
            stalled: false,
        }
    }

    /// Chain selector reported in revert errors
    pub fn with_selector(mut self, selector: u64) -> Self {
        self.selector = selector;
        self
    }

    /// Never finish confirming, to exercise timeouts
    pub fn stalled(mut self) -> Self {
        self.stalled = true;
        self
    }
}

#[async_trait]
impl Confirmer for FakeConfirmer {
    async fn confirm(&self, tx_hash: TxHash) -> Result<u64> {
        if self.stalled {
            std::future::pending::<()>().await;
        }
        self.ledger.mine(self.selector, tx_hash)
    }
}

// ============================================================================
// Fake Chain Client
// ============================================================================

/// A fake chain client that returns pre-configured transaction statuses.
///
/// This allows testing scenarios like:
/// - Transaction pending for several polls, then mined
/// - Transaction mined but reverted
/// - RPC node unreachable
#[derive(Clone, Debug, Default)]
pub struct FakeChainClient {
    statuses: Arc<Mutex<HashMap<TxHash, VecDeque<Option<TxStatus>>>>>,
    balances: HashMap<Address, U256>,
    nonces: HashMap<Address, u64>,
    rpc_failure: Option<String>,
}

impl FakeChainClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `sequence` one status per poll; the last status repeats
    pub fn with_status_sequence(self, tx_hash: TxHash, sequence: Vec<Option<TxStatus>>) -> Self {
        self.statuses.lock().insert(tx_hash, sequence.into());
        self
    }

    pub fn with_balance(mut self, account: Address, balance: U256) -> Self {
        self.balances.insert(account, balance);
        self
    }

    pub fn with_nonce(mut self, account: Address, nonce: u64) -> Self {
        self.nonces.insert(account, nonce);
        self
    }

    /// Fail every call with a provider error
    pub fn with_rpc_failure(mut self, message: impl Into<String>) -> Self {
        self.rpc_failure = Some(message.into());
        self
    }

    fn check_rpc(&self) -> Result<()> {
        match &self.rpc_failure {
            Some(message) => Err(DeployError::Provider(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ChainClient for FakeChainClient {
    async fn transaction_status(&self, tx_hash: TxHash) -> Result<Option<TxStatus>> {
        self.check_rpc()?;
        let mut statuses = self.statuses.lock();
        let Some(sequence) = statuses.get_mut(&tx_hash) else {
            return Ok(None);
        };
        if sequence.len() > 1 {
            Ok(sequence.pop_front().flatten())
        } else {
            Ok(sequence.front().copied().flatten())
        }
    }

    async fn block_number(&self) -> Result<u64> {
        self.check_rpc()?;
        Ok(12345)
    }

    async fn balance(&self, account: Address, _block: Option<u64>) -> Result<U256> {
        self.check_rpc()?;
        Ok(self.balances.get(&account).copied().unwrap_or_default())
    }

    async fn nonce(&self, account: Address, _block: Option<u64>) -> Result<u64> {
        self.check_rpc()?;
        Ok(self.nonces.get(&account).copied().unwrap_or_default())
    }
}

// ============================================================================
// Fake Contracts
// ============================================================================

/// A router that records `applyRampUpdates` calls.
#[derive(Debug)]
pub struct FakeRouter {
    address: Address,
    ledger: FakeLedger,
    ramp_updates: Mutex<Vec<(Vec<Router::OnRamp>, Vec<Router::OffRamp>, Vec<Router::OffRamp>)>>,
}

impl FakeRouter {
    pub const APPLY_RAMP_UPDATES: &'static str = "applyRampUpdates";

    pub fn new(address: Address, ledger: FakeLedger) -> Self {
        Self {
            address,
            ledger,
            ramp_updates: Mutex::new(Vec::new()),
        }
    }

    /// Arguments of every accepted `applyRampUpdates` call
    pub fn ramp_updates(
        &self,
    ) -> Vec<(Vec<Router::OnRamp>, Vec<Router::OffRamp>, Vec<Router::OffRamp>)> {
        self.ramp_updates.lock().clone()
    }
}

#[async_trait]
impl RouterBinding for FakeRouter {
    fn address(&self) -> Address {
        self.address
    }

    async fn apply_ramp_updates(
        &self,
        from: Address,
        on_ramp_updates: Vec<Router::OnRamp>,
        off_ramp_removes: Vec<Router::OffRamp>,
        off_ramp_adds: Vec<Router::OffRamp>,
    ) -> Result<TxHash> {
        let tx_hash = self
            .ledger
            .submit(self.address, Self::APPLY_RAMP_UPDATES, from)?;
        self.ramp_updates
            .lock()
            .push((on_ramp_updates, off_ramp_removes, off_ramp_adds));
        Ok(tx_hash)
    }
}

/// An on-ramp that records destination config updates.
#[derive(Debug)]
pub struct FakeOnRamp {
    address: Address,
    ledger: FakeLedger,
    dest_chain_config_updates: Mutex<Vec<Vec<OnRamp::DestChainConfigArgs>>>,
}

impl FakeOnRamp {
    pub const APPLY_DEST_CHAIN_CONFIG_UPDATES: &'static str = "applyDestChainConfigUpdates";

    pub fn new(address: Address, ledger: FakeLedger) -> Self {
        Self {
            address,
            ledger,
            dest_chain_config_updates: Mutex::new(Vec::new()),
        }
    }

    pub fn dest_chain_config_updates(&self) -> Vec<Vec<OnRamp::DestChainConfigArgs>> {
        self.dest_chain_config_updates.lock().clone()
    }
}

#[async_trait]
impl OnRampBinding for FakeOnRamp {
    fn address(&self) -> Address {
        self.address
    }

    async fn apply_dest_chain_config_updates(
        &self,
        from: Address,
        args: Vec<OnRamp::DestChainConfigArgs>,
    ) -> Result<TxHash> {
        let tx_hash = self
            .ledger
            .submit(self.address, Self::APPLY_DEST_CHAIN_CONFIG_UPDATES, from)?;
        self.dest_chain_config_updates.lock().push(args);
        Ok(tx_hash)
    }
}

/// An off-ramp that records source config updates.
#[derive(Debug)]
pub struct FakeOffRamp {
    address: Address,
    ledger: FakeLedger,
    source_chain_config_updates: Mutex<Vec<Vec<OffRamp::SourceChainConfigArgs>>>,
}

impl FakeOffRamp {
    pub const APPLY_SOURCE_CHAIN_CONFIG_UPDATES: &'static str = "applySourceChainConfigUpdates";

    pub fn new(address: Address, ledger: FakeLedger) -> Self {
        Self {
            address,
            ledger,
            source_chain_config_updates: Mutex::new(Vec::new()),
        }
    }

    pub fn source_chain_config_updates(&self) -> Vec<Vec<OffRamp::SourceChainConfigArgs>> {
        self.source_chain_config_updates.lock().clone()
    }
}

#[async_trait]
impl OffRampBinding for FakeOffRamp {
    fn address(&self) -> Address {
        self.address
    }

    async fn apply_source_chain_config_updates(
        &self,
        from: Address,
        args: Vec<OffRamp::SourceChainConfigArgs>,
    ) -> Result<TxHash> {
        let tx_hash = self
            .ledger
            .submit(self.address, Self::APPLY_SOURCE_CHAIN_CONFIG_UPDATES, from)?;
        self.source_chain_config_updates.lock().push(args);
        Ok(tx_hash)
    }
}

/// A fee quoter that records price and destination config updates.
#[derive(Debug)]
pub struct FakeFeeQuoter {
    address: Address,
    ledger: FakeLedger,
    price_updates: Mutex<Vec<FeeQuoter::PriceUpdates>>,
    dest_chain_config_updates: Mutex<Vec<Vec<FeeQuoter::DestChainConfigArgs>>>,
}

impl FakeFeeQuoter {
    pub const UPDATE_PRICES: &'static str = "updatePrices";
    pub const APPLY_DEST_CHAIN_CONFIG_UPDATES: &'static str = "applyDestChainConfigUpdates";

    pub fn new(address: Address, ledger: FakeLedger) -> Self {
        Self {
            address,
            ledger,
            price_updates: Mutex::new(Vec::new()),
            dest_chain_config_updates: Mutex::new(Vec::new()),
        }
    }

    pub fn price_updates(&self) -> Vec<FeeQuoter::PriceUpdates> {
        self.price_updates.lock().clone()
    }

    pub fn dest_chain_config_updates(&self) -> Vec<Vec<FeeQuoter::DestChainConfigArgs>> {
        self.dest_chain_config_updates.lock().clone()
    }
}

#[async_trait]
impl FeeQuoterBinding for FakeFeeQuoter {
    fn address(&self) -> Address {
        self.address
    }

    async fn update_prices(
        &self,
        from: Address,
        updates: FeeQuoter::PriceUpdates,
    ) -> Result<TxHash> {
        let tx_hash = self
            .ledger
            .submit(self.address, Self::UPDATE_PRICES, from)?;
        self.price_updates.lock().push(updates);
        Ok(tx_hash)
    }

    async fn apply_dest_chain_config_updates(
        &self,
        from: Address,
        args: Vec<FeeQuoter::DestChainConfigArgs>,
    ) -> Result<TxHash> {
        let tx_hash = self
            .ledger
            .submit(self.address, Self::APPLY_DEST_CHAIN_CONFIG_UPDATES, from)?;
        self.dest_chain_config_updates.lock().push(args);
        Ok(tx_hash)
    }
}

/// A full set of fake CCIP contracts for one chain.
///
/// Addresses are `seed` followed by the contract's position, so two sets
/// built with different seeds never collide.
#[derive(Debug, Clone)]
pub struct FakeCcipContracts {
    pub router: Arc<FakeRouter>,
    pub on_ramp: Arc<FakeOnRamp>,
    pub off_ramp: Arc<FakeOffRamp>,
    pub fee_quoter: Arc<FakeFeeQuoter>,
    pub link_token: Address,
    pub weth9: Address,
}

impl FakeCcipContracts {
    pub fn new(seed: u8, ledger: &FakeLedger) -> Self {
        let address = |n: u8| {
            let mut bytes = [seed; 20];
            bytes[19] = n;
            Address::from(bytes)
        };
        Self {
            router: Arc::new(FakeRouter::new(address(1), ledger.clone())),
            on_ramp: Arc::new(FakeOnRamp::new(address(2), ledger.clone())),
            off_ramp: Arc::new(FakeOffRamp::new(address(3), ledger.clone())),
            fee_quoter: Arc::new(FakeFeeQuoter::new(address(4), ledger.clone())),
            link_token: address(5),
            weth9: address(6),
        }
    }

    pub fn state(&self) -> CcipChainState {
        CcipChainState {
            router: Some(self.router.clone()),
            on_ramp: Some(self.on_ramp.clone()),
            off_ramp: Some(self.off_ramp.clone()),
            fee_quoter: Some(self.fee_quoter.clone()),
            link_token: Some(self.link_token),
            weth9: Some(self.weth9),
        }
    }
}

// ============================================================================
// Fake Offchain Client
// ============================================================================

/// A fake job distributor serving pre-registered nodes.
#[derive(Clone, Debug, Default)]
pub struct FakeOffchainClient {
    nodes: HashMap<String, OffchainNode>,
    chain_configs: HashMap<String, Vec<NodeChainConfig>>,
    jobs: Arc<Mutex<Vec<JobProposal>>>,
}

impl FakeOffchainClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node and the chain configs it reports
    pub fn with_node(mut self, node: OffchainNode, chain_configs: Vec<NodeChainConfig>) -> Self {
        self.chain_configs.insert(node.id.clone(), chain_configs);
        self.nodes.insert(node.id.clone(), node);
        self
    }

    fn require_node(&self, node_id: &str) -> Result<&OffchainNode> {
        self.nodes
            .get(node_id)
            .ok_or_else(|| DeployError::Offchain(format!("node {node_id} not found")))
    }
}

#[async_trait]
impl OffchainClient for FakeOffchainClient {
    async fn get_node(&self, node_id: &str) -> Result<OffchainNode> {
        self.require_node(node_id).cloned()
    }

    async fn list_node_chain_configs(&self, node_id: &str) -> Result<Vec<NodeChainConfig>> {
        self.require_node(node_id)?;
        Ok(self.chain_configs.get(node_id).cloned().unwrap_or_default())
    }

    async fn propose_job(&self, node_id: &str, spec: &str) -> Result<JobProposal> {
        self.require_node(node_id)?;
        let mut jobs = self.jobs.lock();
        let proposal = JobProposal {
            id: format!("job-{}", jobs.len() + 1),
            node_id: node_id.to_string(),
            spec: spec.to_string(),
            status: ProposalStatus::Pending,
        };
        jobs.push(proposal.clone());
        Ok(proposal)
    }

    async fn list_jobs(&self, node_id: &str) -> Result<Vec<JobProposal>> {
        self.require_node(node_id)?;
        Ok(self
            .jobs
            .lock()
            .iter()
            .filter(|job| job.node_id == node_id)
            .cloned()
            .collect())
    }
}

// ============================================================================
// Fake Clock
// ============================================================================

/// A fake clock that allows fast-forwarding time in tests.
///
/// This enables testing polling behavior without actually waiting.
#[derive(Clone, Debug)]
pub struct FakeClock {
    current_time: Arc<Mutex<Instant>>,
    sleep_log: Arc<Mutex<Vec<Duration>>>,
}

impl Default for FakeClock {
    fn default() -> Self {
        Self {
            current_time: Arc::new(Mutex::new(Instant::now())),
            sleep_log: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fast-forward the clock by the given duration
    pub fn advance(&self, duration: Duration) {
        *self.current_time.lock() += duration;
    }

    /// Get the total time "slept" by this clock
    pub fn total_sleep_time(&self) -> Duration {
        self.sleep_log.lock().iter().sum()
    }

    /// Get the number of times sleep was called
    pub fn sleep_count(&self) -> usize {
        self.sleep_log.lock().len()
    }
}

#[async_trait]
impl Clock for FakeClock {
    async fn sleep(&self, duration: Duration) {
        self.sleep_log.lock().push(duration);
        self.advance(duration);
    }

    fn now(&self) -> Instant {
        *self.current_time.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_clock_tracks_sleep_calls() {
        let clock = FakeClock::new();
        let start = clock.now();

        clock.sleep(Duration::from_secs(60)).await;
        clock.sleep(Duration::from_secs(120)).await;

        assert_eq!(clock.sleep_count(), 2);
        assert_eq!(clock.total_sleep_time(), Duration::from_secs(180));
        assert_eq!(clock.now() - start, Duration::from_secs(180));
    }

    #[tokio::test]
    async fn test_fake_confirmer_blocks_start_at_one() {
        let ledger = FakeLedger::new();
        let confirmer = FakeConfirmer::new(ledger.clone());

        let first = confirmer.confirm(ledger.next_tx_hash()).await.unwrap();
        let second = confirmer.confirm(ledger.next_tx_hash()).await.unwrap();

        assert_eq!((first, second), (1, 2));
        assert_eq!(ledger.confirmed_count(), 2);
    }

    #[tokio::test]
    async fn test_fake_router_submission_failure_is_recorded() {
        let ledger = FakeLedger::new();
        let router = FakeRouter::new(Address::repeat_byte(0x01), ledger.clone());
        ledger.fail_submit(router.address(), FakeRouter::APPLY_RAMP_UPDATES, None);

        let err = router
            .apply_ramp_updates(Address::ZERO, vec![], vec![], vec![])
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::Provider(_)));
        assert_eq!(ledger.calls().len(), 1);
        assert_eq!(ledger.calls()[0].tx_hash, None);
        assert!(router.ramp_updates().is_empty());
    }

    #[tokio::test]
    async fn test_revert_call_marks_submitted_transaction() {
        let ledger = FakeLedger::new();
        let fee_quoter = FakeFeeQuoter::new(Address::repeat_byte(0x04), ledger.clone());
        ledger.revert_call(fee_quoter.address(), FakeFeeQuoter::UPDATE_PRICES);

        let tx_hash = fee_quoter
            .update_prices(
                Address::ZERO,
                FeeQuoter::PriceUpdates {
                    tokenPriceUpdates: vec![],
                    gasPriceUpdates: vec![],
                },
            )
            .await
            .unwrap();
        let err = FakeConfirmer::new(ledger.clone())
            .with_selector(7)
            .confirm(tx_hash)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DeployError::TransactionReverted { selector: 7, .. }
        ));
        assert!(!ledger.is_confirmed(tx_hash));
    }

    #[tokio::test]
    async fn test_fake_offchain_client_jobs() {
        let client = FakeOffchainClient::new().with_node(
            OffchainNode {
                id: "node-1".to_string(),
                name: "node one".to_string(),
                csa_public_key: "csa".to_string(),
                is_connected: true,
            },
            vec![],
        );

        let job = client.propose_job("node-1", "type = \"ccip\"").await.unwrap();
        assert_eq!(job.status, ProposalStatus::Pending);
        assert_eq!(client.list_jobs("node-1").await.unwrap(), vec![job]);
        assert!(matches!(
            client.get_node("node-2").await,
            Err(DeployError::Offchain(_))
        ));
    }

    #[tokio::test]
    async fn test_fake_chain_client_repeats_last_status() {
        let tx_hash = TxHash::repeat_byte(0x01);
        let mined = TxStatus {
            block_number: 5,
            succeeded: true,
        };
        let client = FakeChainClient::new().with_status_sequence(tx_hash, vec![None, Some(mined)]);

        assert_eq!(client.transaction_status(tx_hash).await.unwrap(), None);
        assert_eq!(client.transaction_status(tx_hash).await.unwrap(), Some(mined));
        assert_eq!(client.transaction_status(tx_hash).await.unwrap(), Some(mined));
    }
}
