// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Core trait abstractions for chain access and off-chain orchestration.
//!
//! Workflows in this crate never talk to an RPC node or a job distributor
//! directly. They go through the traits below, which lets tests substitute
//! fakes that simulate reverts, stalled chains and slow clocks without a
//! network.
//!
//! # Example: Implementing a Test Fake
//!
//! ```rust,ignore
//! use ccip_deploy::traits::{ChainClient, TxStatus};
//! use std::collections::HashMap;
//!
//! struct FakeChainClient {
//!     statuses: HashMap<TxHash, TxStatus>,
//! }
//!
//! #[async_trait::async_trait]
//! impl ChainClient for FakeChainClient {
//!     async fn transaction_status(&self, tx_hash: TxHash) -> Result<Option<TxStatus>> {
//!         Ok(self.statuses.get(&tx_hash).copied())
//!     }
//!
//!     async fn block_number(&self) -> Result<u64> {
//!         Ok(12345)
//!     }
//!     // ...
//! }
//! ```

use std::time::{Duration, Instant};

use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;

use crate::deployment::offchain::{JobProposal, NodeChainConfig, OffchainNode};
use crate::error::Result;

/// Outcome of a mined transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxStatus {
    pub block_number: u64,
    /// `false` if the transaction reverted
    pub succeeded: bool,
}

/// Read access to one chain.
///
/// # Test Scenarios
///
/// Implementing this trait with fakes enables testing:
/// - Transactions that stay pending
/// - Reverted transactions
/// - RPC failures mid-poll
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Returns the status of a mined transaction, or `None` while it is pending
    /// or unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC call fails or the response cannot be parsed.
    async fn transaction_status(&self, tx_hash: TxHash) -> Result<Option<TxStatus>>;

    /// Gets the current block number.
    async fn block_number(&self) -> Result<u64>;

    /// Gets the native balance of `account` at `block`, or at the latest block
    /// when `block` is `None`.
    async fn balance(&self, account: Address, block: Option<u64>) -> Result<U256>;

    /// Gets the transaction count of `account` at `block`, or at the latest
    /// block when `block` is `None`.
    async fn nonce(&self, account: Address, block: Option<u64>) -> Result<u64>;
}

/// Waits for a submitted transaction to be final.
#[async_trait]
pub trait Confirmer: Send + Sync {
    /// Blocks until `tx_hash` is mined and returns its block number.
    ///
    /// # Errors
    ///
    /// Implementations must return an error, never a block number, for a
    /// transaction that reverted.
    async fn confirm(&self, tx_hash: TxHash) -> Result<u64>;
}

/// Trait for time-based operations.
///
/// This trait abstracts sleep and time queries, enabling fast-forward testing
/// where tests can instantly advance through polling loops without actually
/// waiting.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Asynchronously sleeps for the given duration.
    async fn sleep(&self, duration: Duration);

    /// Returns the current instant in time.
    fn now(&self) -> Instant;
}

/// Off-chain node orchestration service (job distributor).
///
/// Only the boundary is defined here; surrounding tooling supplies the
/// implementation.
#[async_trait]
pub trait OffchainClient: Send + Sync {
    /// Fetches a registered node.
    async fn get_node(&self, node_id: &str) -> Result<OffchainNode>;

    /// Lists the per-chain configuration a node reports.
    async fn list_node_chain_configs(&self, node_id: &str) -> Result<Vec<NodeChainConfig>>;

    /// Proposes a job spec to a node.
    async fn propose_job(&self, node_id: &str, spec: &str) -> Result<JobProposal>;

    /// Lists job proposals for a node.
    async fn list_jobs(&self, node_id: &str) -> Result<Vec<JobProposal>>;
}
