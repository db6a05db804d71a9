// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Router contract bindings and wrapper
//!
//! The router dispatches outbound messages to the on-ramp registered for
//! their destination and accepts inbound messages only from registered
//! off-ramps.

use std::marker::PhantomData;

use alloy_contract::CallBuilder;
use alloy_network::Ethereum;
use alloy_primitives::{Address, TxHash};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::sol;
use async_trait::async_trait;
use tracing::{debug, info};

use Router::{applyRampUpdatesCall, RouterInstance};

use crate::contracts::send_transaction;
use crate::error::Result;
use crate::protocol::TypeAndVersion;

/// Router operations used by lane wiring.
#[async_trait]
pub trait RouterBinding: Send + Sync {
    fn address(&self) -> Address;

    /// Submits `applyRampUpdates` from `from` and returns the transaction hash.
    async fn apply_ramp_updates(
        &self,
        from: Address,
        on_ramp_updates: Vec<Router::OnRamp>,
        off_ramp_removes: Vec<Router::OffRamp>,
        off_ramp_adds: Vec<Router::OffRamp>,
    ) -> Result<TxHash>;
}

/// Router contract wrapper
pub struct RouterContract<P: Provider<Ethereum>> {
    instance: RouterInstance<P>,
}

impl<P: Provider<Ethereum>> RouterContract<P> {
    pub fn new(address: Address, provider: P) -> Self {
        debug!(
            contract_address = %address,
            event = "router_contract_initialized"
        );
        Self {
            instance: RouterInstance::new(address, provider),
        }
    }

    /// Create the call builder for the `applyRampUpdates` function.
    ///
    /// Most users will want to use `apply_ramp_updates_transaction` instead.
    pub fn apply_ramp_updates_call_builder(
        &self,
        from: Address,
        on_ramp_updates: Vec<Router::OnRamp>,
        off_ramp_removes: Vec<Router::OffRamp>,
        off_ramp_adds: Vec<Router::OffRamp>,
    ) -> CallBuilder<&P, PhantomData<applyRampUpdatesCall>> {
        self.instance
            .applyRampUpdates(on_ramp_updates, off_ramp_removes, off_ramp_adds)
            .from(from)
    }

    /// Create the transaction request for the `applyRampUpdates` function.
    pub fn apply_ramp_updates_transaction(
        &self,
        from: Address,
        on_ramp_updates: Vec<Router::OnRamp>,
        off_ramp_removes: Vec<Router::OffRamp>,
        off_ramp_adds: Vec<Router::OffRamp>,
    ) -> TransactionRequest {
        info!(
            from = %from,
            on_ramp_updates = on_ramp_updates.len(),
            off_ramp_removes = off_ramp_removes.len(),
            off_ramp_adds = off_ramp_adds.len(),
            contract_address = %self.instance.address(),
            event = "apply_ramp_updates_transaction_created"
        );

        self.apply_ramp_updates_call_builder(from, on_ramp_updates, off_ramp_removes, off_ramp_adds)
            .into_transaction_request()
    }

    /// Returns the on-ramp registered for `dest_chain_selector`, or the zero
    /// address if none.
    pub async fn get_on_ramp(&self, dest_chain_selector: u64) -> Result<Address> {
        Ok(self.instance.getOnRamp(dest_chain_selector).call().await?)
    }

    /// Returns true if `off_ramp` is registered for `source_chain_selector`.
    pub async fn is_off_ramp(&self, source_chain_selector: u64, off_ramp: Address) -> Result<bool> {
        Ok(self
            .instance
            .isOffRamp(source_chain_selector, off_ramp)
            .call()
            .await?)
    }

    /// Reads the on-chain `typeAndVersion()` string.
    pub async fn type_and_version(&self) -> Result<TypeAndVersion> {
        let raw = self.instance.typeAndVersion().call().await?;
        TypeAndVersion::parse(&raw)
    }
}

#[async_trait]
impl<P: Provider<Ethereum>> RouterBinding for RouterContract<P> {
    fn address(&self) -> Address {
        *self.instance.address()
    }

    async fn apply_ramp_updates(
        &self,
        from: Address,
        on_ramp_updates: Vec<Router::OnRamp>,
        off_ramp_removes: Vec<Router::OffRamp>,
        off_ramp_adds: Vec<Router::OffRamp>,
    ) -> Result<TxHash> {
        let tx = self.apply_ramp_updates_transaction(
            from,
            on_ramp_updates,
            off_ramp_removes,
            off_ramp_adds,
        );
        send_transaction(self.instance.provider(), tx).await
    }
}

sol!(
    #[allow(missing_docs)]
    #[sol(rpc, all_derives)]
    contract Router {
        struct OnRamp {
            uint64 destChainSelector;
            address onRamp;
        }

        struct OffRamp {
            uint64 sourceChainSelector;
            address offRamp;
        }

        function applyRampUpdates(
            OnRamp[] calldata onRampUpdates,
            OffRamp[] calldata offRampRemoves,
            OffRamp[] calldata offRampAdds
        ) external;

        function getOnRamp(uint64 destChainSelector) external view returns (address);

        function isOffRamp(uint64 sourceChainSelector, address offRamp) external view returns (bool);

        function typeAndVersion() external view returns (string memory);
    }
);
