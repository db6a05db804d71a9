// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! OnRamp contract bindings and wrapper
//!
//! The on-ramp originates outbound messages and only accepts them from the
//! router configured for each destination.

use alloy_network::Ethereum;
use alloy_primitives::{Address, TxHash};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::sol;
use async_trait::async_trait;
use tracing::{debug, info};

use OnRamp::OnRampInstance;

use crate::contracts::send_transaction;
use crate::error::Result;
use crate::protocol::TypeAndVersion;

/// On-ramp operations used by lane wiring.
#[async_trait]
pub trait OnRampBinding: Send + Sync {
    fn address(&self) -> Address;

    async fn apply_dest_chain_config_updates(
        &self,
        from: Address,
        args: Vec<OnRamp::DestChainConfigArgs>,
    ) -> Result<TxHash>;
}

/// OnRamp contract wrapper
pub struct OnRampContract<P: Provider<Ethereum>> {
    instance: OnRampInstance<P>,
}

impl<P: Provider<Ethereum>> OnRampContract<P> {
    pub fn new(address: Address, provider: P) -> Self {
        debug!(
            contract_address = %address,
            event = "on_ramp_contract_initialized"
        );
        Self {
            instance: OnRampInstance::new(address, provider),
        }
    }

    /// Create the transaction request for `applyDestChainConfigUpdates`.
    pub fn apply_dest_chain_config_updates_transaction(
        &self,
        from: Address,
        args: Vec<OnRamp::DestChainConfigArgs>,
    ) -> TransactionRequest {
        info!(
            from = %from,
            destinations = ?args.iter().map(|a| a.destChainSelector).collect::<Vec<_>>(),
            contract_address = %self.instance.address(),
            event = "on_ramp_dest_chain_config_transaction_created"
        );

        self.instance
            .applyDestChainConfigUpdates(args)
            .from(from)
            .into_transaction_request()
    }

    pub async fn type_and_version(&self) -> Result<TypeAndVersion> {
        let raw = self.instance.typeAndVersion().call().await?;
        TypeAndVersion::parse(&raw)
    }
}

#[async_trait]
impl<P: Provider<Ethereum>> OnRampBinding for OnRampContract<P> {
    fn address(&self) -> Address {
        *self.instance.address()
    }

    async fn apply_dest_chain_config_updates(
        &self,
        from: Address,
        args: Vec<OnRamp::DestChainConfigArgs>,
    ) -> Result<TxHash> {
        let tx = self.apply_dest_chain_config_updates_transaction(from, args);
        send_transaction(self.instance.provider(), tx).await
    }
}

sol!(
    #[allow(missing_docs)]
    #[sol(rpc, all_derives)]
    contract OnRamp {
        struct DestChainConfigArgs {
            uint64 destChainSelector;
            address router;
        }

        function applyDestChainConfigUpdates(DestChainConfigArgs[] calldata destChainConfigArgs) external;

        function typeAndVersion() external view returns (string memory);
    }
);
