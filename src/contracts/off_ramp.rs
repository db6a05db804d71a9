// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! OffRamp contract bindings and wrapper
//!
//! The off-ramp accepts inbound messages from enabled source chains whose
//! on-ramp and router it has been told about.

use alloy_network::Ethereum;
use alloy_primitives::{Address, TxHash};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::sol;
use async_trait::async_trait;
use tracing::{debug, info};

use OffRamp::OffRampInstance;

use crate::contracts::send_transaction;
use crate::error::Result;
use crate::protocol::TypeAndVersion;

/// Off-ramp operations used by lane wiring.
#[async_trait]
pub trait OffRampBinding: Send + Sync {
    fn address(&self) -> Address;

    async fn apply_source_chain_config_updates(
        &self,
        from: Address,
        args: Vec<OffRamp::SourceChainConfigArgs>,
    ) -> Result<TxHash>;
}

/// OffRamp contract wrapper
pub struct OffRampContract<P: Provider<Ethereum>> {
    instance: OffRampInstance<P>,
}

impl<P: Provider<Ethereum>> OffRampContract<P> {
    pub fn new(address: Address, provider: P) -> Self {
        debug!(
            contract_address = %address,
            event = "off_ramp_contract_initialized"
        );
        Self {
            instance: OffRampInstance::new(address, provider),
        }
    }

    /// Create the transaction request for `applySourceChainConfigUpdates`.
    pub fn apply_source_chain_config_updates_transaction(
        &self,
        from: Address,
        args: Vec<OffRamp::SourceChainConfigArgs>,
    ) -> TransactionRequest {
        info!(
            from = %from,
            sources = ?args.iter().map(|a| a.sourceChainSelector).collect::<Vec<_>>(),
            contract_address = %self.instance.address(),
            event = "off_ramp_source_chain_config_transaction_created"
        );

        self.instance
            .applySourceChainConfigUpdates(args)
            .from(from)
            .into_transaction_request()
    }

    pub async fn type_and_version(&self) -> Result<TypeAndVersion> {
        let raw = self.instance.typeAndVersion().call().await?;
        TypeAndVersion::parse(&raw)
    }
}

#[async_trait]
impl<P: Provider<Ethereum>> OffRampBinding for OffRampContract<P> {
    fn address(&self) -> Address {
        *self.instance.address()
    }

    async fn apply_source_chain_config_updates(
        &self,
        from: Address,
        args: Vec<OffRamp::SourceChainConfigArgs>,
    ) -> Result<TxHash> {
        let tx = self.apply_source_chain_config_updates_transaction(from, args);
        send_transaction(self.instance.provider(), tx).await
    }
}

sol!(
    #[allow(missing_docs)]
    #[sol(rpc, all_derives)]
    contract OffRamp {
        struct SourceChainConfigArgs {
            address router;
            uint64 sourceChainSelector;
            bool isEnabled;
            bytes onRamp;
        }

        function applySourceChainConfigUpdates(SourceChainConfigArgs[] memory sourceChainConfigUpdates) external;

        function typeAndVersion() external view returns (string memory);
    }
);
