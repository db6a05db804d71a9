// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! FeeQuoter contract bindings and wrapper
//!
//! The fee quoter prices outbound messages. A lane needs token prices for the
//! fee tokens, a gas price for the destination and a destination chain config
//! before the on-ramp will quote fees for it.

use alloy_network::Ethereum;
use alloy_primitives::{Address, TxHash};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::sol;
use async_trait::async_trait;
use tracing::{debug, info};

use FeeQuoter::FeeQuoterInstance;

use crate::contracts::send_transaction;
use crate::error::Result;
use crate::protocol::TypeAndVersion;

/// Fee-quoter operations used by lane wiring.
#[async_trait]
pub trait FeeQuoterBinding: Send + Sync {
    fn address(&self) -> Address;

    async fn update_prices(&self, from: Address, updates: FeeQuoter::PriceUpdates)
        -> Result<TxHash>;

    async fn apply_dest_chain_config_updates(
        &self,
        from: Address,
        args: Vec<FeeQuoter::DestChainConfigArgs>,
    ) -> Result<TxHash>;
}

/// FeeQuoter contract wrapper
pub struct FeeQuoterContract<P: Provider<Ethereum>> {
    instance: FeeQuoterInstance<P>,
}

impl<P: Provider<Ethereum>> FeeQuoterContract<P> {
    pub fn new(address: Address, provider: P) -> Self {
        debug!(
            contract_address = %address,
            event = "fee_quoter_contract_initialized"
        );
        Self {
            instance: FeeQuoterInstance::new(address, provider),
        }
    }

    /// Create the transaction request for `updatePrices`.
    pub fn update_prices_transaction(
        &self,
        from: Address,
        updates: FeeQuoter::PriceUpdates,
    ) -> TransactionRequest {
        info!(
            from = %from,
            token_price_updates = updates.tokenPriceUpdates.len(),
            gas_price_updates = updates.gasPriceUpdates.len(),
            contract_address = %self.instance.address(),
            event = "update_prices_transaction_created"
        );

        self.instance
            .updatePrices(updates)
            .from(from)
            .into_transaction_request()
    }

    /// Create the transaction request for `applyDestChainConfigUpdates`.
    pub fn apply_dest_chain_config_updates_transaction(
        &self,
        from: Address,
        args: Vec<FeeQuoter::DestChainConfigArgs>,
    ) -> TransactionRequest {
        info!(
            from = %from,
            destinations = ?args.iter().map(|a| a.destChainSelector).collect::<Vec<_>>(),
            contract_address = %self.instance.address(),
            event = "fee_quoter_dest_chain_config_transaction_created"
        );

        self.instance
            .applyDestChainConfigUpdates(args)
            .from(from)
            .into_transaction_request()
    }

    pub async fn get_dest_chain_config(
        &self,
        dest_chain_selector: u64,
    ) -> Result<FeeQuoter::DestChainConfig> {
        Ok(self
            .instance
            .getDestChainConfig(dest_chain_selector)
            .call()
            .await?)
    }

    pub async fn type_and_version(&self) -> Result<TypeAndVersion> {
        let raw = self.instance.typeAndVersion().call().await?;
        TypeAndVersion::parse(&raw)
    }
}

#[async_trait]
impl<P: Provider<Ethereum>> FeeQuoterBinding for FeeQuoterContract<P> {
    fn address(&self) -> Address {
        *self.instance.address()
    }

    async fn update_prices(
        &self,
        from: Address,
        updates: FeeQuoter::PriceUpdates,
    ) -> Result<TxHash> {
        let tx = self.update_prices_transaction(from, updates);
        send_transaction(self.instance.provider(), tx).await
    }

    async fn apply_dest_chain_config_updates(
        &self,
        from: Address,
        args: Vec<FeeQuoter::DestChainConfigArgs>,
    ) -> Result<TxHash> {
        let tx = self.apply_dest_chain_config_updates_transaction(from, args);
        send_transaction(self.instance.provider(), tx).await
    }
}

sol!(
    #[allow(missing_docs)]
    #[sol(rpc, all_derives)]
    contract FeeQuoter {
        struct TokenPriceUpdate {
            address sourceToken;
            uint224 usdPerToken;
        }

        struct GasPriceUpdate {
            uint64 destChainSelector;
            uint224 usdPerUnitGas;
        }

        struct PriceUpdates {
            TokenPriceUpdate[] tokenPriceUpdates;
            GasPriceUpdate[] gasPriceUpdates;
        }

        struct DestChainConfig {
            bool isEnabled;
            uint16 maxNumberOfTokensPerMsg;
            uint32 maxDataBytes;
            uint32 maxPerMsgGasLimit;
            uint32 destGasOverhead;
            uint16 destGasPerPayloadByte;
            uint32 destDataAvailabilityOverheadGas;
            uint16 destGasPerDataAvailabilityByte;
            uint16 destDataAvailabilityMultiplierBps;
            uint16 defaultTokenFeeUSDCents;
            uint32 defaultTokenDestGasOverhead;
            uint32 defaultTxGasLimit;
            uint64 gasMultiplierWeiPerEth;
            uint32 networkFeeUSDCents;
            uint32 gasPriceStalenessThreshold;
            bool enforceOutOfOrder;
            bytes4 chainFamilySelector;
        }

        struct DestChainConfigArgs {
            uint64 destChainSelector;
            DestChainConfig destChainConfig;
        }

        function updatePrices(PriceUpdates calldata priceUpdates) external;

        function applyDestChainConfigUpdates(DestChainConfigArgs[] memory destChainConfigArgs) external;

        function getDestChainConfig(uint64 destChainSelector) external view returns (DestChainConfig memory);

        function typeAndVersion() external view returns (string memory);
    }
);
