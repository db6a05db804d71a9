// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Alloy-based chain client implementation.

use alloy_network::{Network, ReceiptResponse};
use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::Provider;
use alloy_rpc_types::BlockId;
use async_trait::async_trait;
use tracing::{debug, instrument, trace};

use crate::error::{DeployError, Result};
use crate::traits::{ChainClient, TxStatus};

/// Production chain client wrapping Alloy's [`Provider`] trait.
///
/// # Type Parameters
///
/// - `N`: The network type (e.g., `Ethereum`)
/// - `P`: The underlying Alloy provider implementation
///
/// # Examples
///
/// ```rust,no_run
/// use ccip_deploy::providers::AlloyChainClient;
/// use alloy_network::Ethereum;
/// use alloy_provider::ProviderBuilder;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = ProviderBuilder::new().connect_http("http://localhost:8545".parse()?);
/// let client = AlloyChainClient::<Ethereum, _>::new(provider);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AlloyChainClient<N, P>
where
    N: Network,
    P: Provider<N> + Clone,
{
    provider: P,
    _network: std::marker::PhantomData<N>,
}

impl<N, P> AlloyChainClient<N, P>
where
    N: Network,
    P: Provider<N> + Clone,
{
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            _network: std::marker::PhantomData,
        }
    }

    /// Returns a reference to the underlying Alloy provider.
    pub fn inner(&self) -> &P {
        &self.provider
    }
}

fn block_id(block: Option<u64>) -> BlockId {
    block.map(BlockId::number).unwrap_or_else(BlockId::latest)
}

#[async_trait]
impl<N, P> ChainClient for AlloyChainClient<N, P>
where
    N: Network,
    P: Provider<N> + Clone + Send + Sync,
{
    #[instrument(skip(self), fields(tx_hash = %tx_hash))]
    async fn transaction_status(&self, tx_hash: TxHash) -> Result<Option<TxStatus>> {
        trace!("Fetching transaction receipt");
        let receipt = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| DeployError::Provider(e.to_string()))?;

        let Some(receipt) = receipt else {
            debug!("Transaction receipt not found");
            return Ok(None);
        };

        // Pending-block receipts carry no block number yet.
        let Some(block_number) = receipt.block_number() else {
            debug!("Transaction receipt has no block number yet");
            return Ok(None);
        };

        debug!(
            block_number = block_number,
            succeeded = receipt.status(),
            "Transaction receipt found"
        );
        Ok(Some(TxStatus {
            block_number,
            succeeded: receipt.status(),
        }))
    }

    #[instrument(skip(self))]
    async fn block_number(&self) -> Result<u64> {
        trace!("Fetching current block number");
        let block_number = self
            .provider
            .get_block_number()
            .await
            .map_err(|e| DeployError::Provider(e.to_string()))?;

        debug!(
            block_number = block_number,
            "Current block number retrieved"
        );
        Ok(block_number)
    }

    #[instrument(skip(self), fields(account = %account))]
    async fn balance(&self, account: Address, block: Option<u64>) -> Result<U256> {
        self.provider
            .get_balance(account)
            .block_id(block_id(block))
            .await
            .map_err(|e| DeployError::Provider(e.to_string()))
    }

    #[instrument(skip(self), fields(account = %account))]
    async fn nonce(&self, account: Address, block: Option<u64>) -> Result<u64> {
        self.provider
            .get_transaction_count(account)
            .block_id(block_id(block))
            .await
            .map_err(|e| DeployError::Provider(e.to_string()))
    }
}
