// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Receipt-polling transaction confirmer.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::TxHash;
use async_trait::async_trait;
use bon::Builder;
use tracing::{debug, info, Instrument};

use crate::chain::ConfirmConfig;
use crate::error::{DeployError, Result};
use crate::providers::TokioClock;
use crate::spans;
use crate::traits::{ChainClient, Clock, Confirmer, TxStatus};

/// Production [`Confirmer`] that polls a [`ChainClient`] for the receipt.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use ccip_deploy::providers::{AlloyChainClient, ReceiptConfirmer};
/// use ccip_deploy::ConfirmConfig;
/// use alloy_network::Ethereum;
/// use alloy_provider::ProviderBuilder;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = ProviderBuilder::new().connect_http("http://localhost:8545".parse()?);
/// let confirmer = ReceiptConfirmer::builder()
///     .selector(7759470850252068959)
///     .client(Arc::new(AlloyChainClient::<Ethereum, _>::new(provider)))
///     .config(ConfirmConfig::fast())
///     .build();
/// # Ok(())
/// # }
/// ```
#[derive(Builder, Clone)]
pub struct ReceiptConfirmer {
    selector: u64,
    client: Arc<dyn ChainClient>,
    #[builder(default = Arc::new(TokioClock))]
    clock: Arc<dyn Clock>,
    #[builder(default)]
    config: ConfirmConfig,
}

impl std::fmt::Debug for ReceiptConfirmer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReceiptConfirmer")
            .field("selector", &self.selector)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ReceiptConfirmer {
    pub fn config(&self) -> ConfirmConfig {
        self.config
    }

    async fn poll(&self, tx_hash: TxHash) -> Result<u64> {
        let max_attempts = self.config.max_attempts;
        let poll_interval = Duration::from_secs(self.config.poll_interval_secs);

        for attempt in 1..=max_attempts {
            let status = match self.client.transaction_status(tx_hash).await {
                Ok(status) => status,
                Err(e) => {
                    spans::record_error_with_context(
                        "ReceiptLookupFailed",
                        &e.to_string(),
                        Some(&format!("Attempt {attempt}/{max_attempts}")),
                    );
                    return Err(e);
                }
            };

            match status {
                Some(TxStatus {
                    block_number,
                    succeeded: true,
                }) => {
                    tracing::Span::current().record("block_number", block_number);
                    info!(
                        block_number = block_number,
                        attempt = attempt,
                        event = "transaction_confirmed"
                    );
                    return Ok(block_number);
                }
                Some(TxStatus {
                    block_number,
                    succeeded: false,
                }) => {
                    let err = DeployError::TransactionReverted {
                        selector: self.selector,
                        tx_hash,
                        block_number,
                    };
                    spans::record_error(&err);
                    return Err(err);
                }
                None => {
                    debug!(attempt = attempt, event = "transaction_pending");
                    if attempt < max_attempts {
                        self.clock.sleep(poll_interval).await;
                    }
                }
            }
        }

        let err = DeployError::ConfirmTimeout {
            selector: self.selector,
            tx_hash,
            timeout: Duration::from_secs(self.config.total_timeout_secs()),
        };
        spans::record_error_with_context(
            "ConfirmTimeout",
            &err.to_string(),
            Some(&format!("{max_attempts} attempts exhausted")),
        );
        Err(err)
    }
}

#[async_trait]
impl Confirmer for ReceiptConfirmer {
    async fn confirm(&self, tx_hash: TxHash) -> Result<u64> {
        let span = spans::confirm_transaction(
            self.selector,
            tx_hash,
            self.config.max_attempts,
            self.config.poll_interval_secs,
        );
        self.poll(tx_hash).instrument(span).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeChainClient, FakeClock};

    fn confirmer(client: FakeChainClient, clock: FakeClock) -> ReceiptConfirmer {
        ReceiptConfirmer::builder()
            .selector(7759470850252068959)
            .client(Arc::new(client))
            .clock(Arc::new(clock))
            .config(ConfirmConfig::default().with_max_attempts(3))
            .build()
    }

    #[tokio::test]
    async fn test_confirms_after_pending_polls() {
        let tx_hash = TxHash::repeat_byte(0x11);
        let client = FakeChainClient::new().with_status_sequence(
            tx_hash,
            vec![
                None,
                None,
                Some(TxStatus {
                    block_number: 42,
                    succeeded: true,
                }),
            ],
        );
        let clock = FakeClock::new();

        let block = confirmer(client, clock.clone()).confirm(tx_hash).await.unwrap();

        assert_eq!(block, 42);
        assert_eq!(clock.sleep_count(), 2);
        assert_eq!(clock.total_sleep_time(), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_reverted_transaction_is_error() {
        let tx_hash = TxHash::repeat_byte(0x22);
        let client = FakeChainClient::new().with_status_sequence(
            tx_hash,
            vec![Some(TxStatus {
                block_number: 7,
                succeeded: false,
            })],
        );

        let err = confirmer(client, FakeClock::new())
            .confirm(tx_hash)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DeployError::TransactionReverted {
                block_number: 7,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_exhausted_attempts_is_timeout() {
        let tx_hash = TxHash::repeat_byte(0x33);
        let clock = FakeClock::new();

        let err = confirmer(FakeChainClient::new(), clock.clone())
            .confirm(tx_hash)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DeployError::ConfirmTimeout { timeout, .. } if timeout == Duration::from_secs(15)
        ));
        // No sleep after the final attempt
        assert_eq!(clock.sleep_count(), 2);
    }

    #[tokio::test]
    async fn test_rpc_failure_propagates() {
        let tx_hash = TxHash::repeat_byte(0x44);
        let client = FakeChainClient::new().with_rpc_failure("connection refused");

        let err = confirmer(client, FakeClock::new())
            .confirm(tx_hash)
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::Provider(_)));
    }
}
