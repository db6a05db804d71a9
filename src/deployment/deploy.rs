// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Deploy-confirm-record helper

use std::future::Future;

use alloy_primitives::{Address, TxHash};
use tracing::{info, Instrument};

use crate::deployment::address_book::AddressBook;
use crate::deployment::environment::{confirm_if_no_error, enrich_submission_error, Chain};
use crate::error::Result;
use crate::protocol::TypeAndVersion;
use crate::spans;

/// A contract whose creation transaction has been submitted.
#[derive(Debug, Clone)]
pub struct ContractDeploy<C> {
    pub address: Address,
    /// Handle to the deployed contract
    pub contract: C,
    pub tx_hash: TxHash,
    pub type_and_version: TypeAndVersion,
}

/// Deploys a contract, waits for it to be mined, then records it in `book`.
///
/// Submission errors go through [`confirm_if_no_error`], so reverts surface
/// with a decoded reason. Nothing is recorded unless the creation transaction
/// is confirmed.
///
/// # Example
///
/// ```rust,ignore
/// let router = deploy_contract(chain, book.as_ref(), |chain| async move {
///     let instance = Router::deploy(provider, wrapped_native, rmn_proxy).await?;
///     Ok(ContractDeploy {
///         address: *instance.address(),
///         contract: instance,
///         tx_hash,
///         type_and_version: TypeAndVersion::new(ContractType::ROUTER, V1_2_0)?,
///     })
/// })
/// .await?;
/// ```
pub async fn deploy_contract<C, F, Fut>(
    chain: &Chain,
    book: &dyn AddressBook,
    deploy: F,
) -> Result<ContractDeploy<C>>
where
    F: FnOnce(&Chain) -> Fut,
    Fut: Future<Output = Result<ContractDeploy<C>>>,
{
    let span = spans::deploy_contract(chain.selector());
    deploy_and_record(chain, book, deploy).instrument(span).await
}

async fn deploy_and_record<C, F, Fut>(
    chain: &Chain,
    book: &dyn AddressBook,
    deploy: F,
) -> Result<ContractDeploy<C>>
where
    F: FnOnce(&Chain) -> Fut,
    Fut: Future<Output = Result<ContractDeploy<C>>>,
{
    let deployed = match deploy(chain).await {
        Ok(deployed) => deployed,
        Err(e) => {
            let err = enrich_submission_error(chain.selector(), e);
            spans::record_error(&err);
            return Err(err);
        }
    };

    let current = tracing::Span::current();
    current.record("contract", tracing::field::display(deployed.address));
    current.record(
        "type_and_version",
        tracing::field::display(&deployed.type_and_version),
    );
    current.record("tx_hash", tracing::field::display(deployed.tx_hash));

    let block_number = confirm_if_no_error(chain, Ok(deployed.tx_hash))
        .await
        .inspect_err(|e| spans::record_error(e))?;

    book.save(
        chain.selector(),
        &deployed.address.to_checksum(None),
        deployed.type_and_version.clone(),
    )
    .inspect_err(|e| spans::record_error(e))?;

    info!(
        contract = %deployed.address,
        type_and_version = %deployed.type_and_version,
        block_number = block_number,
        event = "contract_deployed"
    );
    Ok(deployed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::deployment::address_book::AddressBookMap;
    use crate::error::DeployError;
    use crate::protocol::{ContractType, V1_2_0};
    use crate::testing::{FakeChainClient, FakeConfirmer, FakeLedger};
    use alloy_primitives::Bytes;

    const ANVIL: u64 = 7759470850252068959;

    fn chain(ledger: &FakeLedger) -> Chain {
        Chain::builder()
            .selector(ANVIL)
            .client(Arc::new(FakeChainClient::new()))
            .deployer_key(Address::repeat_byte(0x01))
            .confirmer(Arc::new(FakeConfirmer::new(ledger.clone())))
            .build()
    }

    fn router_deploy(tx_hash: TxHash) -> ContractDeploy<()> {
        ContractDeploy {
            address: Address::repeat_byte(0xaa),
            contract: (),
            tx_hash,
            type_and_version: TypeAndVersion::new(ContractType::ROUTER, V1_2_0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_deploy_records_confirmed_contract() {
        let ledger = FakeLedger::new();
        let chain = chain(&ledger);
        let book = AddressBookMap::new();
        let tx_hash = ledger.next_tx_hash();

        let deployed = deploy_contract(&chain, &book, |_| async move { Ok(router_deploy(tx_hash)) })
            .await
            .unwrap();

        assert_eq!(deployed.address, Address::repeat_byte(0xaa));
        let addresses = book.addresses_for_chain(ANVIL).unwrap();
        assert_eq!(
            addresses[&Address::repeat_byte(0xaa).to_checksum(None)].to_string(),
            "Router 1.2.0"
        );
    }

    #[tokio::test]
    async fn test_reverted_deploy_records_nothing() {
        let ledger = FakeLedger::new();
        let chain = chain(&ledger);
        let book = AddressBookMap::new();
        let tx_hash = ledger.next_tx_hash();
        ledger.revert_on_confirm(tx_hash);

        let err = deploy_contract(&chain, &book, |_| async move { Ok(router_deploy(tx_hash)) })
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::TransactionReverted { .. }));
        assert!(book.is_empty());
    }

    #[tokio::test]
    async fn test_submission_revert_is_enriched() {
        let ledger = FakeLedger::new();
        let chain = chain(&ledger);
        let book = AddressBookMap::new();

        let err = deploy_contract::<(), _, _>(&chain, &book, |_| async {
            Err(DeployError::Revert {
                data: Bytes::from_static(&[0xff]),
            })
        })
        .await
        .unwrap_err();

        assert!(matches!(err, DeployError::ExecutionReverted { selector: ANVIL, .. }));
        assert!(book.is_empty());
    }
}
