// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
use std::time::Duration;

use alloy_primitives::{Bytes, TxHash};
use thiserror::Error;

use crate::lane::LaneStep;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Invalid chain selector: {0}")]
    InvalidChainSelector(u64),

    #[error("Chain not found in address book: {0}")]
    ChainNotFound(u64),

    #[error("Chain not connected in environment: {0}")]
    ChainNotConnected(u64),

    #[error("Invalid address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Contract type must not be empty")]
    EmptyContractType,

    #[error("Invalid type and version {input:?}: {reason}")]
    InvalidTypeAndVersion { input: String, reason: String },

    #[error("Address {address} already exists for chain {selector}")]
    DuplicateAddress { selector: u64, address: String },

    #[error("Address {address} does not exist for chain {selector}")]
    AddressNotFound { selector: u64, address: String },

    #[error("No {contract_type} contract found for chain {selector}")]
    ContractNotFound {
        selector: u64,
        contract_type: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid chain config for node {node_id}: {reason}")]
    InvalidNodeConfig { node_id: String, reason: String },

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Offchain client error: {0}")]
    Offchain(String),

    /// Raw revert payload surfaced by a contract binding, before enrichment.
    #[error("Execution reverted with data {data}")]
    Revert { data: Bytes },

    #[error("Execution reverted on chain {selector}: {reason} (revert data: {data})")]
    ExecutionReverted {
        selector: u64,
        reason: String,
        data: Bytes,
    },

    #[error("Transaction {tx_hash} reverted on chain {selector} in block {block_number}")]
    TransactionReverted {
        selector: u64,
        tx_hash: TxHash,
        block_number: u64,
    },

    #[error("Timed out after {timeout:?} waiting for transaction {tx_hash} on chain {selector}")]
    ConfirmTimeout {
        selector: u64,
        tx_hash: TxHash,
        timeout: Duration,
    },

    #[error("Lane {from} -> {to} failed at step {step} on chain {selector}: {source}")]
    LaneStep {
        step: LaneStep,
        from: u64,
        to: u64,
        selector: u64,
        #[source]
        source: Box<DeployError>,
    },

    #[error("Contract call failed: {0}")]
    ContractCall(#[from] alloy_contract::Error),

    #[error("RPC error: {0}")]
    Rpc(#[from] alloy_json_rpc::RpcError<alloy_transport::TransportErrorKind>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Hex conversion error: {0}")]
    Hex(#[from] alloy_primitives::hex::FromHexError),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl DeployError {
    /// Returns the on-chain revert payload carried by this error, if any.
    ///
    /// Covers raw binding reverts as well as alloy contract and RPC errors whose
    /// JSON-RPC error response includes revert data.
    pub fn revert_data(&self) -> Option<Bytes> {
        match self {
            Self::Revert { data } | Self::ExecutionReverted { data, .. } => Some(data.clone()),
            Self::ContractCall(e) => e.as_revert_data(),
            Self::Rpc(e) => e.as_error_resp().and_then(|payload| payload.as_revert_data()),
            Self::LaneStep { source, .. } => source.revert_data(),
            _ => None,
        }
    }

    /// Returns the lane step that failed, if this error came from lane wiring.
    pub fn lane_step(&self) -> Option<LaneStep> {
        match self {
            Self::LaneStep { step, .. } => Some(*step),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DeployError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revert_data_from_raw_revert() {
        let data = Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]);
        let err = DeployError::Revert { data: data.clone() };
        assert_eq!(err.revert_data(), Some(data));
    }

    #[test]
    fn test_revert_data_absent_for_input_errors() {
        assert!(DeployError::InvalidChainSelector(1).revert_data().is_none());
        assert!(DeployError::Provider("boom".to_string())
            .revert_data()
            .is_none());
    }

    #[test]
    fn test_revert_data_through_lane_step() {
        let data = Bytes::from_static(&[0x01, 0x02]);
        let err = DeployError::LaneStep {
            step: LaneStep::RouterOnRamp,
            from: 1,
            to: 2,
            selector: 1,
            source: Box::new(DeployError::Revert { data: data.clone() }),
        };
        assert_eq!(err.revert_data(), Some(data));
        assert_eq!(err.lane_step(), Some(LaneStep::RouterOnRamp));
    }

    #[test]
    fn test_display_duplicate_address() {
        let err = DeployError::DuplicateAddress {
            selector: 5009297550715157269,
            address: "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".to_string(),
        };
        insta::assert_snapshot!(err.to_string(), @"Address 0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed already exists for chain 5009297550715157269");
    }
}
