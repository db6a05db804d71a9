// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Payloads exchanged with the off-chain job distributor

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::protocol::ChainFamily;

/// A node registered with the job distributor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffchainNode {
    pub id: String,
    pub name: String,
    /// Node's CSA (communication) public key, hex encoded
    pub csa_public_key: String,
    pub is_connected: bool,
}

/// Key material a node uses to sign reports on one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrKeyBundle {
    pub bundle_id: String,
    /// Hex-encoded on-chain signing key
    pub onchain_signing_address: String,
    /// Hex-encoded 32-byte offchain public key
    pub offchain_public_key: String,
    /// Hex-encoded 32-byte config encryption key
    pub config_encryption_public_key: String,
}

/// OCR2 settings a node reports for one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ocr2Config {
    pub enabled: bool,
    pub is_bootstrap: bool,
    /// Peer id, with or without the `p2p_` prefix
    pub peer_id: String,
    /// Bootstrap listen address; empty for non-bootstrap nodes
    #[serde(default)]
    pub multi_addr: String,
    /// Absent on bootstrap nodes
    pub key_bundle: Option<OcrKeyBundle>,
}

/// Per-chain configuration reported by a node, tagged by chain family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "lowercase")]
#[non_exhaustive]
pub enum NodeChainConfig {
    Evm {
        chain_id: u64,
        account_address: Address,
        admin_address: Address,
        ocr2: Option<Ocr2Config>,
    },
    Solana {
        genesis_hash: String,
        account_address: String,
        admin_address: String,
        ocr2: Option<Ocr2Config>,
    },
    Aptos {
        chain_id: String,
        account_address: String,
        admin_address: String,
        ocr2: Option<Ocr2Config>,
    },
}

impl NodeChainConfig {
    pub fn family(&self) -> ChainFamily {
        match self {
            Self::Evm { .. } => ChainFamily::Evm,
            Self::Solana { .. } => ChainFamily::Solana,
            Self::Aptos { .. } => ChainFamily::Aptos,
        }
    }

    /// Family-native chain id, as stored in the chain catalog.
    pub fn chain_id(&self) -> String {
        match self {
            Self::Evm { chain_id, .. } => chain_id.to_string(),
            Self::Solana { genesis_hash, .. } => genesis_hash.clone(),
            Self::Aptos { chain_id, .. } => chain_id.clone(),
        }
    }

    /// Account the node transmits from on this chain.
    pub fn account_address(&self) -> String {
        match self {
            Self::Evm {
                account_address, ..
            } => account_address.to_checksum(None),
            Self::Solana {
                account_address, ..
            }
            | Self::Aptos {
                account_address, ..
            } => account_address.clone(),
        }
    }

    pub fn admin_address(&self) -> String {
        match self {
            Self::Evm { admin_address, .. } => admin_address.to_checksum(None),
            Self::Solana { admin_address, .. } | Self::Aptos { admin_address, .. } => {
                admin_address.clone()
            }
        }
    }

    pub fn ocr2(&self) -> Option<&Ocr2Config> {
        match self {
            Self::Evm { ocr2, .. } | Self::Solana { ocr2, .. } | Self::Aptos { ocr2, .. } => {
                ocr2.as_ref()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

/// A job spec proposed to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobProposal {
    pub id: String,
    pub node_id: String,
    pub spec: String,
    pub status: ProposalStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_chain_config_tagged_by_family() {
        let config = NodeChainConfig::Evm {
            chain_id: 1,
            account_address: address!("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"),
            admin_address: address!("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"),
            ocr2: None,
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["family"], "evm");
        assert_eq!(json["chain_id"], 1);

        let back: NodeChainConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
        assert_eq!(back.family(), ChainFamily::Evm);
        assert_eq!(back.chain_id(), "1");
    }

    #[test]
    fn test_solana_config_from_json() {
        let json = r#"{
            "family": "solana",
            "genesis_hash": "EtWTRABZaYq6iMfeYKouRu166VU2xqa1wcaWoxPkrZBG",
            "account_address": "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA",
            "admin_address": "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA",
            "ocr2": {
                "enabled": true,
                "is_bootstrap": true,
                "peer_id": "p2p_12D3KooWbootstrap",
                "multi_addr": "127.0.0.1:6690",
                "key_bundle": null
            }
        }"#;
        let config: NodeChainConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.family(), ChainFamily::Solana);
        assert!(config.ocr2().unwrap().is_bootstrap);
    }
}
