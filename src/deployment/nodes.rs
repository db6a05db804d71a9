// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Off-chain worker node descriptors
//!
//! [`Nodes`] is a snapshot of the report-generating nodes a deployment talks
//! to, built from what each node reports to the job distributor. Its views
//! (`peer_ids`, `default_f`, `bootstrap_locators`, ...) are derived on demand
//! and carry no hidden state.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use alloy_primitives::{hex, Bytes, FixedBytes};
use tracing::{debug, Instrument};

use crate::chain::chain_by_id;
use crate::deployment::offchain::{NodeChainConfig, OcrKeyBundle};
use crate::error::{DeployError, Result};
use crate::spans;
use crate::traits::OffchainClient;

const PEER_ID_PREFIX: &str = "p2p_";

/// A libp2p peer id, stored without the `p2p_` prefix.
///
/// # Example
///
/// ```rust
/// use ccip_deploy::PeerId;
///
/// let peer_id = PeerId::parse("p2p_12D3KooWabc").unwrap();
/// assert_eq!(peer_id.raw(), "12D3KooWabc");
/// assert_eq!(peer_id.to_string(), "p2p_12D3KooWabc");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(String);

impl PeerId {
    /// Parses a peer id with or without the `p2p_` prefix.
    pub fn parse(input: &str) -> Result<Self> {
        let raw = input.strip_prefix(PEER_ID_PREFIX).unwrap_or(input);
        if raw.is_empty() {
            return Err(DeployError::InvalidConfig(format!(
                "empty peer id {input:?}"
            )));
        }
        Ok(Self(raw.to_string()))
    }

    /// The peer id without prefix, as used in bootstrap locators.
    pub fn raw(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PEER_ID_PREFIX}{}", self.0)
    }
}

/// Per-chain OCR signing configuration of a non-bootstrap node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrConfig {
    pub key_bundle_id: String,
    pub onchain_public_key: Bytes,
    pub offchain_public_key: FixedBytes<32>,
    pub config_encryption_public_key: FixedBytes<32>,
    pub transmit_account: String,
    pub peer_id: PeerId,
}

impl OcrConfig {
    fn from_bundle(
        bundle: &OcrKeyBundle,
        transmit_account: String,
        peer_id: PeerId,
    ) -> Result<Self> {
        Ok(Self {
            key_bundle_id: bundle.bundle_id.clone(),
            onchain_public_key: hex::decode(&bundle.onchain_signing_address)?.into(),
            offchain_public_key: bundle.offchain_public_key.parse()?,
            config_encryption_public_key: bundle.config_encryption_public_key.parse()?,
            transmit_account,
            peer_id,
        })
    }
}

/// One off-chain worker node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub node_id: String,
    pub name: String,
    pub csa_key: String,
    /// OCR configuration keyed by chain selector
    pub sel_to_ocr_config: BTreeMap<u64, OcrConfig>,
    pub peer_id: PeerId,
    pub is_bootstrap: bool,
    pub multi_addr: String,
    pub admin_addr: String,
}

impl Node {
    /// Selectors this node signs for, ascending.
    pub fn supported_selectors(&self) -> Vec<u64> {
        self.sel_to_ocr_config.keys().copied().collect()
    }

    pub fn ocr_config_for_chain(&self, selector: u64) -> Option<&OcrConfig> {
        self.sel_to_ocr_config.get(&selector)
    }
}

/// A set of off-chain worker nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Nodes(Vec<Node>);

impl Nodes {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self(nodes)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.0.iter()
    }

    /// Peer ids of every node, sorted.
    pub fn peer_ids(&self) -> Vec<PeerId> {
        let mut peer_ids: Vec<PeerId> = self.0.iter().map(|n| n.peer_id.clone()).collect();
        peer_ids.sort();
        peer_ids
    }

    /// Nodes that are not bootstrap nodes, in input order.
    pub fn non_bootstraps(&self) -> Nodes {
        Nodes(self.0.iter().filter(|n| !n.is_bootstrap).cloned().collect())
    }

    /// Byzantine fault tolerance parameter, `floor(n / 3)`.
    pub fn default_f(&self) -> usize {
        self.0.len() / 3
    }

    /// Deduplicated `peerID@multiaddr` strings of the bootstrap nodes, sorted.
    ///
    /// A multiaddr that already contains `@` is used verbatim.
    pub fn bootstrap_locators(&self) -> Vec<String> {
        self.0
            .iter()
            .filter(|n| n.is_bootstrap)
            .map(|n| {
                if n.multi_addr.contains('@') {
                    n.multi_addr.clone()
                } else {
                    format!("{}@{}", n.peer_id.raw(), n.multi_addr)
                }
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Builds node descriptors from the chain configs each node reports to the
    /// job distributor.
    ///
    /// Configs without an enabled OCR2 section are skipped. A bootstrap config
    /// marks the node as bootstrap and sets its multiaddr; every other enabled
    /// config must carry a key bundle. All configs of a node must agree on the
    /// peer id.
    pub async fn from_offchain(node_ids: &[String], offchain: &dyn OffchainClient) -> Result<Self> {
        let span = spans::node_info(node_ids.len());
        async {
            let mut nodes = Vec::with_capacity(node_ids.len());
            for node_id in node_ids {
                let node = match load_node(node_id, offchain).await {
                    Ok(node) => node,
                    Err(e) => {
                        spans::record_error_with_context(
                            "NodeInfoFailed",
                            &e.to_string(),
                            Some(&format!("node {node_id}")),
                        );
                        return Err(e);
                    }
                };
                debug!(
                    node_id = %node.node_id,
                    peer_id = %node.peer_id,
                    is_bootstrap = node.is_bootstrap,
                    chains = node.sel_to_ocr_config.len(),
                    event = "node_info_loaded"
                );
                nodes.push(node);
            }
            Ok(Nodes(nodes))
        }
        .instrument(span)
        .await
    }
}

impl IntoIterator for Nodes {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<Node> for Nodes {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

async fn load_node(node_id: &str, offchain: &dyn OffchainClient) -> Result<Node> {
    let info = offchain.get_node(node_id).await?;
    let chain_configs = offchain.list_node_chain_configs(node_id).await?;

    let invalid = |reason: String| DeployError::InvalidNodeConfig {
        node_id: node_id.to_string(),
        reason,
    };

    let mut peer_id: Option<PeerId> = None;
    let mut is_bootstrap = false;
    let mut multi_addr = String::new();
    let mut admin_addr = String::new();
    let mut sel_to_ocr_config = BTreeMap::new();

    for config in &chain_configs {
        let Some(ocr2) = config.ocr2().filter(|o| o.enabled) else {
            continue;
        };

        let details = chain_by_id(&config.chain_id(), config.family()).map_err(|_| {
            invalid(format!(
                "unknown {} chain id {}",
                config.family(),
                config.chain_id()
            ))
        })?;

        let this_peer = PeerId::parse(&ocr2.peer_id).map_err(|e| invalid(e.to_string()))?;
        match &peer_id {
            Some(existing) if existing != &this_peer => {
                return Err(invalid(format!(
                    "peer id {this_peer} on chain {} differs from {existing}",
                    details.selector
                )));
            }
            Some(_) => {}
            None => peer_id = Some(this_peer.clone()),
        }

        if admin_addr.is_empty() && matches!(config, NodeChainConfig::Evm { .. }) {
            admin_addr = config.admin_address();
        }

        if ocr2.is_bootstrap {
            is_bootstrap = true;
            multi_addr = ocr2.multi_addr.clone();
            continue;
        }

        let bundle = ocr2.key_bundle.as_ref().ok_or_else(|| {
            invalid(format!("missing OCR key bundle for chain {}", details.selector))
        })?;
        let ocr_config = OcrConfig::from_bundle(bundle, config.account_address(), this_peer)
            .map_err(|e| invalid(format!("chain {}: {e}", details.selector)))?;
        sel_to_ocr_config.insert(details.selector, ocr_config);
    }

    let peer_id = peer_id.ok_or_else(|| invalid("no enabled OCR2 chain config".to_string()))?;

    Ok(Node {
        node_id: node_id.to_string(),
        name: info.name,
        csa_key: info.csa_public_key,
        sel_to_ocr_config,
        peer_id,
        is_bootstrap,
        multi_addr,
        admin_addr,
    })
}
