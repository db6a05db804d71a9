// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Deployment state: the address registry, connected chains and off-chain
//! nodes

pub mod address_book;
pub mod deploy;
pub mod environment;
pub mod nodes;
pub mod offchain;

pub use address_book::{
    search_address_book, AddressBook, AddressBookMap, AddressesByChain, ChainAddresses,
};
pub use deploy::{deploy_contract, ContractDeploy};
pub use environment::{confirm_if_no_error, Chain, Environment, DEFAULT_CONFIRM_TIMEOUT};
pub use nodes::{Node, Nodes, OcrConfig, PeerId};
pub use offchain::{
    JobProposal, NodeChainConfig, Ocr2Config, OcrKeyBundle, OffchainNode, ProposalStatus,
};
