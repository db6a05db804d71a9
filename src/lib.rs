// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! # ccip-deploy
//!
//! Deployment tooling for Chainlink CCIP-style cross-chain messaging
//! contracts.
//!
//! This library keeps track of which contract lives at which address on which
//! chain, models the set of chains and off-chain nodes a deployment runs
//! against, and wires deployed contracts together into lanes.
//!
//! ## Quick Start
//!
//! ```rust
//! use ccip_deploy::{search_address_book, AddressBook, AddressBookMap, ContractType};
//!
//! # fn example() -> ccip_deploy::Result<()> {
//! let book = AddressBookMap::new();
//! book.save(
//!     5009297550715157269,
//!     "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed",
//!     "Router 1.2.0".parse()?,
//! )?;
//!
//! let router = search_address_book(&book, 5009297550715157269, &ContractType::ROUTER)?;
//! assert_eq!(router, "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Wiring a Lane
//!
//! ```rust,no_run
//! use alloy_network::EthereumWallet;
//! use alloy_signer_local::PrivateKeySigner;
//! use ccip_deploy::lane::{add_lane, CcipOnChainState};
//! use ccip_deploy::{Environment, InitialPrices, RpcConfig};
//!
//! # async fn example(env: Environment, signer: PrivateKeySigner) -> ccip_deploy::Result<()> {
//! // CCIP_RPC_URLS="16015286601757825753=https://...,3478487238524512106=https://..."
//! let rpc = RpcConfig::from_env()?;
//! let wallet = EthereumWallet::from(signer);
//! let state =
//!     CcipOnChainState::load_from_rpc(env.existing_addresses().as_ref(), &rpc, &wallet).await?;
//!
//! add_lane(
//!     &env,
//!     &state,
//!     16015286601757825753,
//!     3478487238524512106,
//!     InitialPrices::default(),
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Public API
//!
//! - [`AddressBook`], [`AddressBookMap`] and [`search_address_book`] - the contract address registry
//! - [`TypeAndVersion`] and [`ContractType`] - what is deployed at an address
//! - [`Environment`], [`Chain`] and [`Nodes`] - the chains and nodes a deployment targets
//! - [`lane`] - the lane-wiring workflow and default fee-quoter config
//! - [`contracts`] - instrumented contract wrappers and their binding traits
//! - [`DeployError`] and [`Result`] - Error types for error handling

pub mod chain;
pub mod contracts;
pub mod deployment;
mod error;
pub mod lane;
mod protocol;
pub mod providers;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod traits;

pub use chain::{
    chain_by_id, chain_by_selector, is_known_selector, ChainDetails, ChainSelectorExt,
    ConfirmConfig, RpcConfig, RpcEndpoint, ALL_CHAINS, RPC_URLS_ENV,
};
pub use deployment::{
    confirm_if_no_error, deploy_contract, search_address_book, AddressBook, AddressBookMap,
    AddressesByChain, Chain, ChainAddresses, ContractDeploy, Environment, Node, Nodes, OcrConfig,
    PeerId, DEFAULT_CONFIRM_TIMEOUT,
};
pub use error::{DeployError, Result};
pub use lane::{add_lane, add_lane_with_default_prices, LaneStep};
pub use protocol::{
    e18_mult, pack_gas_price, unpack_gas_price, v1_6_0_dev, ChainFamily, ContractType,
    InitialPrices, TypeAndVersion, DA_GAS_PRICE_SHIFT, MAX_GAS_PRICE_COMPONENT, V1_0_0, V1_2_0,
};

// Public module for advanced users who need custom instrumentation
pub mod spans;
