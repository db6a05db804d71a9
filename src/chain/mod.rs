// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Chain catalog and connection configuration
//!
//! This module contains the chain-selector catalog used to validate every
//! selector the crate touches, plus runtime configuration for RPC endpoints
//! and transaction confirmation.

pub mod config;
pub mod selectors;

pub use config::{ConfirmConfig, RpcConfig, RpcEndpoint, RPC_URLS_ENV};
pub use selectors::{
    chain_by_id, chain_by_selector, is_known_selector, ChainDetails, ChainSelectorExt, ALL_CHAINS,
};
