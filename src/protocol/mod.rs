// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Protocol-level value types
//!
//! This module contains the core value types shared by the address registry
//! and the lane workflow: contract type/version records, chain families, and
//! fee-quoter price encodings.

mod chain_family;
mod price;
mod type_and_version;

pub use chain_family::ChainFamily;
pub use price::{
    e18_mult, pack_gas_price, unpack_gas_price, InitialPrices, DA_GAS_PRICE_SHIFT,
    MAX_GAS_PRICE_COMPONENT,
};
pub use type_and_version::{v1_6_0_dev, ContractType, TypeAndVersion, V1_0_0, V1_2_0};
