// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Chain families and their address conventions
//!
//! Chain selectors are family-agnostic, but address syntax and the 4-byte
//! family discriminator installed in fee-quoter destination configs are not.
//! This module provides a strongly-typed enum of the supported families so that
//! adding a family is an additive change.

use std::fmt;

use alloy_primitives::{fixed_bytes, Address, FixedBytes};

use crate::error::{DeployError, Result};

const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Execution-semantics family of a chain.
///
/// # Example
///
/// ```rust
/// use ccip_deploy::ChainFamily;
///
/// assert_eq!(ChainFamily::Evm.name(), "evm");
/// assert_eq!(
///     ChainFamily::Evm.family_selector().to_string(),
///     "0x2812d52c"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum ChainFamily {
    /// Ethereum Virtual Machine chains
    Evm,
    /// Solana Virtual Machine chains
    Solana,
    /// Aptos Move chains
    Aptos,
}

impl ChainFamily {
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Evm => "evm",
            Self::Solana => "solana",
            Self::Aptos => "aptos",
        }
    }

    /// Returns the `bytes4(keccak256("CCIP ChainFamilySelector <FAMILY>"))`
    /// discriminator used in fee-quoter destination chain configs.
    #[inline]
    pub const fn family_selector(self) -> FixedBytes<4> {
        match self {
            Self::Evm => fixed_bytes!("2812d52c"),
            Self::Solana => fixed_bytes!("1e10bdc4"),
            Self::Aptos => fixed_bytes!("ac77ffec"),
        }
    }

    /// Validates an address for this family and returns its canonical form.
    ///
    /// - EVM: EIP-55 checksummed hex
    /// - Solana: base58 public key, unchanged
    /// - Aptos: lowercase hex, left-padded to 32 bytes
    ///
    /// The all-zero address of every family is rejected.
    pub fn normalize_address(self, address: &str) -> Result<String> {
        let invalid = |reason: &str| DeployError::InvalidAddress {
            address: address.to_string(),
            reason: reason.to_string(),
        };

        match self {
            Self::Evm => {
                let parsed: Address = address.parse().map_err(|_| invalid("not a hex address"))?;
                if parsed.is_zero() {
                    return Err(invalid("zero address"));
                }
                Ok(parsed.to_checksum(None))
            }
            Self::Solana => {
                if !(32..=44).contains(&address.len()) {
                    return Err(invalid("base58 public key must be 32-44 characters"));
                }
                if !address.chars().all(|c| BASE58_ALPHABET.contains(c)) {
                    return Err(invalid("not a base58 string"));
                }
                if address.chars().all(|c| c == '1') {
                    return Err(invalid("zero address"));
                }
                Ok(address.to_string())
            }
            Self::Aptos => {
                let digits = address
                    .strip_prefix("0x")
                    .ok_or_else(|| invalid("missing 0x prefix"))?;
                if digits.is_empty() || digits.len() > 64 {
                    return Err(invalid("expected 1-64 hex digits"));
                }
                if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(invalid("not a hex string"));
                }
                if digits.chars().all(|c| c == '0') {
                    return Err(invalid("zero address"));
                }
                Ok(format!("0x{:0>64}", digits.to_ascii_lowercase()))
            }
        }
    }
}

impl fmt::Display for ChainFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
