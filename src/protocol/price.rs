// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Price encodings used to bootstrap fee quoting on a new lane
//!
//! Fee quoters store token prices as USD per 1e18 of the token's smallest unit
//! in a `uint224`, and gas prices as a packed `uint224` whose upper bits hold the
//! data-availability gas price and whose lower 112 bits hold the execution gas
//! price.

use alloy_primitives::aliases::U224;
use bon::Builder;

use crate::error::{DeployError, Result};

/// Bit offset of the data-availability component in a packed gas price.
pub const DA_GAS_PRICE_SHIFT: usize = 112;

/// Largest value either packed gas price component may hold (`2^112 - 1`).
pub const MAX_GAS_PRICE_COMPONENT: u128 = (1u128 << DA_GAS_PRICE_SHIFT) - 1;

const E18: u128 = 1_000_000_000_000_000_000;

/// Multiplies `n` by 1e18.
///
/// # Example
///
/// ```rust
/// use ccip_deploy::e18_mult;
/// use alloy_primitives::aliases::U224;
///
/// assert_eq!(e18_mult(20), U224::from(20_000_000_000_000_000_000u128));
/// ```
pub fn e18_mult(n: u64) -> U224 {
    U224::from(u128::from(n) * E18)
}

/// Packs an execution gas price and a data-availability gas price into the
/// single on-chain word expected by fee-quoter gas price updates.
///
/// Both components must fit in 112 bits.
///
/// # Example
///
/// ```rust
/// use ccip_deploy::pack_gas_price;
/// use alloy_primitives::aliases::U224;
///
/// let packed = pack_gas_price(800_000_000_000_000, 0).unwrap();
/// assert_eq!(packed, U224::from(800_000_000_000_000u128));
/// assert!(pack_gas_price(u128::MAX, 0).is_err());
/// ```
pub fn pack_gas_price(execution_gas_price: u128, data_availability_gas_price: u128) -> Result<U224> {
    if execution_gas_price > MAX_GAS_PRICE_COMPONENT {
        return Err(DeployError::InvalidPrice(format!(
            "execution gas price {execution_gas_price} exceeds 112 bits"
        )));
    }
    if data_availability_gas_price > MAX_GAS_PRICE_COMPONENT {
        return Err(DeployError::InvalidPrice(format!(
            "data availability gas price {data_availability_gas_price} exceeds 112 bits"
        )));
    }
    Ok(pack_unchecked(execution_gas_price, data_availability_gas_price))
}

/// Splits a packed gas price into `(execution, data_availability)`.
pub fn unpack_gas_price(packed: U224) -> (u128, u128) {
    let mask = U224::from(MAX_GAS_PRICE_COMPONENT);
    let execution: u128 = (packed & mask).to::<u128>();
    let data_availability: u128 = (packed >> DA_GAS_PRICE_SHIFT).to::<u128>();
    (execution, data_availability)
}

fn pack_unchecked(execution_gas_price: u128, data_availability_gas_price: u128) -> U224 {
    (U224::from(data_availability_gas_price) << DA_GAS_PRICE_SHIFT) | U224::from(execution_gas_price)
}

/// USD-denominated prices pushed into the source fee quoter when a lane is
/// added.
///
/// # Example
///
/// ```rust
/// use ccip_deploy::{e18_mult, InitialPrices};
///
/// let prices = InitialPrices::builder()
///     .link_price(e18_mult(15))
///     .weth_price(e18_mult(3500))
///     .gas_price(ccip_deploy::pack_gas_price(2_000_000_000, 0).unwrap())
///     .build();
/// assert!(prices.validate().is_ok());
/// ```
#[derive(Builder, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitialPrices {
    /// USD per 1e18 LINK
    pub link_price: U224,
    /// USD per 1e18 WETH
    pub weth_price: U224,
    /// Packed execution + data-availability gas price for the destination
    pub gas_price: U224,
}

impl Default for InitialPrices {
    /// LINK at $20, WETH at $4000, execution gas at 8e14 and no DA cost.
    fn default() -> Self {
        Self {
            link_price: e18_mult(20),
            weth_price: e18_mult(4000),
            gas_price: pack_unchecked(800_000_000_000_000, 0),
        }
    }
}

impl InitialPrices {
    /// Rejects zero prices; a zero price would make the lane unusable.
    pub fn validate(&self) -> Result<()> {
        if self.link_price.is_zero() {
            return Err(DeployError::InvalidPrice("LINK price is zero".to_string()));
        }
        if self.weth_price.is_zero() {
            return Err(DeployError::InvalidPrice("WETH price is zero".to_string()));
        }
        if self.gas_price.is_zero() {
            return Err(DeployError::InvalidPrice("gas price is zero".to_string()));
        }
        Ok(())
    }
}
