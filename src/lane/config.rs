// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Default fee-quoter economics for a new EVM destination

use crate::contracts::FeeQuoter::DestChainConfig;
use crate::protocol::ChainFamily;

/// Returns the fee-quoter destination config installed by lane wiring.
///
/// The config targets an EVM destination. Destinations in another family, or
/// with different economics, need a config built by the caller.
///
/// # Example
///
/// ```rust
/// use ccip_deploy::lane::default_fee_quoter_dest_chain_config;
///
/// let config = default_fee_quoter_dest_chain_config();
/// assert!(config.isEnabled);
/// assert_eq!(config.maxDataBytes, 256);
/// assert_eq!(config.chainFamilySelector.to_string(), "0x2812d52c");
/// ```
pub fn default_fee_quoter_dest_chain_config() -> DestChainConfig {
    DestChainConfig {
        isEnabled: true,
        maxNumberOfTokensPerMsg: 10,
        maxDataBytes: 256,
        maxPerMsgGasLimit: 3_000_000,
        destGasOverhead: 50_000,
        destGasPerPayloadByte: 10,
        destDataAvailabilityOverheadGas: 0,
        destGasPerDataAvailabilityByte: 100,
        destDataAvailabilityMultiplierBps: 1,
        defaultTokenFeeUSDCents: 1,
        defaultTokenDestGasOverhead: 125_000,
        defaultTxGasLimit: 200_000,
        gasMultiplierWeiPerEth: 1,
        networkFeeUSDCents: 1,
        // Zero disables the per-destination staleness check.
        gasPriceStalenessThreshold: 0,
        enforceOutOfOrder: false,
        chainFamilySelector: ChainFamily::Evm.family_selector(),
    }
}
