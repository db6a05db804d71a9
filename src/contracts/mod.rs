// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! CCIP contract bindings
//!
//! This module contains Alloy-generated contract bindings for the contracts a
//! lane touches, wrapped in instrumented types.
//!
//! ## Public API
//!
//! Each wrapper implements a binding trait so that lane wiring can run against
//! live contracts or in-memory fakes:
//!
//! - [`RouterContract`](router::RouterContract) / [`RouterBinding`]
//! - [`OnRampContract`](on_ramp::OnRampContract) / [`OnRampBinding`]
//! - [`OffRampContract`](off_ramp::OffRampContract) / [`OffRampBinding`]
//! - [`FeeQuoterContract`](fee_quoter::FeeQuoterContract) / [`FeeQuoterBinding`]

pub mod fee_quoter;
pub mod off_ramp;
pub mod on_ramp;
pub mod router;

pub use fee_quoter::{FeeQuoter, FeeQuoterBinding, FeeQuoterContract};
pub use off_ramp::{OffRamp, OffRampBinding, OffRampContract};
pub use on_ramp::{OnRamp, OnRampBinding, OnRampContract};
pub use router::{Router, RouterBinding, RouterContract};

use alloy_network::Ethereum;
use alloy_primitives::TxHash;
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;

use crate::error::Result;

/// Submits `tx` and returns its hash without waiting for a receipt.
pub(crate) async fn send_transaction<P: Provider<Ethereum>>(
    provider: &P,
    tx: TransactionRequest,
) -> Result<TxHash> {
    let pending = provider.send_transaction(tx).await?;
    Ok(*pending.tx_hash())
}
