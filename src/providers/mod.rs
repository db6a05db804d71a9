// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Production implementations of the trait abstractions.
//!
//! This module provides the "real" implementations of the traits defined in
//! [`crate::traits`] that interact with actual blockchain networks and the
//! system clock. Test code uses the fakes in the `testing` module, enabled by the
//! `testing` feature, instead.

mod alloy;
mod confirmer;
mod tokio_clock;

pub use self::alloy::AlloyChainClient;
pub use self::confirmer::ReceiptConfirmer;
pub use self::tokio_clock::TokioClock;
