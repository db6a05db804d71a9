// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! OpenTelemetry span helpers for deployment operations
//!
//! Static span names, structured attributes, kept apart from business logic.
//! Library code records failures on the active span through [`record_error`]
//! and [`record_error_with_context`] instead of emitting log events, leaving
//! the decision to surface them to the caller's subscriber.
//!
//! # Example
//!
//! ```rust,no_run
//! use ccip_deploy::spans;
//!
//! let span = spans::add_lane(5009297550715157269, 4949039107694359620);
//! let _guard = span.enter();
//! // Custom lane tooling here
//! ```

use alloy_primitives::{Address, TxHash};
use tracing::Span;

use crate::lane::LaneStep;

/// Create the root span for workflows run against one environment.
#[inline]
pub fn environment(name: &str, chains: usize) -> Span {
    tracing::info_span!("ccip_deploy.environment", environment = name, chains = chains)
}

/// Create span for wiring one lane end to end.
///
/// Parent: caller's environment span
/// Children: ccip_deploy.lane_step (one per step)
#[inline]
pub fn add_lane(from: u64, to: u64) -> Span {
    tracing::info_span!(
        "ccip_deploy.add_lane",
        from_selector = from,
        to_selector = to,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for one submit-then-confirm step of lane wiring.
///
/// Parent: ccip_deploy.add_lane
/// Children: ccip_deploy.confirm_transaction
#[inline]
pub fn lane_step(step: LaneStep, selector: u64, contract: Address) -> Span {
    tracing::info_span!(
        "ccip_deploy.lane_step",
        step = step.index(),
        step_name = step.name(),
        selector = selector,
        contract = %contract,
        tx_hash = tracing::field::Empty,
        block_number = tracing::field::Empty,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for waiting on a submitted transaction.
///
/// Parent: ccip_deploy.lane_step or ccip_deploy.deploy_contract
/// Children: Provider RPC calls (from alloy instrumentation)
#[inline]
pub fn confirm_transaction(
    selector: u64,
    tx_hash: TxHash,
    max_attempts: u32,
    poll_interval_secs: u64,
) -> Span {
    tracing::info_span!(
        "ccip_deploy.confirm_transaction",
        selector = selector,
        tx_hash = %tx_hash,
        max_attempts = max_attempts,
        poll_interval_secs = poll_interval_secs,
        block_number = tracing::field::Empty,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for a mutating address book operation.
///
/// `operation` is one of `save`, `merge`, `remove`.
#[inline]
pub fn address_book_mutation(operation: &'static str, entries: usize) -> Span {
    tracing::debug_span!(
        "ccip_deploy.address_book_mutation",
        operation = operation,
        entries = entries,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for resolving contract handles from the address book.
#[inline]
pub fn load_onchain_state(chains: usize) -> Span {
    tracing::info_span!(
        "ccip_deploy.load_onchain_state",
        chains = chains,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for building node descriptors from the job distributor.
#[inline]
pub fn node_info(nodes: usize) -> Span {
    tracing::info_span!(
        "ccip_deploy.node_info",
        nodes = nodes,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for deploying one contract and recording it.
///
/// Parent: caller's environment span
/// Children: ccip_deploy.confirm_transaction, ccip_deploy.address_book_mutation
#[inline]
pub fn deploy_contract(selector: u64) -> Span {
    tracing::info_span!(
        "ccip_deploy.deploy_contract",
        selector = selector,
        contract = tracing::field::Empty,
        type_and_version = tracing::field::Empty,
        tx_hash = tracing::field::Empty,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Record error attributes on the current span.
///
/// Sets `error.type`, `error.message`, `error.source` (when present) and
/// marks the span status as `ERROR`.
///
/// # Example
///
/// ```rust,no_run
/// use ccip_deploy::spans;
///
/// # fn example() {
/// let span = tracing::info_span!("ccip_deploy.operation");
/// let _guard = span.enter();
///
/// if let Err(e) = some_operation() {
///     spans::record_error(&e);
/// }
/// # }
/// # fn some_operation() -> Result<(), std::io::Error> { Ok(()) }
/// ```
pub fn record_error<E: std::error::Error>(error: &E) {
    let current_span = tracing::Span::current();
    let message = error.to_string();
    current_span.record(
        "error.type",
        message.split(':').next().unwrap_or("Unknown"),
    );
    current_span.record("error.message", message.as_str());
    current_span.record("otel.status_code", "ERROR");

    if let Some(source) = error.source() {
        current_span.record("error.source", source.to_string());
    }
}

/// Record error attributes with custom context on the current span.
///
/// # Example
///
/// ```rust,no_run
/// use ccip_deploy::spans;
///
/// # fn example() {
/// let span = tracing::info_span!("ccip_deploy.operation");
/// let _guard = span.enter();
///
/// spans::record_error_with_context(
///     "ConfirmTimeout",
///     "Transaction not mined",
///     Some("Attempt 120/120"),
/// );
/// # }
/// ```
pub fn record_error_with_context(
    error_type: &str,
    error_message: &str,
    additional_context: Option<&str>,
) {
    let current_span = tracing::Span::current();
    current_span.record("error.type", error_type);
    current_span.record("error.message", error_message);
    current_span.record("otel.status_code", "ERROR");

    if let Some(context) = additional_context {
        current_span.record("error.context", context);
    }
}
