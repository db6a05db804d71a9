// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Lane wiring
//!
//! A lane is a one-way messaging path between two chains. Adding one takes
//! six configuration transactions, four on the source chain and two on the
//! destination. Each transaction is confirmed before the next is submitted,
//! because later steps depend on the effects of earlier ones.
//!
//! A failed step aborts the workflow. Steps already confirmed stay on chain;
//! the returned [`DeployError::LaneStep`] names the step and chain so the
//! operator can finish the lane by hand or re-run the workflow.

mod config;
mod state;

pub use config::default_fee_quoter_dest_chain_config;
pub use state::{CcipChainState, CcipOnChainState};

use std::fmt;
use std::future::Future;

use alloy_primitives::{Address, Bytes, TxHash};
use tracing::{info, Instrument};

use crate::contracts::{
    FeeQuoter, FeeQuoterBinding, OffRamp, OffRampBinding, OnRamp, OnRampBinding, Router,
    RouterBinding,
};
use crate::deployment::{confirm_if_no_error, Chain, Environment};
use crate::error::{DeployError, Result};
use crate::protocol::InitialPrices;
use crate::spans;

/// One submit-then-confirm step of [`add_lane`], in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LaneStep {
    /// Source router learns the on-ramp for the destination.
    RouterOnRamp,
    /// Source on-ramp learns the router for the destination.
    OnRampDestConfig,
    /// Source fee quoter receives fee token and destination gas prices.
    FeeQuoterPrices,
    /// Source fee quoter receives the destination chain config.
    FeeQuoterDestConfig,
    /// Destination off-ramp enables the source chain.
    OffRampSourceConfig,
    /// Destination router learns the off-ramp for the source.
    RouterOffRamp,
}

impl LaneStep {
    pub const ALL: [LaneStep; 6] = [
        Self::RouterOnRamp,
        Self::OnRampDestConfig,
        Self::FeeQuoterPrices,
        Self::FeeQuoterDestConfig,
        Self::OffRampSourceConfig,
        Self::RouterOffRamp,
    ];

    /// 1-based position in the workflow.
    #[inline]
    pub const fn index(self) -> u8 {
        match self {
            Self::RouterOnRamp => 1,
            Self::OnRampDestConfig => 2,
            Self::FeeQuoterPrices => 3,
            Self::FeeQuoterDestConfig => 4,
            Self::OffRampSourceConfig => 5,
            Self::RouterOffRamp => 6,
        }
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RouterOnRamp => "router_on_ramp",
            Self::OnRampDestConfig => "on_ramp_dest_config",
            Self::FeeQuoterPrices => "fee_quoter_prices",
            Self::FeeQuoterDestConfig => "fee_quoter_dest_config",
            Self::OffRampSourceConfig => "off_ramp_source_config",
            Self::RouterOffRamp => "router_off_ramp",
        }
    }

    /// True for steps sent to the source chain.
    #[inline]
    pub const fn on_source_chain(self) -> bool {
        self.index() <= 4
    }
}

impl fmt::Display for LaneStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.index(), self.name())
    }
}

/// Wires a lane from `from` to `to`.
///
/// Every chain and contract the lane touches is resolved, and `prices`
/// validated, before the first transaction is sent. Steps then run in
/// [`LaneStep::ALL`] order, each confirmed before the next.
///
/// # Errors
///
/// Preflight failures are returned as-is and mean nothing was sent:
///
/// - [`DeployError::InvalidConfig`] if `from == to`
/// - [`DeployError::ChainNotConnected`] if either chain is missing from `env`
/// - [`DeployError::ChainNotFound`] if either chain is missing from `state`
/// - [`DeployError::ContractNotFound`] if a required contract is missing
/// - [`DeployError::InvalidPrice`] if a price is zero
///
/// A failure once transactions are being sent is wrapped in
/// [`DeployError::LaneStep`].
///
/// # Example
///
/// ```rust,ignore
/// let state = CcipOnChainState::load_from_rpc(env.existing_addresses().as_ref(), &rpc, &wallet).await?;
/// add_lane(&env, &state, ETHEREUM_SEPOLIA.selector, ARBITRUM_SEPOLIA.selector, InitialPrices::default()).await?;
/// ```
pub async fn add_lane(
    env: &Environment,
    state: &CcipOnChainState,
    from: u64,
    to: u64,
    prices: InitialPrices,
) -> Result<()> {
    let span = spans::add_lane(from, to);
    wire_lane(env, state, from, to, prices).instrument(span).await
}

/// [`add_lane`] with [`InitialPrices::default`].
pub async fn add_lane_with_default_prices(
    env: &Environment,
    state: &CcipOnChainState,
    from: u64,
    to: u64,
) -> Result<()> {
    add_lane(env, state, from, to, InitialPrices::default()).await
}

async fn wire_lane(
    env: &Environment,
    state: &CcipOnChainState,
    from: u64,
    to: u64,
    prices: InitialPrices,
) -> Result<()> {
    let lane = Lane::resolve(env, state, from, to, prices).inspect_err(|e| spans::record_error(e))?;
    lane.run().await.inspect_err(|e| spans::record_error(e))?;

    info!(from = from, to = to, event = "lane_added");
    Ok(())
}

/// Everything a lane touches, resolved up front.
struct Lane<'a> {
    from: u64,
    to: u64,
    prices: InitialPrices,
    source_chain: &'a Chain,
    dest_chain: &'a Chain,
    source_router: &'a dyn RouterBinding,
    on_ramp: &'a dyn OnRampBinding,
    fee_quoter: &'a dyn FeeQuoterBinding,
    link_token: Address,
    weth9: Address,
    dest_router: &'a dyn RouterBinding,
    off_ramp: &'a dyn OffRampBinding,
}

impl<'a> Lane<'a> {
    fn resolve(
        env: &'a Environment,
        state: &'a CcipOnChainState,
        from: u64,
        to: u64,
        prices: InitialPrices,
    ) -> Result<Self> {
        if from == to {
            return Err(DeployError::InvalidConfig(format!(
                "lane source and destination are both chain {from}"
            )));
        }
        let source_chain = env.chain(from)?;
        let dest_chain = env.chain(to)?;
        let source = state.chain(from)?;
        let dest = state.chain(to)?;
        prices.validate()?;

        Ok(Self {
            from,
            to,
            prices,
            source_chain,
            dest_chain,
            source_router: source.router(from)?,
            on_ramp: source.on_ramp(from)?,
            fee_quoter: source.fee_quoter(from)?,
            link_token: source.link_token(from)?,
            weth9: source.weth9(from)?,
            dest_router: dest.router(to)?,
            off_ramp: dest.off_ramp(to)?,
        })
    }

    async fn run(&self) -> Result<()> {
        let source_key = self.source_chain.deployer_key();
        let dest_key = self.dest_chain.deployer_key();

        self.step(
            LaneStep::RouterOnRamp,
            self.source_router.address(),
            self.source_router.apply_ramp_updates(
                source_key,
                vec![Router::OnRamp {
                    destChainSelector: self.to,
                    onRamp: self.on_ramp.address(),
                }],
                vec![],
                vec![],
            ),
        )
        .await?;

        self.step(
            LaneStep::OnRampDestConfig,
            self.on_ramp.address(),
            self.on_ramp.apply_dest_chain_config_updates(
                source_key,
                vec![OnRamp::DestChainConfigArgs {
                    destChainSelector: self.to,
                    router: self.source_router.address(),
                }],
            ),
        )
        .await?;

        self.step(
            LaneStep::FeeQuoterPrices,
            self.fee_quoter.address(),
            self.fee_quoter
                .update_prices(source_key, self.price_updates()),
        )
        .await?;

        self.step(
            LaneStep::FeeQuoterDestConfig,
            self.fee_quoter.address(),
            self.fee_quoter.apply_dest_chain_config_updates(
                source_key,
                vec![FeeQuoter::DestChainConfigArgs {
                    destChainSelector: self.to,
                    destChainConfig: default_fee_quoter_dest_chain_config(),
                }],
            ),
        )
        .await?;

        self.step(
            LaneStep::OffRampSourceConfig,
            self.off_ramp.address(),
            self.off_ramp.apply_source_chain_config_updates(
                dest_key,
                vec![OffRamp::SourceChainConfigArgs {
                    router: self.dest_router.address(),
                    sourceChainSelector: self.from,
                    isEnabled: true,
                    onRamp: left_pad_32(self.on_ramp.address()),
                }],
            ),
        )
        .await?;

        self.step(
            LaneStep::RouterOffRamp,
            self.dest_router.address(),
            self.dest_router.apply_ramp_updates(
                dest_key,
                vec![],
                vec![],
                vec![Router::OffRamp {
                    sourceChainSelector: self.from,
                    offRamp: self.off_ramp.address(),
                }],
            ),
        )
        .await?;

        Ok(())
    }

    fn price_updates(&self) -> FeeQuoter::PriceUpdates {
        FeeQuoter::PriceUpdates {
            tokenPriceUpdates: vec![
                FeeQuoter::TokenPriceUpdate {
                    sourceToken: self.link_token,
                    usdPerToken: self.prices.link_price,
                },
                FeeQuoter::TokenPriceUpdate {
                    sourceToken: self.weth9,
                    usdPerToken: self.prices.weth_price,
                },
            ],
            gasPriceUpdates: vec![FeeQuoter::GasPriceUpdate {
                destChainSelector: self.to,
                usdPerUnitGas: self.prices.gas_price,
            }],
        }
    }

    /// Awaits `submit`, then confirms the transaction on the step's chain.
    async fn step(
        &self,
        step: LaneStep,
        contract: Address,
        submit: impl Future<Output = Result<TxHash>>,
    ) -> Result<u64> {
        let chain = if step.on_source_chain() {
            self.source_chain
        } else {
            self.dest_chain
        };
        let span = spans::lane_step(step, chain.selector(), contract);

        submit_and_confirm(chain, step, submit)
            .instrument(span)
            .await
            .map_err(|source| DeployError::LaneStep {
                step,
                from: self.from,
                to: self.to,
                selector: chain.selector(),
                source: Box::new(source),
            })
    }
}

async fn submit_and_confirm(
    chain: &Chain,
    step: LaneStep,
    submit: impl Future<Output = Result<TxHash>>,
) -> Result<u64> {
    let current = tracing::Span::current();
    let submitted = submit.await;
    if let Ok(tx_hash) = &submitted {
        current.record("tx_hash", tracing::field::display(tx_hash));
    }

    let block_number = confirm_if_no_error(chain, submitted)
        .await
        .inspect_err(|e| spans::record_error(e))?;
    current.record("block_number", block_number);

    info!(
        step = %step,
        selector = chain.selector(),
        block_number = block_number,
        event = "lane_step_confirmed"
    );
    Ok(block_number)
}

/// Off-ramps store the source on-ramp as ABI-encoded bytes, left-padded to
/// a 32-byte word.
fn left_pad_32(address: Address) -> Bytes {
    Bytes::copy_from_slice(address.into_word().as_slice())
}
