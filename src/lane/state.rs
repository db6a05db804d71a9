// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Contract handles resolved from the address book
//!
//! Lane wiring talks to contracts through the binding traits, so the on-chain
//! state holds trait objects: alloy wrappers in production, fakes in tests.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use alloy_network::{Ethereum, EthereumWallet};
use alloy_primitives::Address;
use alloy_provider::Provider;
use tracing::{debug, Instrument};

use crate::chain::RpcConfig;
use crate::contracts::{
    FeeQuoterBinding, FeeQuoterContract, OffRampBinding, OffRampContract, OnRampBinding,
    OnRampContract, RouterBinding, RouterContract,
};
use crate::deployment::{AddressBook, ChainAddresses};
use crate::error::{DeployError, Result};
use crate::protocol::ContractType;
use crate::spans;

/// CCIP contracts known on one chain.
///
/// When the book holds several contracts of the same type on a chain, the
/// lowest address wins, matching [`search_address_book`](crate::deployment::search_address_book).
#[derive(Clone, Default)]
pub struct CcipChainState {
    pub router: Option<Arc<dyn RouterBinding>>,
    pub on_ramp: Option<Arc<dyn OnRampBinding>>,
    pub off_ramp: Option<Arc<dyn OffRampBinding>>,
    pub fee_quoter: Option<Arc<dyn FeeQuoterBinding>>,
    pub link_token: Option<Address>,
    pub weth9: Option<Address>,
}

impl fmt::Debug for CcipChainState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CcipChainState")
            .field("router", &self.router.as_ref().map(|c| c.address()))
            .field("on_ramp", &self.on_ramp.as_ref().map(|c| c.address()))
            .field("off_ramp", &self.off_ramp.as_ref().map(|c| c.address()))
            .field("fee_quoter", &self.fee_quoter.as_ref().map(|c| c.address()))
            .field("link_token", &self.link_token)
            .field("weth9", &self.weth9)
            .finish()
    }
}

impl CcipChainState {
    /// Builds contract handles for every recognized contract type in
    /// `addresses`. Other contract types are ignored.
    pub fn load<P>(selector: u64, addresses: &ChainAddresses, provider: P) -> Result<Self>
    where
        P: Provider<Ethereum> + Clone + 'static,
    {
        let mut entries: Vec<_> = addresses.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        let mut state = Self::default();
        for (raw, type_and_version) in entries {
            let address: Address = raw.parse().map_err(|_| DeployError::InvalidAddress {
                address: raw.clone(),
                reason: "not a hex address".to_string(),
            })?;
            let contract_type = type_and_version.contract_type();

            if *contract_type == ContractType::ROUTER && state.router.is_none() {
                state.router = Some(Arc::new(RouterContract::new(address, provider.clone())));
            } else if *contract_type == ContractType::ON_RAMP && state.on_ramp.is_none() {
                state.on_ramp = Some(Arc::new(OnRampContract::new(address, provider.clone())));
            } else if *contract_type == ContractType::OFF_RAMP && state.off_ramp.is_none() {
                state.off_ramp = Some(Arc::new(OffRampContract::new(address, provider.clone())));
            } else if *contract_type == ContractType::FEE_QUOTER && state.fee_quoter.is_none() {
                state.fee_quoter =
                    Some(Arc::new(FeeQuoterContract::new(address, provider.clone())));
            } else if *contract_type == ContractType::LINK_TOKEN && state.link_token.is_none() {
                state.link_token = Some(address);
            } else if *contract_type == ContractType::WETH9 && state.weth9.is_none() {
                state.weth9 = Some(address);
            } else {
                debug!(
                    selector = selector,
                    contract = %address,
                    type_and_version = %type_and_version,
                    event = "contract_not_loaded"
                );
            }
        }

        Ok(state)
    }

    pub fn router(&self, selector: u64) -> Result<&dyn RouterBinding> {
        required(selector, self.router.as_deref(), ContractType::ROUTER)
    }

    pub fn on_ramp(&self, selector: u64) -> Result<&dyn OnRampBinding> {
        required(selector, self.on_ramp.as_deref(), ContractType::ON_RAMP)
    }

    pub fn off_ramp(&self, selector: u64) -> Result<&dyn OffRampBinding> {
        required(selector, self.off_ramp.as_deref(), ContractType::OFF_RAMP)
    }

    pub fn fee_quoter(&self, selector: u64) -> Result<&dyn FeeQuoterBinding> {
        required(selector, self.fee_quoter.as_deref(), ContractType::FEE_QUOTER)
    }

    pub fn link_token(&self, selector: u64) -> Result<Address> {
        required(selector, self.link_token, ContractType::LINK_TOKEN)
    }

    pub fn weth9(&self, selector: u64) -> Result<Address> {
        required(selector, self.weth9, ContractType::WETH9)
    }
}

fn required<T>(selector: u64, contract: Option<T>, contract_type: ContractType) -> Result<T> {
    contract.ok_or_else(|| DeployError::ContractNotFound {
        selector,
        contract_type: contract_type.to_string(),
    })
}

/// CCIP contracts known on every loaded chain, keyed by chain selector.
#[derive(Debug, Clone, Default)]
pub struct CcipOnChainState {
    chains: HashMap<u64, CcipChainState>,
}

impl CcipOnChainState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the state of one chain.
    pub fn with_chain(mut self, selector: u64, state: CcipChainState) -> Self {
        self.chains.insert(selector, state);
        self
    }

    pub fn chain(&self, selector: u64) -> Result<&CcipChainState> {
        self.chains
            .get(&selector)
            .ok_or(DeployError::ChainNotFound(selector))
    }

    /// Loaded selectors, ascending.
    pub fn selectors(&self) -> Vec<u64> {
        let mut selectors: Vec<u64> = self.chains.keys().copied().collect();
        selectors.sort_unstable();
        selectors
    }

    /// Resolves contract handles for every chain in `book` that has a
    /// provider. Chains without a provider are skipped.
    pub async fn load<P>(book: &dyn AddressBook, providers: &HashMap<u64, P>) -> Result<Self>
    where
        P: Provider<Ethereum> + Clone + 'static,
    {
        let span = spans::load_onchain_state(providers.len());
        async move {
            let addresses = book
                .addresses()
                .inspect_err(|e| spans::record_error(e))?;

            let mut chains = HashMap::new();
            for (selector, chain_addresses) in &addresses {
                let Some(provider) = providers.get(selector) else {
                    debug!(selector = *selector, event = "chain_without_provider_skipped");
                    continue;
                };
                let state = CcipChainState::load(*selector, chain_addresses, provider.clone())
                    .inspect_err(|e| spans::record_error(e))?;
                chains.insert(*selector, state);
            }

            debug!(chains = chains.len(), event = "onchain_state_loaded");
            Ok(Self { chains })
        }
        .instrument(span)
        .await
    }

    /// Connects a provider signing with `wallet` to every endpoint in `rpc`
    /// and loads the chains it covers.
    ///
    /// `wallet` must hold the deployer key of every chain a workflow sends
    /// from.
    pub async fn load_from_rpc(
        book: &dyn AddressBook,
        rpc: &RpcConfig,
        wallet: &EthereumWallet,
    ) -> Result<Self> {
        Self::load(book, &rpc.connect_all(wallet)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deployment::AddressBookMap;
    use crate::protocol::TypeAndVersion;
    use alloy_provider::{DynProvider, ProviderBuilder};
    use alloy_signer_local::PrivateKeySigner;

    const ANVIL: u64 = 7759470850252068959;
    const GETH: u64 = 3379446385462418246;

    fn provider() -> DynProvider<Ethereum> {
        ProviderBuilder::new()
            .connect_http("http://localhost:8545".parse().unwrap())
            .erased()
    }

    fn tv(raw: &str) -> TypeAndVersion {
        raw.parse().unwrap()
    }

    fn addr(byte: u8) -> String {
        Address::repeat_byte(byte).to_checksum(None)
    }

    #[test]
    fn test_load_resolves_known_types() {
        let addresses: ChainAddresses = [
            (addr(0x01), tv("Router 1.2.0")),
            (addr(0x02), tv("OnRamp 1.6.0-dev")),
            (addr(0x03), tv("OffRamp 1.6.0-dev")),
            (addr(0x04), tv("FeeQuoter 1.6.0-dev")),
            (addr(0x05), tv("LinkToken 1.0.0")),
            (addr(0x06), tv("WETH9 1.0.0")),
            (addr(0x07), tv("TokenPool 1.5.0")),
        ]
        .into_iter()
        .collect();

        let state = CcipChainState::load(ANVIL, &addresses, provider()).unwrap();

        assert_eq!(state.router(ANVIL).unwrap().address(), Address::repeat_byte(0x01));
        assert_eq!(state.on_ramp(ANVIL).unwrap().address(), Address::repeat_byte(0x02));
        assert_eq!(state.off_ramp(ANVIL).unwrap().address(), Address::repeat_byte(0x03));
        assert_eq!(state.fee_quoter(ANVIL).unwrap().address(), Address::repeat_byte(0x04));
        assert_eq!(state.link_token(ANVIL).unwrap(), Address::repeat_byte(0x05));
        assert_eq!(state.weth9(ANVIL).unwrap(), Address::repeat_byte(0x06));
    }

    #[test]
    fn test_load_prefers_lowest_address() {
        let addresses: ChainAddresses = [
            (addr(0x22), tv("Router 1.2.0")),
            (addr(0x11), tv("Router 1.2.0")),
        ]
        .into_iter()
        .collect();

        let state = CcipChainState::load(ANVIL, &addresses, provider()).unwrap();
        assert_eq!(state.router(ANVIL).unwrap().address(), Address::repeat_byte(0x11));
    }

    #[test]
    fn test_missing_contract_names_type_and_chain() {
        let state = CcipChainState::default();
        let err = state.fee_quoter(ANVIL).err().unwrap();
        insta::assert_snapshot!(err.to_string(), @"No FeeQuoter contract found for chain 7759470850252068959");
    }

    #[tokio::test]
    async fn test_load_skips_chains_without_provider() {
        let book = AddressBookMap::new();
        book.save(ANVIL, &addr(0x01), tv("Router 1.2.0")).unwrap();
        book.save(GETH, &addr(0x02), tv("Router 1.2.0")).unwrap();

        let providers = HashMap::from([(ANVIL, provider())]);
        let state = CcipOnChainState::load(&book, &providers).await.unwrap();

        assert_eq!(state.selectors(), vec![ANVIL]);
        assert!(matches!(
            state.chain(GETH),
            Err(DeployError::ChainNotFound(GETH))
        ));
    }

    #[tokio::test]
    async fn test_load_from_rpc_connects_configured_chains() {
        let book = AddressBookMap::new();
        book.save(ANVIL, &addr(0x01), tv("Router 1.2.0")).unwrap();
        book.save(GETH, &addr(0x02), tv("Router 1.2.0")).unwrap();
        let rpc = RpcConfig::parse("7759470850252068959=http://localhost:8545").unwrap();
        let wallet = EthereumWallet::from(PrivateKeySigner::random());

        let state = CcipOnChainState::load_from_rpc(&book, &rpc, &wallet)
            .await
            .unwrap();

        assert_eq!(state.selectors(), vec![ANVIL]);
        assert_eq!(
            state.chain(ANVIL).unwrap().router(ANVIL).unwrap().address(),
            Address::repeat_byte(0x01)
        );
    }
}
