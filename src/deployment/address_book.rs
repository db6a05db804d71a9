// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Contract address registry
//!
//! An address book maps a chain selector and a contract address to the
//! [`TypeAndVersion`] deployed there. Keys are validated against the chain
//! catalog and normalized for the chain's family on the way in, so that two
//! spellings of the same EVM address are the same key.
//!
//! The canonical persisted shape is
//! `{ "<selector>": { "<address>": "<Type> <SemVer>" } }`.

use std::collections::{BTreeMap, HashMap, HashSet};

use parking_lot::RwLock;
use tracing::debug;

use crate::chain::chain_by_selector;
use crate::error::{DeployError, Result};
use crate::protocol::{ContractType, TypeAndVersion};
use crate::spans;

/// Addresses saved for one chain, keyed by canonical address.
pub type ChainAddresses = HashMap<String, TypeAndVersion>;

/// Addresses saved for every chain, keyed by chain selector.
pub type AddressesByChain = HashMap<u64, ChainAddresses>;

/// Registry of deployed contract addresses.
///
/// Implementations must be safe to share across tasks. `merge` and `remove`
/// snapshot `other` before locking `self`, so passing a book to its own
/// `merge` or `remove` does not deadlock; it is still a caller error.
pub trait AddressBook: Send + Sync {
    /// Records a new address.
    ///
    /// # Errors
    ///
    /// - [`DeployError::InvalidChainSelector`] if the selector is not in the catalog
    /// - [`DeployError::InvalidAddress`] if the address is malformed or zero
    /// - [`DeployError::DuplicateAddress`] if the address is already recorded
    fn save(&self, selector: u64, address: &str, type_and_version: TypeAndVersion) -> Result<()>;

    /// Returns a deep copy of every recorded address.
    fn addresses(&self) -> Result<AddressesByChain>;

    /// Returns a copy of the addresses recorded for one chain.
    ///
    /// # Errors
    ///
    /// - [`DeployError::InvalidChainSelector`] if the selector is not in the catalog
    /// - [`DeployError::ChainNotFound`] if nothing is recorded for the chain
    fn addresses_for_chain(&self, selector: u64) -> Result<ChainAddresses>;

    /// Adds every address of `other` to this book.
    fn merge(&self, other: &dyn AddressBook) -> Result<()>;

    /// Removes every address of `other` from this book.
    fn remove(&self, other: &dyn AddressBook) -> Result<()>;
}

/// In-memory [`AddressBook`] guarded by a single reader/writer lock.
///
/// # Example
///
/// ```rust
/// use ccip_deploy::{AddressBook, AddressBookMap, TypeAndVersion};
///
/// let book = AddressBookMap::new();
/// book.save(
///     5009297550715157269,
///     "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed",
///     "Router 1.2.0".parse().unwrap(),
/// )
/// .unwrap();
///
/// let addresses = book.addresses_for_chain(5009297550715157269).unwrap();
/// assert_eq!(
///     addresses["0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"].to_string(),
///     "Router 1.2.0"
/// );
/// ```
#[derive(Debug, Default)]
pub struct AddressBookMap {
    addresses: RwLock<AddressesByChain>,
}

impl AddressBookMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a book from a raw map, validating every entry as [`save`] would.
    ///
    /// [`save`]: AddressBook::save
    pub fn from_map(map: AddressesByChain) -> Result<Self> {
        let book = Self::new();
        book.insert_all(sorted_entries(&map))?;
        Ok(book)
    }

    /// Parses the canonical JSON form.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ccip_deploy::AddressBookMap;
    ///
    /// let book = AddressBookMap::from_json(
    ///     r#"{"5009297550715157269":{"0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed":"Router 1.2.0"}}"#,
    /// )
    /// .unwrap();
    /// assert_eq!(book.len(), 1);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: BTreeMap<u64, BTreeMap<String, TypeAndVersion>> = serde_json::from_str(json)?;
        let map = raw
            .into_iter()
            .map(|(selector, addresses)| (selector, addresses.into_iter().collect()))
            .collect();
        Self::from_map(map)
    }

    /// Renders the canonical JSON form with chains and addresses in sorted
    /// order.
    pub fn to_json(&self) -> Result<String> {
        let guard = self.addresses.read();
        let sorted: BTreeMap<u64, BTreeMap<&String, &TypeAndVersion>> = guard
            .iter()
            .map(|(selector, addresses)| (*selector, addresses.iter().collect()))
            .collect();
        Ok(serde_json::to_string_pretty(&sorted)?)
    }

    /// Total number of recorded addresses across all chains.
    pub fn len(&self) -> usize {
        self.addresses.read().values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validates and normalizes every entry, then inserts all of them under one
    /// write lock. Nothing is inserted if any entry is rejected.
    fn insert_all(&self, entries: Vec<(u64, String, TypeAndVersion)>) -> Result<()> {
        let mut normalized = Vec::with_capacity(entries.len());
        for (selector, address, type_and_version) in entries {
            let address = normalize(selector, &address)?;
            if type_and_version.contract_type().is_empty() {
                return Err(DeployError::EmptyContractType);
            }
            normalized.push((selector, address, type_and_version));
        }

        let mut guard = self.addresses.write();
        let mut batch = HashSet::with_capacity(normalized.len());
        for (selector, address, _) in &normalized {
            let exists = guard
                .get(selector)
                .is_some_and(|addresses| addresses.contains_key(address));
            if exists || !batch.insert((*selector, address.as_str())) {
                return Err(DeployError::DuplicateAddress {
                    selector: *selector,
                    address: address.clone(),
                });
            }
        }

        for (selector, address, type_and_version) in normalized {
            guard
                .entry(selector)
                .or_default()
                .insert(address, type_and_version);
        }
        Ok(())
    }
}

impl Clone for AddressBookMap {
    fn clone(&self) -> Self {
        Self {
            addresses: RwLock::new(self.addresses.read().clone()),
        }
    }
}

impl AddressBook for AddressBookMap {
    fn save(&self, selector: u64, address: &str, type_and_version: TypeAndVersion) -> Result<()> {
        let span = spans::address_book_mutation("save", 1);
        let _guard = span.enter();

        let tv = type_and_version.to_string();
        self.insert_all(vec![(selector, address.to_string(), type_and_version)])
            .inspect_err(|e| spans::record_error(e))?;

        debug!(
            selector = selector,
            address = address,
            type_and_version = %tv,
            event = "address_saved"
        );
        Ok(())
    }

    fn addresses(&self) -> Result<AddressesByChain> {
        Ok(self.addresses.read().clone())
    }

    fn addresses_for_chain(&self, selector: u64) -> Result<ChainAddresses> {
        chain_by_selector(selector)?;
        self.addresses
            .read()
            .get(&selector)
            .cloned()
            .ok_or(DeployError::ChainNotFound(selector))
    }

    /// Merges atomically: every entry of `other` is validated against this
    /// book first, and the first conflict aborts with no insert applied.
    fn merge(&self, other: &dyn AddressBook) -> Result<()> {
        let snapshot = other.addresses()?;
        let entries = sorted_entries(&snapshot);

        let span = spans::address_book_mutation("merge", entries.len());
        let _guard = span.enter();

        let count = entries.len();
        self.insert_all(entries)
            .inspect_err(|e| spans::record_error(e))?;

        debug!(entries = count, event = "address_book_merged");
        Ok(())
    }

    /// Removes atomically: if any address of `other` is not recorded here,
    /// nothing is removed.
    fn remove(&self, other: &dyn AddressBook) -> Result<()> {
        let snapshot = other.addresses()?;
        let entries = sorted_entries(&snapshot);

        let span = spans::address_book_mutation("remove", entries.len());
        let _guard = span.enter();

        let mut guard = self.addresses.write();
        let mut keys = Vec::with_capacity(entries.len());
        for (selector, address, _) in entries {
            let key = normalize(selector, &address)
                .ok()
                .filter(|canonical| {
                    guard
                        .get(&selector)
                        .is_some_and(|addresses| addresses.contains_key(canonical))
                })
                .ok_or_else(|| DeployError::AddressNotFound { selector, address })
                .inspect_err(|e| spans::record_error(e))?;
            keys.push((selector, key));
        }

        for (selector, address) in &keys {
            if let Some(addresses) = guard.get_mut(selector) {
                addresses.remove(address);
                if addresses.is_empty() {
                    guard.remove(selector);
                }
            }
        }

        debug!(entries = keys.len(), event = "address_book_removed");
        Ok(())
    }
}

/// Returns the address of the first contract of `contract_type` recorded for
/// `selector`.
///
/// Candidates are ordered by address, so the result is stable when several
/// contracts of the same type are recorded.
///
/// # Errors
///
/// [`DeployError::ContractNotFound`] if no contract of that type is recorded,
/// plus the lookup errors of [`AddressBook::addresses_for_chain`].
pub fn search_address_book(
    book: &dyn AddressBook,
    selector: u64,
    contract_type: &ContractType,
) -> Result<String> {
    book.addresses_for_chain(selector)?
        .into_iter()
        .filter(|(_, tv)| tv.is_type(contract_type))
        .map(|(address, _)| address)
        .min()
        .ok_or_else(|| DeployError::ContractNotFound {
            selector,
            contract_type: contract_type.to_string(),
        })
}

fn normalize(selector: u64, address: &str) -> Result<String> {
    let details = chain_by_selector(selector)?;
    details.family.normalize_address(address)
}

fn sorted_entries(map: &AddressesByChain) -> Vec<(u64, String, TypeAndVersion)> {
    let mut entries: Vec<_> = map
        .iter()
        .flat_map(|(selector, addresses)| {
            addresses
                .iter()
                .map(|(address, tv)| (*selector, address.clone(), tv.clone()))
        })
        .collect();
    entries.sort_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{V1_0_0, V1_2_0};
    use alloy_primitives::Address;

    const ETH: u64 = 5009297550715157269;
    const SOL: u64 = 16423721717087811551;

    fn router() -> TypeAndVersion {
        TypeAndVersion::new(ContractType::ROUTER, V1_2_0).unwrap()
    }

    #[test]
    fn test_save_normalizes_evm_case() {
        let book = AddressBookMap::new();
        book.save(ETH, "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed", router())
            .unwrap();

        let err = book
            .save(ETH, "0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED", router())
            .unwrap_err();
        assert!(matches!(err, DeployError::DuplicateAddress { selector: ETH, .. }));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_save_non_evm_family() {
        let book = AddressBookMap::new();
        book.save(SOL, "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA", router())
            .unwrap();
        assert!(book
            .save(SOL, "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed", router())
            .is_err());
    }

    #[test]
    fn test_addresses_for_chain_errors() {
        let book = AddressBookMap::new();
        assert!(matches!(
            book.addresses_for_chain(1),
            Err(DeployError::InvalidChainSelector(1))
        ));
        assert!(matches!(
            book.addresses_for_chain(ETH),
            Err(DeployError::ChainNotFound(ETH))
        ));
    }

    #[test]
    fn test_search_is_deterministic() {
        let book = AddressBookMap::new();
        book.save(ETH, "0x2222222222222222222222222222222222222222", router())
            .unwrap();
        book.save(ETH, "0x1111111111111111111111111111111111111111", router())
            .unwrap();
        book.save(
            ETH,
            "0x0000000000000000000000000000000000000001",
            TypeAndVersion::new(ContractType::WETH9, V1_0_0).unwrap(),
        )
        .unwrap();

        for _ in 0..10 {
            assert_eq!(
                search_address_book(&book, ETH, &ContractType::ROUTER).unwrap(),
                "0x1111111111111111111111111111111111111111"
            );
        }
        assert!(matches!(
            search_address_book(&book, ETH, &ContractType::FEE_QUOTER),
            Err(DeployError::ContractNotFound { .. })
        ));
    }

    #[test]
    fn test_merge_is_atomic_on_conflict() {
        let book = AddressBookMap::new();
        book.save(ETH, "0x2222222222222222222222222222222222222222", router())
            .unwrap();
        let before = book.addresses().unwrap();

        let other = AddressBookMap::new();
        other
            .save(ETH, "0x1111111111111111111111111111111111111111", router())
            .unwrap();
        other
            .save(ETH, "0x2222222222222222222222222222222222222222", router())
            .unwrap();

        let err = book.merge(&other).unwrap_err();
        assert!(matches!(err, DeployError::DuplicateAddress { .. }));
        assert_eq!(book.addresses().unwrap(), before);
    }

    #[test]
    fn test_remove_drops_empty_chains() {
        let book = AddressBookMap::new();
        book.save(ETH, "0x1111111111111111111111111111111111111111", router())
            .unwrap();
        let other = book.clone();

        book.remove(&other).unwrap();
        assert!(book.is_empty());
        assert!(matches!(
            book.addresses_for_chain(ETH),
            Err(DeployError::ChainNotFound(ETH))
        ));
    }

    #[test]
    fn test_json_snapshot() {
        let book = AddressBookMap::new();
        book.save(ETH, "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed", router())
            .unwrap();
        book.save(
            ETH,
            "0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359",
            TypeAndVersion::new(ContractType::WETH9, V1_0_0).unwrap(),
        )
        .unwrap();

        let json = book.to_json().unwrap();
        insta::assert_snapshot!(json, @r###"
        {
          "5009297550715157269": {
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed": "Router 1.2.0",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359": "WETH9 1.0.0"
          }
        }
        "###);

        let back = AddressBookMap::from_json(&json).unwrap();
        assert_eq!(back.addresses().unwrap(), book.addresses().unwrap());
    }

    #[test]
    fn test_json_round_trip_holds_for_every_storable_record() {
        assert!(TypeAndVersion::new(ContractType::new("Token Pool"), V1_2_0).is_err());

        let book = AddressBookMap::new();
        for (byte, name) in [(0x01, "Router"), (0x02, "BurnMintTokenPool"), (0x03, "RMNRemote")] {
            let tv = TypeAndVersion::new(ContractType::new(name), V1_2_0).unwrap();
            book.save(ETH, &Address::repeat_byte(byte).to_checksum(None), tv)
                .unwrap();
        }

        let back = AddressBookMap::from_json(&book.to_json().unwrap()).unwrap();
        assert_eq!(back.addresses().unwrap(), book.addresses().unwrap());
    }

    #[test]
    fn test_from_json_rejects_whitespace_type() {
        let json = r#"{"5009297550715157269":{
            "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed":"Token Pool 1.2.0"
        }}"#;
        assert!(matches!(
            AddressBookMap::from_json(json),
            Err(DeployError::Json(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_case_collision() {
        let json = r#"{"5009297550715157269":{
            "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed":"Router 1.2.0",
            "0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED":"Router 1.2.0"
        }}"#;
        assert!(matches!(
            AddressBookMap::from_json(json),
            Err(DeployError::DuplicateAddress { .. })
        ));
    }
}
