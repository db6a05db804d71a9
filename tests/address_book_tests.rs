//! Integration tests for the address book and its lookups
//!
//! These exercise the registry through the public [`AddressBook`] trait only,
//! the way deployment workflows use it.

use std::sync::Arc;
use std::thread;

use alloy_primitives::Address;
use ccip_deploy::{
    search_address_book, AddressBook, AddressBookMap, ContractType, DeployError, TypeAndVersion,
};
use rstest::rstest;

const ETHEREUM: u64 = 5009297550715157269;
const SEPOLIA: u64 = 16015286601757825753;
const ARB_SEPOLIA: u64 = 3478487238524512106;

const ROUTER_ADDR: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
const WETH_ADDR: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";

fn tv(raw: &str) -> TypeAndVersion {
    raw.parse().unwrap()
}

fn addr(byte: u8) -> String {
    Address::repeat_byte(byte).to_checksum(None)
}

#[rstest]
#[case("Router 1.2.0")]
#[case("OnRamp 1.6.0-dev")]
#[case("LinkToken 1.0.0")]
#[case("BurnMintTokenPool 1.5.1")]
fn test_type_and_version_format_round_trips(#[case] raw: &str) {
    let parsed = tv(raw);
    assert_eq!(parsed.to_string(), raw);
    assert_eq!(tv(&parsed.to_string()), parsed);
}

#[test]
fn test_save_and_read_back() {
    let book = AddressBookMap::new();
    book.save(ETHEREUM, ROUTER_ADDR, tv("Router 1.2.0")).unwrap();

    let addresses = book.addresses().unwrap();
    assert_eq!(addresses.len(), 1);
    assert_eq!(addresses[&ETHEREUM][ROUTER_ADDR].to_string(), "Router 1.2.0");
    assert!(tv("Router 1.2.0").is_type(&ContractType::ROUTER));
}

#[test]
fn test_case_variants_are_one_key() {
    let book = AddressBookMap::new();
    book.save(ETHEREUM, &ROUTER_ADDR.to_lowercase(), tv("Router 1.2.0"))
        .unwrap();

    let err = book
        .save(ETHEREUM, &ROUTER_ADDR.to_uppercase().replacen("0X", "0x", 1), tv("OnRamp 1.6.0-dev"))
        .unwrap_err();

    assert!(matches!(err, DeployError::DuplicateAddress { selector: ETHEREUM, .. }));
    assert_eq!(book.len(), 1);
    assert_eq!(
        book.addresses_for_chain(ETHEREUM).unwrap()[ROUTER_ADDR].to_string(),
        "Router 1.2.0"
    );
}

#[test]
fn test_save_rejects_unknown_chain() {
    let book = AddressBookMap::new();

    let err = book.save(42, ROUTER_ADDR, tv("Router 1.2.0")).unwrap_err();

    assert!(matches!(err, DeployError::InvalidChainSelector(42)));
    assert!(book.is_empty());
}

#[rstest]
#[case("0x0")]
#[case("0x0000000000000000000000000000000000000000")]
#[case("")]
#[case("not an address")]
fn test_save_rejects_invalid_address(#[case] address: &str) {
    let book = AddressBookMap::new();

    let err = book.save(ETHEREUM, address, tv("Router 1.2.0")).unwrap_err();

    assert!(matches!(err, DeployError::InvalidAddress { .. }));
    assert!(book.is_empty());
}

#[test]
fn test_duplicate_save_keeps_first_record() {
    let book = AddressBookMap::new();
    book.save(ETHEREUM, ROUTER_ADDR, tv("Router 1.2.0")).unwrap();

    assert!(book.save(ETHEREUM, ROUTER_ADDR, tv("Router 1.2.0")).is_err());

    let addresses = book.addresses_for_chain(ETHEREUM).unwrap();
    assert_eq!(addresses.len(), 1);
    assert_eq!(addresses[ROUTER_ADDR], tv("Router 1.2.0"));
}

#[test]
fn test_same_address_on_two_chains() {
    let book = AddressBookMap::new();
    book.save(SEPOLIA, ROUTER_ADDR, tv("Router 1.2.0")).unwrap();
    book.save(ARB_SEPOLIA, ROUTER_ADDR, tv("Router 1.2.0")).unwrap();

    assert_eq!(book.len(), 2);
}

#[test]
fn test_merge_disjoint_then_remove_restores() {
    let a = AddressBookMap::new();
    a.save(SEPOLIA, &addr(0x01), tv("Router 1.2.0")).unwrap();
    a.save(SEPOLIA, &addr(0x02), tv("OnRamp 1.6.0-dev")).unwrap();
    let original = a.addresses().unwrap();

    let b = AddressBookMap::new();
    b.save(SEPOLIA, &addr(0x03), tv("OffRamp 1.6.0-dev")).unwrap();
    b.save(ARB_SEPOLIA, &addr(0x04), tv("Router 1.2.0")).unwrap();

    a.merge(&b).unwrap();

    let merged = a.addresses().unwrap();
    let mut expected = original.clone();
    for (selector, addresses) in b.addresses().unwrap() {
        expected.entry(selector).or_default().extend(addresses);
    }
    assert_eq!(merged, expected);
    assert_eq!(a.len(), 4);

    a.remove(&b).unwrap();
    assert_eq!(a.addresses().unwrap(), original);
}

#[test]
fn test_merge_conflict_leaves_book_unchanged() {
    let a = AddressBookMap::new();
    a.save(SEPOLIA, &addr(0x01), tv("Router 1.2.0")).unwrap();
    let before = a.addresses().unwrap();

    let b = AddressBookMap::new();
    b.save(ARB_SEPOLIA, &addr(0x09), tv("Router 1.2.0")).unwrap();
    b.save(SEPOLIA, &addr(0x01), tv("Router 1.2.0")).unwrap();

    let err = a.merge(&b).unwrap_err();

    assert!(matches!(err, DeployError::DuplicateAddress { selector: SEPOLIA, .. }));
    assert_eq!(a.addresses().unwrap(), before);
}

#[test]
fn test_remove_is_all_or_nothing() {
    let a = AddressBookMap::new();
    a.save(SEPOLIA, &addr(0x01), tv("Router 1.2.0")).unwrap();
    a.save(SEPOLIA, &addr(0x02), tv("OnRamp 1.6.0-dev")).unwrap();
    let before = a.addresses().unwrap();

    let b = AddressBookMap::new();
    b.save(SEPOLIA, &addr(0x01), tv("Router 1.2.0")).unwrap();
    b.save(SEPOLIA, &addr(0x07), tv("OffRamp 1.6.0-dev")).unwrap();

    let err = a.remove(&b).unwrap_err();

    assert!(matches!(err, DeployError::AddressNotFound { selector: SEPOLIA, .. }));
    assert_eq!(a.addresses().unwrap(), before);
}

#[test]
fn test_returned_maps_are_copies() {
    let book = AddressBookMap::new();
    book.save(SEPOLIA, &addr(0x01), tv("Router 1.2.0")).unwrap();

    let mut all = book.addresses().unwrap();
    all.clear();
    let mut chain = book.addresses_for_chain(SEPOLIA).unwrap();
    chain.insert(addr(0x02), tv("OnRamp 1.6.0-dev"));

    assert_eq!(book.len(), 1);
    assert_eq!(book.addresses_for_chain(SEPOLIA).unwrap().len(), 1);
}

#[test]
fn test_search_address_book() {
    let book = AddressBookMap::new();
    book.save(ETHEREUM, ROUTER_ADDR, tv("Router 1.2.0")).unwrap();
    book.save(ETHEREUM, WETH_ADDR, tv("WETH9 1.0.0")).unwrap();

    assert_eq!(
        search_address_book(&book, ETHEREUM, &ContractType::WETH9).unwrap(),
        WETH_ADDR
    );
    assert!(matches!(
        search_address_book(&book, ETHEREUM, &ContractType::FEE_QUOTER),
        Err(DeployError::ContractNotFound { selector: ETHEREUM, .. })
    ));
    assert!(matches!(
        search_address_book(&book, SEPOLIA, &ContractType::ROUTER),
        Err(DeployError::ChainNotFound(SEPOLIA))
    ));
}

#[test]
fn test_json_round_trip() {
    let book = AddressBookMap::new();
    book.save(ETHEREUM, &ROUTER_ADDR.to_lowercase(), tv("Router 1.2.0"))
        .unwrap();
    book.save(SEPOLIA, WETH_ADDR, tv("WETH9 1.0.0")).unwrap();

    let json = book.to_json().unwrap();
    let restored = AddressBookMap::from_json(&json).unwrap();

    assert_eq!(restored.addresses().unwrap(), book.addresses().unwrap());
    assert!(json.contains(ROUTER_ADDR));
}

#[test]
fn test_concurrent_saves_are_serialized() {
    let book = Arc::new(AddressBookMap::new());

    let handles: Vec<_> = (1..=16u8)
        .map(|byte| {
            let book = Arc::clone(&book);
            thread::spawn(move || {
                // Every thread also races on one shared address
                let shared = book.save(SEPOLIA, &addr(0xff), tv("Router 1.2.0")).is_ok();
                book.save(SEPOLIA, &addr(byte), tv("OnRamp 1.6.0-dev"))
                    .unwrap();
                shared
            })
        })
        .collect();

    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|won| *won)
        .count();

    assert_eq!(winners, 1);
    assert_eq!(book.len(), 17);
}

#[test]
fn test_concurrent_readers_and_merges() {
    let book = Arc::new(AddressBookMap::new());
    book.save(SEPOLIA, &addr(0x01), tv("Router 1.2.0")).unwrap();

    let writers: Vec<_> = (2..=9u8)
        .map(|byte| {
            let book = Arc::clone(&book);
            thread::spawn(move || {
                let other = AddressBookMap::new();
                other
                    .save(ARB_SEPOLIA, &addr(byte), tv("OffRamp 1.6.0-dev"))
                    .unwrap();
                book.merge(&other).unwrap();
            })
        })
        .collect();
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let book = Arc::clone(&book);
            thread::spawn(move || {
                for _ in 0..50 {
                    let router = search_address_book(book.as_ref(), SEPOLIA, &ContractType::ROUTER)
                        .unwrap();
                    assert_eq!(router, addr(0x01));
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().unwrap();
    }
    assert_eq!(book.addresses_for_chain(ARB_SEPOLIA).unwrap().len(), 8);
}
