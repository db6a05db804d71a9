// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Contract type and semantic version records
//!
//! Every deployed contract is bookkept as a [`TypeAndVersion`]: the logical
//! contract type (e.g. `Router`) plus the semantic version of the code that was
//! deployed. The canonical string form is `"<Type> <SemVer>"`, which is also the
//! form persisted in address books and returned by on-chain `typeAndVersion()`
//! getters.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use semver::Version;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{DeployError, Result};

/// Logical contract category recorded in the address book.
///
/// The string is opaque to the registry; the well-known constants below cover
/// the contracts wired by the lane workflow.
///
/// # Example
///
/// ```rust
/// use ccip_deploy::ContractType;
///
/// assert_eq!(ContractType::ROUTER.as_str(), "Router");
/// assert_eq!(ContractType::new("TokenPool").as_str(), "TokenPool");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContractType(Cow<'static, str>);

impl ContractType {
    pub const ROUTER: Self = Self(Cow::Borrowed("Router"));
    pub const ON_RAMP: Self = Self(Cow::Borrowed("OnRamp"));
    pub const OFF_RAMP: Self = Self(Cow::Borrowed("OffRamp"));
    pub const FEE_QUOTER: Self = Self(Cow::Borrowed("FeeQuoter"));
    pub const LINK_TOKEN: Self = Self(Cow::Borrowed("LinkToken"));
    pub const WETH9: Self = Self(Cow::Borrowed("WETH9"));

    /// Creates a contract type from an arbitrary name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContractType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A contract's declared type plus semantic version.
///
/// # Example
///
/// ```rust
/// use ccip_deploy::{ContractType, TypeAndVersion};
///
/// let tv: TypeAndVersion = "Router 1.2.0".parse().unwrap();
/// assert_eq!(tv.contract_type(), &ContractType::ROUTER);
/// assert_eq!(tv.to_string(), "Router 1.2.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeAndVersion {
    contract_type: ContractType,
    version: Version,
}

impl TypeAndVersion {
    /// Creates a record, rejecting an empty contract type or one containing
    /// whitespace. Either would not survive a round trip through
    /// [`parse`](Self::parse).
    pub fn new(contract_type: ContractType, version: Version) -> Result<Self> {
        if contract_type.is_empty() {
            return Err(DeployError::EmptyContractType);
        }
        if contract_type.as_str().chars().any(char::is_whitespace) {
            return Err(DeployError::InvalidTypeAndVersion {
                input: format!("{contract_type} {version}"),
                reason: "contract type must not contain whitespace".to_string(),
            });
        }
        Ok(Self {
            contract_type,
            version,
        })
    }

    /// Parses the canonical `"<Type> <SemVer>"` form.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = |reason: &str| DeployError::InvalidTypeAndVersion {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = input.split(' ');
        let (Some(contract_type), Some(version), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid("expected \"<Type> <Version>\""));
        };
        if contract_type.is_empty() {
            return Err(DeployError::EmptyContractType);
        }
        let version = Version::parse(version).map_err(|e| invalid(&e.to_string()))?;

        Self::new(ContractType::new(contract_type), version)
    }

    pub fn contract_type(&self) -> &ContractType {
        &self.contract_type
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Returns true if this record is of the given contract type, any version.
    pub fn is_type(&self, contract_type: &ContractType) -> bool {
        &self.contract_type == contract_type
    }
}

impl fmt::Display for TypeAndVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.contract_type, self.version)
    }
}

impl FromStr for TypeAndVersion {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for TypeAndVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TypeAndVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Version 1.0.0
pub const V1_0_0: Version = Version::new(1, 0, 0);

/// Version 1.2.0
pub const V1_2_0: Version = Version::new(1, 2, 0);

/// Version 1.6.0-dev
///
/// Pre-release identifiers cannot be built in a const context, so this parses
/// a literal and panics only if the literal itself is malformed.
pub fn v1_6_0_dev() -> Version {
    Version::parse("1.6.0-dev").expect("1.6.0-dev is a valid semver literal")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Router 1.2.0")]
    #[case("OnRamp 1.6.0-dev")]
    #[case("WETH9 1.0.0")]
    #[case("TokenPool 2.10.3-rc.1")]
    fn test_parse_format_roundtrip(#[case] input: &str) {
        let tv = TypeAndVersion::parse(input).unwrap();
        assert_eq!(tv.to_string(), input);
        assert_eq!(TypeAndVersion::parse(&tv.to_string()).unwrap(), tv);
    }

    #[rstest]
    #[case("Router")]
    #[case("Router 1.2")]
    #[case("Router 1.2.0 extra")]
    #[case("Router  1.2.0")]
    #[case("")]
    fn test_parse_rejects_malformed(#[case] input: &str) {
        assert!(TypeAndVersion::parse(input).is_err());
    }

    #[test]
    fn test_parse_rejects_empty_type() {
        assert!(matches!(
            TypeAndVersion::parse(" 1.2.0"),
            Err(DeployError::EmptyContractType)
        ));
    }

    #[test]
    fn test_new_rejects_empty_type() {
        assert!(matches!(
            TypeAndVersion::new(ContractType::new(""), V1_0_0),
            Err(DeployError::EmptyContractType)
        ));
    }

    #[rstest]
    #[case("Token Pool")]
    #[case("Router\t")]
    #[case("\nOnRamp")]
    #[case("Fee\u{a0}Quoter")]
    fn test_new_rejects_whitespace_in_type(#[case] name: &str) {
        assert!(matches!(
            TypeAndVersion::new(ContractType::new(name), V1_2_0),
            Err(DeployError::InvalidTypeAndVersion { .. })
        ));
    }

    #[test]
    fn test_every_constructed_record_parses_back() {
        for name in ["Router", "OnRamp", "BurnMintTokenPool", "WETH9"] {
            let tv = TypeAndVersion::new(ContractType::new(name), v1_6_0_dev()).unwrap();
            assert_eq!(TypeAndVersion::parse(&tv.to_string()).unwrap(), tv);
        }
    }

    #[test]
    fn test_well_known_versions() {
        let onramp = TypeAndVersion::new(ContractType::ON_RAMP, v1_6_0_dev()).unwrap();
        assert_eq!(onramp.to_string(), "OnRamp 1.6.0-dev");
        assert!(onramp.is_type(&ContractType::ON_RAMP));
        assert!(!onramp.is_type(&ContractType::OFF_RAMP));
    }

    #[test]
    fn test_serde_as_canonical_string() {
        let tv = TypeAndVersion::new(ContractType::ROUTER, V1_2_0).unwrap();
        let json = serde_json::to_string(&tv).unwrap();
        assert_eq!(json, "\"Router 1.2.0\"");
        let back: TypeAndVersion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tv);
    }
}
