//! Contributor identity shape: anonymous edits are attributed to an IP address.

use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// A contributor name that parsed as an IPv4 or IPv6 address.
///
/// This is a syntactic check only; nothing here resolves or geolocates the address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContributorAddress(IpAddr);

impl ContributorAddress {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        IpAddr::from_str(trimmed)
            .map(Self)
            .map_err(|_| ValidationError::InvalidAddress(trimmed.to_string()))
    }

    pub fn is_ipv6(&self) -> bool {
        self.0.is_ipv6()
    }
}

impl fmt::Display for ContributorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ContributorAddress {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ContributorAddress {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ContributorAddress> for String {
    fn from(address: ContributorAddress) -> Self {
        address.to_string()
    }
}
