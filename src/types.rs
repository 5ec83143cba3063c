use serde::{Deserialize, Deserializer, Serialize, Serializer};
use starknet::core::utils::{cairo_short_string_to_felt, parse_cairo_short_string};
use starknet_crypto::Felt;
use std::fmt;
use std::str::FromStr;

use crate::constants::{curve::ELEMENT_UPPER_BOUND, MAINNET_CHAIN_ID, SEPOLIA_CHAIN_ID};
use crate::errors::SignerError;

/// Parse a field element from `0x`-prefixed hex or a decimal string
pub fn parse_felt(value: &str) -> Result<Felt, SignerError> {
    let value = value.trim();
    let parsed = if value.starts_with("0x") || value.starts_with("0X") {
        Felt::from_hex(value)
    } else {
        Felt::from_dec_str(value)
    };

    parsed.map_err(|e| SignerError::InvalidInput(format!("Invalid field element '{value}': {e}")))
}

/// Lowercase `0x` hex, no leading zeros
pub fn felt_to_hex(value: &Felt) -> String {
    format!("{:#x}", value)
}

/// Serde helpers for felts on the JSON-RPC wire (hex strings)
pub mod felt_hex {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Felt, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&felt_to_hex(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Felt, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_felt(&raw).map_err(serde::de::Error::custom)
    }
}

/// Same as [`felt_hex`] for sequences
pub mod felt_hex_vec {
    use super::*;

    pub fn serialize<S: Serializer>(values: &[Felt], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(felt_to_hex))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Felt>, D::Error> {
        let raw = Vec::<String>::deserialize(deserializer)?;
        raw.iter()
            .map(|v| parse_felt(v).map_err(serde::de::Error::custom))
            .collect()
    }
}

/// A contract address: a field element below 2^251
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(Felt);

impl Address {
    pub fn new(value: Felt) -> Result<Self, SignerError> {
        if value >= ELEMENT_UPPER_BOUND {
            return Err(SignerError::InvalidInput(format!(
                "Address {} exceeds the 2^251 address space",
                felt_to_hex(&value)
            )));
        }
        Ok(Self(value))
    }

    pub fn from_hex(value: &str) -> Result<Self, SignerError> {
        Self::new(parse_felt(value)?)
    }

    pub fn as_felt(&self) -> Felt {
        self.0
    }
}

impl TryFrom<Felt> for Address {
    type Error = SignerError;

    fn try_from(value: Felt) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Address> for Felt {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({:#x})", self.0)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Address::from_hex(&raw).map_err(serde::de::Error::custom)
    }
}

/// Chain identifier, a Cairo short string such as `SN_SEPOLIA`
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(Felt);

impl ChainId {
    pub const MAINNET: ChainId = ChainId(MAINNET_CHAIN_ID);
    pub const SEPOLIA: ChainId = ChainId(SEPOLIA_CHAIN_ID);

    /// Encode a short-string chain name (at most 31 ASCII characters)
    pub fn from_name(name: &str) -> Result<Self, SignerError> {
        cairo_short_string_to_felt(name)
            .map(Self)
            .map_err(|e| SignerError::InvalidInput(format!("Invalid chain id '{name}': {e}")))
    }

    pub fn from_felt(value: Felt) -> Self {
        Self(value)
    }

    pub fn as_felt(&self) -> Felt {
        self.0
    }

    /// Human readable name, falling back to hex for non-ASCII ids
    pub fn name(&self) -> String {
        parse_cairo_short_string(&self.0).unwrap_or_else(|_| felt_to_hex(&self.0))
    }
}

impl FromStr for ChainId {
    type Err = SignerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("0x") {
            parse_felt(s).map(Self)
        } else {
            Self::from_name(s)
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl fmt::Debug for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainId({})", self.name())
    }
}

impl Serialize for ChainId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}

impl<'de> Deserialize<'de> for ChainId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
