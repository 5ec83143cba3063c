use serde::{Deserialize, Deserializer, Serialize, Serializer};
use starknet_crypto::Felt;

use crate::constants::resources;
use crate::types::felt_hex_vec;

/// Fee-market resource kinds of a v3 transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    L1Gas,
    L2Gas,
    L1DataGas,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::L1Gas,
        ResourceKind::L2Gas,
        ResourceKind::L1DataGas,
    ];

    /// Name as it appears in JSON-RPC (`l1_gas`, ...)
    pub fn wire_name(&self) -> &'static str {
        match self {
            ResourceKind::L1Gas => "l1_gas",
            ResourceKind::L2Gas => "l2_gas",
            ResourceKind::L1DataGas => "l1_data_gas",
        }
    }

    /// Name as packed into the transaction hash
    pub fn hash_name(&self) -> [u8; 8] {
        match self {
            ResourceKind::L1Gas => resources::L1_GAS,
            ResourceKind::L2Gas => resources::L2_GAS,
            ResourceKind::L1DataGas => resources::L1_DATA_GAS,
        }
    }
}

/// Limit for one resource; zero is legal and rejected by the network at execution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceBound {
    #[serde(with = "int_hex")]
    pub max_amount: u64,
    #[serde(with = "int_hex")]
    pub max_price_per_unit: u128,
}

impl ResourceBound {
    pub fn new(max_amount: u64, max_price_per_unit: u128) -> Self {
        Self {
            max_amount,
            max_price_per_unit,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.max_amount == 0 && self.max_price_per_unit == 0
    }

    /// `name (8 bytes) || max_amount (8 bytes BE) || max_price_per_unit (16 bytes BE)`
    pub fn pack(&self, kind: ResourceKind) -> Felt {
        let mut buffer = [0u8; 32];
        buffer[..8].copy_from_slice(&kind.hash_name());
        buffer[8..16].copy_from_slice(&self.max_amount.to_be_bytes());
        buffer[16..].copy_from_slice(&self.max_price_per_unit.to_be_bytes());
        Felt::from_bytes_be(&buffer)
    }
}

/// Resource limits of a v3 transaction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceBounds {
    #[serde(default)]
    pub l1_gas: ResourceBound,
    #[serde(default)]
    pub l2_gas: ResourceBound,
    #[serde(default)]
    pub l1_data_gas: ResourceBound,
}

impl ResourceBounds {
    pub fn get(&self, kind: ResourceKind) -> &ResourceBound {
        match kind {
            ResourceKind::L1Gas => &self.l1_gas,
            ResourceKind::L2Gas => &self.l2_gas,
            ResourceKind::L1DataGas => &self.l1_data_gas,
        }
    }

    pub fn set(&mut self, kind: ResourceKind, bound: ResourceBound) {
        match kind {
            ResourceKind::L1Gas => self.l1_gas = bound,
            ResourceKind::L2Gas => self.l2_gas = bound,
            ResourceKind::L1DataGas => self.l1_data_gas = bound,
        }
    }

    pub fn is_zero(&self) -> bool {
        ResourceKind::ALL.iter().all(|kind| self.get(*kind).is_zero())
    }
}

/// Data availability mode for nonce and fee
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataAvailabilityMode {
    #[default]
    L1,
    L2,
}

impl DataAvailabilityMode {
    pub fn as_u64(&self) -> u64 {
        match self {
            DataAvailabilityMode::L1 => 0,
            DataAvailabilityMode::L2 => 1,
        }
    }
}

/// Fee parameters for every supported version.
///
/// `max_fee` applies to v1/v2; the remaining fields apply to v3.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSettings {
    #[serde(with = "crate::types::felt_hex")]
    pub max_fee: Felt,
    pub resource_bounds: ResourceBounds,
    #[serde(with = "int_hex")]
    pub tip: u64,
    #[serde(with = "felt_hex_vec")]
    pub paymaster_data: Vec<Felt>,
    pub nonce_data_availability_mode: DataAvailabilityMode,
    pub fee_data_availability_mode: DataAvailabilityMode,
}

impl FeeSettings {
    /// v3 fee settings with the given bounds and everything else defaulted
    pub fn v3(resource_bounds: ResourceBounds) -> Self {
        Self {
            resource_bounds,
            ..Default::default()
        }
    }

    /// v1/v2 fee settings
    pub fn legacy(max_fee: Felt) -> Self {
        Self {
            max_fee,
            ..Default::default()
        }
    }

    pub(crate) fn has_v3_fields(&self) -> bool {
        !self.resource_bounds.is_zero()
            || self.tip != 0
            || !self.paymaster_data.is_empty()
            || self.nonce_data_availability_mode != DataAvailabilityMode::L1
            || self.fee_data_availability_mode != DataAvailabilityMode::L1
    }

    /// `nonce_da << 32 | fee_da`
    pub(crate) fn data_availability_modes(&self) -> Felt {
        Felt::from(
            (self.nonce_data_availability_mode.as_u64() << 32)
                + self.fee_data_availability_mode.as_u64(),
        )
    }
}

/// Hex-string encoding for unsigned integers, accepting plain JSON numbers on input
pub(crate) mod int_hex {
    use super::*;

    pub trait HexInt: Sized + Copy + std::fmt::LowerHex {
        fn parse(raw: &str, radix: u32) -> Result<Self, std::num::ParseIntError>;
        fn from_u64(value: u64) -> Self;
    }

    impl HexInt for u64 {
        fn parse(raw: &str, radix: u32) -> Result<Self, std::num::ParseIntError> {
            u64::from_str_radix(raw, radix)
        }

        fn from_u64(value: u64) -> Self {
            value
        }
    }

    impl HexInt for u128 {
        fn parse(raw: &str, radix: u32) -> Result<Self, std::num::ParseIntError> {
            u128::from_str_radix(raw, radix)
        }

        fn from_u64(value: u64) -> Self {
            value as u128
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    pub fn serialize<T: HexInt, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{:#x}", value))
    }

    pub fn deserialize<'de, T: HexInt, D: Deserializer<'de>>(deserializer: D) -> Result<T, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Number(value) => Ok(T::from_u64(value)),
            Raw::Text(text) => {
                let parsed = match text.strip_prefix("0x") {
                    Some(hex) => T::parse(hex, 16),
                    None => T::parse(&text, 10),
                };
                parsed.map_err(|e| serde::de::Error::custom(format!("invalid integer '{text}': {e}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pack_layout() {
        let bound = ResourceBound::new(0x600, 0x1254);
        let packed = bound.pack(ResourceKind::L1DataGas).to_bytes_be();

        assert_eq!(&packed[..8], b"\0L1_DATA");
        assert_eq!(&packed[8..16], &0x600u64.to_be_bytes());
        assert_eq!(&packed[16..], &0x1254u128.to_be_bytes());
    }

    #[test]
    fn test_wire_encoding_is_hex() {
        let mut bounds = ResourceBounds::default();
        bounds.set(ResourceKind::L1Gas, ResourceBound::new(100, 1000));

        let value = serde_json::to_value(bounds).unwrap();
        assert_eq!(
            value,
            json!({
                "l1_gas": {"max_amount": "0x64", "max_price_per_unit": "0x3e8"},
                "l2_gas": {"max_amount": "0x0", "max_price_per_unit": "0x0"},
                "l1_data_gas": {"max_amount": "0x0", "max_price_per_unit": "0x0"}
            })
        );
    }

    #[test]
    fn test_accepts_numbers_and_missing_resources() {
        let bounds: ResourceBounds = serde_json::from_value(json!({
            "l1_gas": {"max_amount": 100, "max_price_per_unit": "1000"}
        }))
        .unwrap();

        assert_eq!(bounds.l1_gas, ResourceBound::new(100, 1000));
        assert!(bounds.l2_gas.is_zero());
        assert!(!bounds.is_zero());
    }

    #[test]
    fn test_data_availability_modes_felt() {
        let fee = FeeSettings {
            nonce_data_availability_mode: DataAvailabilityMode::L2,
            ..Default::default()
        };
        assert_eq!(fee.data_availability_modes(), Felt::from(1u64 << 32));
        assert!(fee.has_v3_fields());
        assert!(!FeeSettings::default().has_v3_fields());
    }
}
