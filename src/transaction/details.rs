use serde::{Deserialize, Serialize};
use starknet_crypto::Felt;

use super::resource_bounds::FeeSettings;
use crate::types::{felt_hex, felt_hex_vec, Address};

/// Fields of an invoke transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeDetails {
    pub sender_address: Address,
    #[serde(with = "felt_hex_vec")]
    pub calldata: Vec<Felt>,
    #[serde(with = "felt_hex")]
    pub nonce: Felt,
    #[serde(default)]
    pub fee: FeeSettings,
    #[serde(default, with = "felt_hex_vec")]
    pub account_deployment_data: Vec<Felt>,
    #[serde(default)]
    pub is_query: bool,
}

/// Fields of a deploy-account transaction. The sender is derived, never supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployAccountDetails {
    #[serde(with = "felt_hex")]
    pub class_hash: Felt,
    #[serde(with = "felt_hex")]
    pub contract_address_salt: Felt,
    #[serde(with = "felt_hex_vec")]
    pub constructor_calldata: Vec<Felt>,
    #[serde(with = "felt_hex")]
    pub nonce: Felt,
    #[serde(default)]
    pub fee: FeeSettings,
    #[serde(default)]
    pub is_query: bool,
}

/// Fields of a declare transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclareDetails {
    pub sender_address: Address,
    #[serde(with = "felt_hex")]
    pub class_hash: Felt,
    /// Required from v2 on, absent for v1
    #[serde(default, with = "optional_felt_hex")]
    pub compiled_class_hash: Option<Felt>,
    #[serde(with = "felt_hex")]
    pub nonce: Felt,
    #[serde(default)]
    pub fee: FeeSettings,
    #[serde(default, with = "felt_hex_vec")]
    pub account_deployment_data: Vec<Felt>,
    /// Class definition forwarded verbatim on broadcast; not part of the hash
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_class: Option<serde_json::Value>,
    #[serde(default)]
    pub is_query: bool,
}

/// Caller-supplied parameters for one transaction, tagged by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionDetails {
    Invoke(InvokeDetails),
    DeployAccount(DeployAccountDetails),
    Declare(DeclareDetails),
}

impl TransactionDetails {
    pub fn kind(&self) -> &'static str {
        match self {
            TransactionDetails::Invoke(_) => "invoke",
            TransactionDetails::DeployAccount(_) => "deploy_account",
            TransactionDetails::Declare(_) => "declare",
        }
    }

    pub fn nonce(&self) -> Felt {
        match self {
            TransactionDetails::Invoke(d) => d.nonce,
            TransactionDetails::DeployAccount(d) => d.nonce,
            TransactionDetails::Declare(d) => d.nonce,
        }
    }

    pub fn fee(&self) -> &FeeSettings {
        match self {
            TransactionDetails::Invoke(d) => &d.fee,
            TransactionDetails::DeployAccount(d) => &d.fee,
            TransactionDetails::Declare(d) => &d.fee,
        }
    }

    pub fn is_query(&self) -> bool {
        match self {
            TransactionDetails::Invoke(d) => d.is_query,
            TransactionDetails::DeployAccount(d) => d.is_query,
            TransactionDetails::Declare(d) => d.is_query,
        }
    }
}

impl From<InvokeDetails> for TransactionDetails {
    fn from(details: InvokeDetails) -> Self {
        TransactionDetails::Invoke(details)
    }
}

impl From<DeployAccountDetails> for TransactionDetails {
    fn from(details: DeployAccountDetails) -> Self {
        TransactionDetails::DeployAccount(details)
    }
}

impl From<DeclareDetails> for TransactionDetails {
    fn from(details: DeclareDetails) -> Self {
        TransactionDetails::Declare(details)
    }
}

mod optional_felt_hex {
    use serde::{Deserialize, Deserializer, Serializer};
    use starknet_crypto::Felt;

    use crate::types::{felt_to_hex, parse_felt};

    pub fn serialize<S: Serializer>(value: &Option<Felt>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(felt) => serializer.serialize_some(&felt_to_hex(felt)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Felt>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| parse_felt(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_details_from_json() {
        let details: TransactionDetails = serde_json::from_value(json!({
            "type": "INVOKE",
            "sender_address": "0x1",
            "calldata": ["0x2a"],
            "nonce": "5",
            "fee": {
                "resource_bounds": {
                    "l1_gas": {"max_amount": 100, "max_price_per_unit": 1000}
                }
            }
        }))
        .unwrap();

        assert_eq!(details.kind(), "invoke");
        assert_eq!(details.nonce(), Felt::from(5u64));
        assert_eq!(details.fee().resource_bounds.l1_gas.max_amount, 100);
        assert!(!details.is_query());
    }

    #[test]
    fn test_declare_without_compiled_class_hash() {
        let details: TransactionDetails = serde_json::from_value(json!({
            "type": "DECLARE",
            "sender_address": "0x1",
            "class_hash": "0x1234",
            "nonce": "0x0"
        }))
        .unwrap();

        match details {
            TransactionDetails::Declare(declare) => {
                assert!(declare.compiled_class_hash.is_none());
                assert!(declare.contract_class.is_none());
            }
            other => panic!("unexpected kind: {}", other.kind()),
        }
    }
}
