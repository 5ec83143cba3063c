//! Starknet JSON-RPC `BROADCASTED_*_TXN` encoding.
//!
//! Felts and integers are `0x` hex strings, DA modes are `"L1"`/`"L2"`, and
//! the `version` field carries the query offset when `is_query` is set.

use serde_json::{json, Value};
use starknet_crypto::Felt;

use super::details::TransactionDetails;
use super::hash::TransactionVersion;
use super::resource_bounds::FeeSettings;
use super::signable::SignedTransaction;
use crate::types::felt_to_hex;

pub(crate) fn to_rpc_json(signed: &SignedTransaction) -> Value {
    let tx = signed.transaction();
    let version = tx.version();
    let signature = hex_array(&signed.signature_felts());

    match tx.details() {
        TransactionDetails::Invoke(invoke) => {
            let mut body = json!({
                "type": "INVOKE",
                "sender_address": invoke.sender_address.to_string(),
                "calldata": hex_array(&invoke.calldata),
                "version": felt_to_hex(&version.as_felt(invoke.is_query)),
                "signature": signature,
                "nonce": felt_to_hex(&invoke.nonce),
            });
            if version == TransactionVersion::V3 {
                insert_v3_fee_fields(&mut body, &invoke.fee);
                insert(&mut body, "account_deployment_data", hex_array(&invoke.account_deployment_data));
            } else {
                insert(&mut body, "max_fee", felt_to_hex(&invoke.fee.max_fee).into());
            }
            body
        }
        TransactionDetails::DeployAccount(deploy) => {
            let mut body = json!({
                "type": "DEPLOY_ACCOUNT",
                "version": felt_to_hex(&version.as_felt(deploy.is_query)),
                "signature": signature,
                "nonce": felt_to_hex(&deploy.nonce),
                "contract_address_salt": felt_to_hex(&deploy.contract_address_salt),
                "constructor_calldata": hex_array(&deploy.constructor_calldata),
                "class_hash": felt_to_hex(&deploy.class_hash),
            });
            if version == TransactionVersion::V3 {
                insert_v3_fee_fields(&mut body, &deploy.fee);
            } else {
                insert(&mut body, "max_fee", felt_to_hex(&deploy.fee.max_fee).into());
            }
            body
        }
        TransactionDetails::Declare(declare) => {
            let mut body = json!({
                "type": "DECLARE",
                "sender_address": declare.sender_address.to_string(),
                "version": felt_to_hex(&version.as_felt(declare.is_query)),
                "signature": signature,
                "nonce": felt_to_hex(&declare.nonce),
                "class_hash": felt_to_hex(&declare.class_hash),
            });
            if let Some(compiled) = &declare.compiled_class_hash {
                insert(&mut body, "compiled_class_hash", felt_to_hex(compiled).into());
            }
            if let Some(class) = &declare.contract_class {
                insert(&mut body, "contract_class", class.clone());
            }
            if version == TransactionVersion::V3 {
                insert_v3_fee_fields(&mut body, &declare.fee);
                insert(&mut body, "account_deployment_data", hex_array(&declare.account_deployment_data));
            } else {
                insert(&mut body, "max_fee", felt_to_hex(&declare.fee.max_fee).into());
            }
            body
        }
    }
}

fn insert_v3_fee_fields(body: &mut Value, fee: &FeeSettings) {
    insert(body, "resource_bounds", json!(fee.resource_bounds));
    insert(body, "tip", format!("{:#x}", fee.tip).into());
    insert(body, "paymaster_data", hex_array(&fee.paymaster_data));
    insert(body, "nonce_data_availability_mode", json!(fee.nonce_data_availability_mode));
    insert(body, "fee_data_availability_mode", json!(fee.fee_data_availability_mode));
}

fn insert(body: &mut Value, key: &str, value: Value) {
    if let Some(map) = body.as_object_mut() {
        map.insert(key.to_string(), value);
    }
}

fn hex_array(values: &[Felt]) -> Value {
    Value::Array(values.iter().map(|v| Value::String(felt_to_hex(v))).collect())
}
