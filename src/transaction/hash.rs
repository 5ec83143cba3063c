use starknet::core::crypto::compute_hash_on_elements;
use starknet::core::utils::get_contract_address;
use starknet_crypto::{poseidon_hash_many, Felt, PoseidonHasher};

use super::details::{DeclareDetails, DeployAccountDetails, InvokeDetails, TransactionDetails};
use super::resource_bounds::{FeeSettings, ResourceKind};
use crate::constants::prefixes::{DECLARE, DEPLOY_ACCOUNT, INVOKE, QUERY_VERSION_OFFSET};
use crate::errors::SignerError;
use crate::types::{Address, ChainId};

/// Hash layout family selected by the transaction version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionVersion {
    /// Pedersen layout, `max_fee`
    V1,
    /// Pedersen layout with compiled class hash (declare only)
    V2,
    /// Poseidon layout, resource bounds
    V3,
}

impl TransactionVersion {
    /// Resolve the layout for a kind, rejecting unknown pairs
    pub fn for_kind(kind: &'static str, version: u64) -> Result<Self, SignerError> {
        let resolved = match (kind, version) {
            ("invoke", 1) | ("deploy_account", 1) | ("declare", 1) => Some(Self::V1),
            ("declare", 2) => Some(Self::V2),
            ("invoke", 3) | ("deploy_account", 3) | ("declare", 3) => Some(Self::V3),
            _ => None,
        };

        resolved.ok_or(SignerError::UnsupportedVersion { kind, version })
    }

    pub fn as_u64(&self) -> u64 {
        match self {
            Self::V1 => 1,
            Self::V2 => 2,
            Self::V3 => 3,
        }
    }

    /// Version felt as hashed and broadcast; query versions carry a 2^128 offset
    pub fn as_felt(&self, is_query: bool) -> Felt {
        let version = Felt::from(self.as_u64());
        if is_query {
            QUERY_VERSION_OFFSET + version
        } else {
            version
        }
    }
}

/// Address that a deploy-account transaction will deploy to (deployer 0)
pub fn compute_deploy_account_address(details: &DeployAccountDetails) -> Result<Address, SignerError> {
    let address = get_contract_address(
        details.contract_address_salt,
        details.class_hash,
        &details.constructor_calldata,
        Felt::ZERO,
    );
    Address::new(address)
}

/// Compute the hash of a transaction for the given chain and version
pub fn compute_transaction_hash(
    details: &TransactionDetails,
    chain_id: ChainId,
    version: u64,
) -> Result<Felt, SignerError> {
    let layout = TransactionVersion::for_kind(details.kind(), version)?;
    validate_fee_fields(details.fee(), layout)?;

    let chain_id = chain_id.as_felt();
    match details {
        TransactionDetails::Invoke(invoke) => hash_invoke(invoke, chain_id, layout),
        TransactionDetails::DeployAccount(deploy) => hash_deploy_account(deploy, chain_id, layout),
        TransactionDetails::Declare(declare) => hash_declare(declare, chain_id, layout),
    }
}

fn validate_fee_fields(fee: &FeeSettings, layout: TransactionVersion) -> Result<(), SignerError> {
    match layout {
        TransactionVersion::V1 | TransactionVersion::V2 if fee.has_v3_fields() => {
            Err(SignerError::InvalidInput(format!(
                "v{} transactions take max_fee only; resource bounds, tip, paymaster data and L2 DA modes require v3",
                layout.as_u64()
            )))
        }
        TransactionVersion::V3 if fee.max_fee != Felt::ZERO => Err(SignerError::InvalidInput(
            "v3 transactions are priced by resource bounds; max_fee must be zero".to_string(),
        )),
        _ => Ok(()),
    }
}

fn hash_invoke(
    tx: &InvokeDetails,
    chain_id: Felt,
    layout: TransactionVersion,
) -> Result<Felt, SignerError> {
    match layout {
        TransactionVersion::V1 => {
            if !tx.account_deployment_data.is_empty() {
                return Err(SignerError::InvalidInput(
                    "account_deployment_data requires a v3 invoke".to_string(),
                ));
            }
            Ok(compute_hash_on_elements(&[
                INVOKE,
                layout.as_felt(tx.is_query),
                tx.sender_address.as_felt(),
                Felt::ZERO,
                compute_hash_on_elements(&tx.calldata),
                tx.fee.max_fee,
                chain_id,
                tx.nonce,
            ]))
        }
        TransactionVersion::V3 => {
            let mut hasher = v3_common_fields(
                INVOKE,
                layout.as_felt(tx.is_query),
                tx.sender_address.as_felt(),
                &tx.fee,
                chain_id,
                tx.nonce,
            );
            hasher.update(poseidon_hash_many(&tx.account_deployment_data));
            hasher.update(poseidon_hash_many(&tx.calldata));
            Ok(hasher.finalize())
        }
        TransactionVersion::V2 => Err(SignerError::UnsupportedVersion {
            kind: "invoke",
            version: 2,
        }),
    }
}

fn hash_deploy_account(
    tx: &DeployAccountDetails,
    chain_id: Felt,
    layout: TransactionVersion,
) -> Result<Felt, SignerError> {
    let contract_address = compute_deploy_account_address(tx)?.as_felt();

    match layout {
        TransactionVersion::V1 => {
            let mut payload = Vec::with_capacity(tx.constructor_calldata.len() + 2);
            payload.push(tx.class_hash);
            payload.push(tx.contract_address_salt);
            payload.extend_from_slice(&tx.constructor_calldata);

            Ok(compute_hash_on_elements(&[
                DEPLOY_ACCOUNT,
                layout.as_felt(tx.is_query),
                contract_address,
                Felt::ZERO,
                compute_hash_on_elements(&payload),
                tx.fee.max_fee,
                chain_id,
                tx.nonce,
            ]))
        }
        TransactionVersion::V3 => {
            let mut hasher = v3_common_fields(
                DEPLOY_ACCOUNT,
                layout.as_felt(tx.is_query),
                contract_address,
                &tx.fee,
                chain_id,
                tx.nonce,
            );
            hasher.update(poseidon_hash_many(&tx.constructor_calldata));
            hasher.update(tx.class_hash);
            hasher.update(tx.contract_address_salt);
            Ok(hasher.finalize())
        }
        TransactionVersion::V2 => Err(SignerError::UnsupportedVersion {
            kind: "deploy_account",
            version: 2,
        }),
    }
}

fn hash_declare(
    tx: &DeclareDetails,
    chain_id: Felt,
    layout: TransactionVersion,
) -> Result<Felt, SignerError> {
    let compiled_class_hash = match (layout, tx.compiled_class_hash) {
        (TransactionVersion::V1, None) => None,
        (TransactionVersion::V1, Some(_)) => {
            return Err(SignerError::InvalidInput(
                "declare v1 has no compiled class hash".to_string(),
            ))
        }
        (_, Some(hash)) => Some(hash),
        (_, None) => {
            return Err(SignerError::InvalidInput(format!(
                "declare v{} requires a compiled class hash",
                layout.as_u64()
            )))
        }
    };

    match layout {
        TransactionVersion::V1 | TransactionVersion::V2 => {
            if !tx.account_deployment_data.is_empty() {
                return Err(SignerError::InvalidInput(
                    "account_deployment_data requires a v3 declare".to_string(),
                ));
            }
            let mut elements = vec![
                DECLARE,
                layout.as_felt(tx.is_query),
                tx.sender_address.as_felt(),
                Felt::ZERO,
                compute_hash_on_elements(&[tx.class_hash]),
                tx.fee.max_fee,
                chain_id,
                tx.nonce,
            ];
            elements.extend(compiled_class_hash);
            Ok(compute_hash_on_elements(&elements))
        }
        TransactionVersion::V3 => {
            let mut hasher = v3_common_fields(
                DECLARE,
                layout.as_felt(tx.is_query),
                tx.sender_address.as_felt(),
                &tx.fee,
                chain_id,
                tx.nonce,
            );
            hasher.update(poseidon_hash_many(&tx.account_deployment_data));
            hasher.update(tx.class_hash);
            hasher.update(compiled_class_hash.unwrap_or(Felt::ZERO));
            Ok(hasher.finalize())
        }
    }
}

/// Prefix shared by every v3 kind, up to and including the DA modes
fn v3_common_fields(
    prefix: Felt,
    version: Felt,
    address: Felt,
    fee: &FeeSettings,
    chain_id: Felt,
    nonce: Felt,
) -> PoseidonHasher {
    let mut hasher = PoseidonHasher::new();

    hasher.update(prefix);
    hasher.update(version);
    hasher.update(address);
    hasher.update(fee_hash(fee));
    hasher.update(poseidon_hash_many(&fee.paymaster_data));
    hasher.update(chain_id);
    hasher.update(nonce);
    hasher.update(fee.data_availability_modes());

    hasher
}

fn fee_hash(fee: &FeeSettings) -> Felt {
    let mut fee_hasher = PoseidonHasher::new();

    fee_hasher.update(fee.tip.into());
    for kind in ResourceKind::ALL {
        fee_hasher.update(fee.resource_bounds.get(kind).pack(kind));
    }

    fee_hasher.finalize()
}
