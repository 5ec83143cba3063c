use starknet_crypto::Felt;
use tracing::debug;

use super::details::{DeclareDetails, DeployAccountDetails, InvokeDetails, TransactionDetails};
use super::hash::{compute_deploy_account_address, compute_transaction_hash, TransactionVersion};
use super::wire;
use crate::errors::SignerError;
use crate::signer::SignatureComponents;
use crate::types::{Address, ChainId};

/// A transaction with its hash computed, waiting for a signature
#[derive(Debug, Clone, PartialEq)]
pub struct SignableTransaction {
    details: TransactionDetails,
    chain_id: ChainId,
    version: TransactionVersion,
    sender_address: Address,
    hash: Felt,
}

impl SignableTransaction {
    /// Validate the details against the version layout and compute the hash
    pub fn new(
        details: impl Into<TransactionDetails>,
        chain_id: ChainId,
        version: u64,
    ) -> Result<Self, SignerError> {
        let details = details.into();
        let layout = TransactionVersion::for_kind(details.kind(), version)?;
        let hash = compute_transaction_hash(&details, chain_id, version)?;

        let sender_address = match &details {
            TransactionDetails::Invoke(invoke) => invoke.sender_address,
            TransactionDetails::Declare(declare) => declare.sender_address,
            TransactionDetails::DeployAccount(deploy) => compute_deploy_account_address(deploy)?,
        };

        debug!(
            "Computed {} v{} transaction hash on {}: {:#x}",
            details.kind(),
            version,
            chain_id,
            hash
        );

        Ok(Self {
            details,
            chain_id,
            version: layout,
            sender_address,
            hash,
        })
    }

    pub fn invoke(details: InvokeDetails, chain_id: ChainId, version: u64) -> Result<Self, SignerError> {
        Self::new(details, chain_id, version)
    }

    pub fn deploy_account(
        details: DeployAccountDetails,
        chain_id: ChainId,
        version: u64,
    ) -> Result<Self, SignerError> {
        Self::new(details, chain_id, version)
    }

    pub fn declare(details: DeclareDetails, chain_id: ChainId, version: u64) -> Result<Self, SignerError> {
        Self::new(details, chain_id, version)
    }

    pub fn hash(&self) -> Felt {
        self.hash
    }

    pub fn details(&self) -> &TransactionDetails {
        &self.details
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub fn version(&self) -> TransactionVersion {
        self.version
    }

    /// Account the transaction is sent from; the derived address for deploy-account
    pub fn sender_address(&self) -> Address {
        self.sender_address
    }

    /// Bind a signature; the signable value is consumed
    pub fn with_signature(self, signature: SignatureComponents) -> SignedTransaction {
        SignedTransaction {
            transaction: self,
            signature,
        }
    }
}

/// A signed transaction ready for the RPC collaborator to broadcast
#[derive(Debug, Clone, PartialEq)]
pub struct SignedTransaction {
    transaction: SignableTransaction,
    signature: SignatureComponents,
}

impl SignedTransaction {
    pub fn transaction(&self) -> &SignableTransaction {
        &self.transaction
    }

    pub fn hash(&self) -> Felt {
        self.transaction.hash
    }

    pub fn signature(&self) -> &SignatureComponents {
        &self.signature
    }

    /// Signature as the felt array carried in the `signature` field
    pub fn signature_felts(&self) -> Vec<Felt> {
        self.signature.to_felts()
    }

    /// JSON-RPC broadcast payload
    pub fn to_json(&self) -> serde_json::Value {
        wire::to_rpc_json(self)
    }

    /// Compact JSON bytes of [`Self::to_json`]; key order is stable
    pub fn to_bytes(&self) -> Result<Vec<u8>, SignerError> {
        serde_json::to_vec(&self.to_json())
            .map_err(|e| SignerError::Internal(format!("Failed to serialize transaction: {e}")))
    }
}
