//! Signing backends behind one contract.
//!
//! [`TransactionSigner`] is implemented by [`StarkSigner`] (local key),
//! [`WebAuthnSigner`] (platform passkey) and [`PrivySigner`] (custodial API).
//! [`SignerAdapter`] wraps any of them to add logging, auditing and
//! per-instance serialization without touching the signature bytes.

use async_trait::async_trait;
use serde::Serialize;
use starknet_crypto::Felt;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::cancel::CancelToken;
use crate::errors::SignerError;
use crate::transaction::{SignableTransaction, SignedTransaction};

pub mod adapter;
pub mod privy;
pub mod stark;
pub mod webauthn;


// Re-export main types for easier access
pub use adapter::SignerAdapter;
pub use privy::{PrivyConfig, PrivySigner};
pub use stark::{verify_stark_signature, StarkSigner};
pub use webauthn::{
    parse_p256_public_key, Authenticator, P256Coordinates, WebAuthnSignature,
    WebAuthnSignatureData, WebAuthnSigner,
};

/// Signature scheme a backend produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignerScheme {
    /// ECDSA over the Stark curve, `[r, s]`
    Stark,
    /// P-256 ECDSA wrapped in a WebAuthn assertion
    WebAuthnP256,
}

impl fmt::Display for SignerScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignerScheme::Stark => f.write_str("stark"),
            SignerScheme::WebAuthnP256 => f.write_str("webauthn_p256"),
        }
    }
}

/// Public key as exposed by a signer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicKeyMaterial {
    Stark(Felt),
    P256(P256Coordinates),
}

impl PublicKeyMaterial {
    pub fn scheme(&self) -> SignerScheme {
        match self {
            PublicKeyMaterial::Stark(_) => SignerScheme::Stark,
            PublicKeyMaterial::P256(_) => SignerScheme::WebAuthnP256,
        }
    }

    /// Felt encoding used in account constructor calldata
    pub fn to_felts(&self) -> Vec<Felt> {
        match self {
            PublicKeyMaterial::Stark(key) => vec![*key],
            PublicKeyMaterial::P256(coordinates) => coordinates.to_felts().to_vec(),
        }
    }
}

impl fmt::Display for PublicKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublicKeyMaterial::Stark(key) => write!(f, "{:#x}", key),
            PublicKeyMaterial::P256(coordinates) => write!(f, "{}", coordinates),
        }
    }
}

/// Scheme-dependent signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureComponents {
    Stark { r: Felt, s: Felt },
    WebAuthn(WebAuthnSignature),
}

impl SignatureComponents {
    pub fn scheme(&self) -> SignerScheme {
        match self {
            SignatureComponents::Stark { .. } => SignerScheme::Stark,
            SignatureComponents::WebAuthn(_) => SignerScheme::WebAuthnP256,
        }
    }

    /// Ordered felts for the transaction `signature` field
    pub fn to_felts(&self) -> Vec<Felt> {
        match self {
            SignatureComponents::Stark { r, s } => vec![*r, *s],
            SignatureComponents::WebAuthn(signature) => signature.to_felts(),
        }
    }
}

/// Contract every signing backend fulfils.
///
/// `sign_hash` may suspend on I/O (an authenticator prompt or a network
/// round-trip) but never touches chain state. Implementations backed by a
/// single-session transport expect callers to serialize `sign_hash` calls
/// per instance; [`SignerAdapter`] does this.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    /// Public key material, derived locally or fetched and cached
    async fn public_key(&self) -> Result<PublicKeyMaterial, SignerError>;

    /// Sign a transaction hash
    async fn sign_hash(&self, hash: Felt) -> Result<SignatureComponents, SignerError>;

    /// Sign a transaction hash, resolving to `Cancelled` if `cancel` fires first.
    ///
    /// Backends that hold a prompt or a connection open override this to
    /// tear it down; the default drops the pending `sign_hash` future.
    async fn sign_hash_with_cancel(
        &self,
        hash: Felt,
        cancel: &CancelToken,
    ) -> Result<SignatureComponents, SignerError> {
        if cancel.is_cancelled() {
            return Err(SignerError::Cancelled);
        }
        tokio::select! {
            result = self.sign_hash(hash) => result,
            _ = cancel.cancelled() => Err(SignerError::Cancelled),
        }
    }

    /// Scheme of the signatures this backend returns
    fn scheme(&self) -> SignerScheme;
}

#[async_trait]
impl<T: TransactionSigner + ?Sized> TransactionSigner for Arc<T> {
    async fn public_key(&self) -> Result<PublicKeyMaterial, SignerError> {
        (**self).public_key().await
    }

    async fn sign_hash(&self, hash: Felt) -> Result<SignatureComponents, SignerError> {
        (**self).sign_hash(hash).await
    }

    async fn sign_hash_with_cancel(
        &self,
        hash: Felt,
        cancel: &CancelToken,
    ) -> Result<SignatureComponents, SignerError> {
        (**self).sign_hash_with_cancel(hash, cancel).await
    }

    fn scheme(&self) -> SignerScheme {
        (**self).scheme()
    }
}

#[async_trait]
impl<T: TransactionSigner + ?Sized> TransactionSigner for Box<T> {
    async fn public_key(&self) -> Result<PublicKeyMaterial, SignerError> {
        (**self).public_key().await
    }

    async fn sign_hash(&self, hash: Felt) -> Result<SignatureComponents, SignerError> {
        (**self).sign_hash(hash).await
    }

    async fn sign_hash_with_cancel(
        &self,
        hash: Felt,
        cancel: &CancelToken,
    ) -> Result<SignatureComponents, SignerError> {
        (**self).sign_hash_with_cancel(hash, cancel).await
    }

    fn scheme(&self) -> SignerScheme {
        (**self).scheme()
    }
}

/// Sign a hashed transaction. Nothing is returned unless the signature is complete.
pub async fn sign_transaction(
    signer: &dyn TransactionSigner,
    transaction: &SignableTransaction,
) -> Result<SignedTransaction, SignerError> {
    sign_transaction_with_cancel(signer, transaction, &CancelToken::new()).await
}

/// [`sign_transaction`] that gives up with `Cancelled` once `cancel` fires
pub async fn sign_transaction_with_cancel(
    signer: &dyn TransactionSigner,
    transaction: &SignableTransaction,
    cancel: &CancelToken,
) -> Result<SignedTransaction, SignerError> {
    debug!(
        "Signing {} transaction {:#x} with {} signer",
        transaction.details().kind(),
        transaction.hash(),
        signer.scheme()
    );

    let signature = signer
        .sign_hash_with_cancel(transaction.hash(), cancel)
        .await?;

    if signature.scheme() != signer.scheme() {
        return Err(SignerError::SigningFailed(format!(
            "{} signer returned a {} signature",
            signer.scheme(),
            signature.scheme()
        )));
    }

    Ok(transaction.clone().with_signature(signature))
}
