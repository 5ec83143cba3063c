//! Passkey signer: P-256 assertions from a platform authenticator.

use async_trait::async_trait;
use p256::ecdsa::VerifyingKey;
use starknet_crypto::Felt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{PublicKeyMaterial, SignatureComponents, SignerScheme, TransactionSigner};
use crate::cancel::CancelToken;
use crate::constants::curve::ELEMENT_UPPER_BOUND;
use crate::errors::SignerError;

mod assertion;
pub mod authenticator;
pub mod keys;
pub mod signature;


pub use authenticator::{AssertionRequest, Authenticator, AuthenticatorError, WebAuthnSignatureData};
pub use keys::{parse_p256_public_key, P256Coordinates};
pub use signature::{normalize_s, parse_der_signature, WebAuthnSignature};

/// Signer whose key never leaves the authenticator
pub struct WebAuthnSigner {
    authenticator: Arc<dyn Authenticator>,
    rp_id: String,
    credential_id: Vec<u8>,
    public_key: P256Coordinates,
    verifying_key: VerifyingKey,
    user_verification: bool,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for WebAuthnSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebAuthnSigner")
            .field("rp_id", &self.rp_id)
            .field("credential_id", &hex::encode(&self.credential_id))
            .field("public_key", &self.public_key)
            .finish()
    }
}

impl WebAuthnSigner {
    /// `public_key` is the credential key as COSE, DER or SEC1 bytes
    pub fn new(
        authenticator: Arc<dyn Authenticator>,
        rp_id: impl Into<String>,
        credential_id: Vec<u8>,
        public_key: &[u8],
    ) -> Result<Self, SignerError> {
        let rp_id = rp_id.into();
        if rp_id.is_empty() {
            return Err(SignerError::InvalidInput(
                "relying party id cannot be empty".to_string(),
            ));
        }

        let public_key = parse_p256_public_key(public_key)?;
        let verifying_key = public_key.verifying_key()?;

        info!(
            "WebAuthn signer initialized for {} with public key: {}",
            rp_id, public_key
        );

        Ok(Self {
            authenticator,
            rp_id,
            credential_id,
            public_key,
            verifying_key,
            user_verification: true,
            timeout: None,
        })
    }

    pub fn with_user_verification(mut self, required: bool) -> Self {
        self.user_verification = required;
        self
    }

    /// Timeout hint forwarded to the authenticator
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn coordinates(&self) -> P256Coordinates {
        self.public_key
    }

    pub fn rp_id(&self) -> &str {
        &self.rp_id
    }

    /// Run the ceremony for `hash`, resolving to `Cancelled` if `cancel` fires first
    pub async fn sign_with_cancel(
        &self,
        hash: Felt,
        cancel: &CancelToken,
    ) -> Result<WebAuthnSignature, SignerError> {
        let challenge = challenge_for(hash)?;
        if cancel.is_cancelled() {
            return Err(SignerError::Cancelled);
        }

        let request = AssertionRequest {
            rp_id: self.rp_id.clone(),
            challenge,
            credential_id: self.credential_id.clone(),
            user_verification: self.user_verification,
            timeout: self.timeout,
        };

        debug!("Requesting WebAuthn assertion for hash: {:#x}", hash);

        let data = tokio::select! {
            result = self.authenticator.get_assertion(&request) => result?,
            _ = cancel.cancelled() => {
                warn!("WebAuthn ceremony cancelled for hash: {:#x}", hash);
                return Err(SignerError::Cancelled);
            }
        };

        assertion::verify_assertion(&challenge, &self.rp_id, &data, &self.verifying_key)
    }
}

#[async_trait]
impl TransactionSigner for WebAuthnSigner {
    async fn public_key(&self) -> Result<PublicKeyMaterial, SignerError> {
        Ok(PublicKeyMaterial::P256(self.public_key))
    }

    async fn sign_hash(&self, hash: Felt) -> Result<SignatureComponents, SignerError> {
        self.sign_hash_with_cancel(hash, &CancelToken::new()).await
    }

    async fn sign_hash_with_cancel(
        &self,
        hash: Felt,
        cancel: &CancelToken,
    ) -> Result<SignatureComponents, SignerError> {
        let signature = self.sign_with_cancel(hash, cancel).await?;
        Ok(SignatureComponents::WebAuthn(signature))
    }

    fn scheme(&self) -> SignerScheme {
        SignerScheme::WebAuthnP256
    }
}

/// WebAuthn challenge for a transaction hash: its 32-byte big-endian form
pub fn challenge_for(hash: Felt) -> Result<[u8; 32], SignerError> {
    if hash >= ELEMENT_UPPER_BOUND {
        return Err(SignerError::InvalidInput(format!(
            "hash {:#x} is not below 2^251",
            hash
        )));
    }
    Ok(hash.to_bytes_be())
}
