use async_trait::async_trait;
use starknet::signers::SigningKey;
use starknet_crypto::Felt;
use std::fmt;
use std::sync::OnceLock;
use tracing::{debug, info};

use super::{PublicKeyMaterial, SignatureComponents, SignerScheme, TransactionSigner};
use crate::constants::curve::{EC_ORDER, ELEMENT_UPPER_BOUND};
use crate::errors::SignerError;
use crate::keystore::{KeyMaterial, Keystore};

/// Signer holding a Stark-curve private scalar in process memory
pub struct StarkSigner {
    signing_key: SigningKey,
    public_key: OnceLock<Felt>,
}

impl fmt::Debug for StarkSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StarkSigner")
            .field("private_key", &"[REDACTED]")
            .field("public_key", &self.public_key.get())
            .finish()
    }
}

impl StarkSigner {
    /// Create a signer from a private scalar in `[1, n)`
    pub fn from_secret_scalar(secret_scalar: Felt) -> Result<Self, SignerError> {
        if secret_scalar == Felt::ZERO {
            return Err(SignerError::InvalidKey("private key is zero".to_string()));
        }
        if secret_scalar >= EC_ORDER {
            return Err(SignerError::InvalidKey(
                "private key is not below the curve order".to_string(),
            ));
        }

        Ok(Self {
            signing_key: SigningKey::from_secret_scalar(secret_scalar),
            public_key: OnceLock::new(),
        })
    }

    /// Create a signer from zeroizing key material
    pub fn from_key_material(key_material: &KeyMaterial) -> Result<Self, SignerError> {
        Self::from_secret_scalar(key_material.as_felt())
    }

    /// Create a signer from an initialized keystore
    pub async fn from_keystore(keystore: &Keystore) -> Result<Self, SignerError> {
        let key_material = keystore.key_material().await?;
        let signer = Self::from_key_material(&key_material)?;
        info!(
            "Stark signer initialized from {} keystore with public key: {:#x}",
            keystore.backend_type(),
            signer.public_key_felt()
        );
        Ok(signer)
    }

    /// Public key, derived on first use and cached for the signer's lifetime
    pub fn public_key_felt(&self) -> Felt {
        *self
            .public_key
            .get_or_init(|| self.signing_key.verifying_key().scalar())
    }

    /// Synchronous signing; this backend never suspends
    pub fn sign_hash_now(&self, hash: Felt) -> Result<SignatureComponents, SignerError> {
        if hash >= ELEMENT_UPPER_BOUND {
            return Err(SignerError::InvalidInput(format!(
                "hash {:#x} is not below 2^251",
                hash
            )));
        }

        debug!("Signing transaction hash: {:#x}", hash);

        let signature = self
            .signing_key
            .sign(&hash)
            .map_err(|e| SignerError::Crypto(format!("Signing failed: {e}")))?;

        Ok(SignatureComponents::Stark {
            r: signature.r,
            s: signature.s,
        })
    }
}

#[async_trait]
impl TransactionSigner for StarkSigner {
    async fn public_key(&self) -> Result<PublicKeyMaterial, SignerError> {
        Ok(PublicKeyMaterial::Stark(self.public_key_felt()))
    }

    async fn sign_hash(&self, hash: Felt) -> Result<SignatureComponents, SignerError> {
        self.sign_hash_now(hash)
    }

    fn scheme(&self) -> SignerScheme {
        SignerScheme::Stark
    }
}

/// Native Stark-curve ECDSA verification; malformed components verify as false
pub fn verify_stark_signature(public_key: Felt, hash: Felt, r: Felt, s: Felt) -> bool {
    starknet_crypto::verify(&public_key, &hash, &r, &s).unwrap_or(false)
}
