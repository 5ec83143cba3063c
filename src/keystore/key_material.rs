use starknet::signers::SigningKey;
use starknet_crypto::Felt;
use zeroize::ZeroizeOnDrop;

use crate::constants::curve::EC_ORDER;
use crate::errors::SignerError;

/// In-memory Stark private key that gets zeroized on drop
#[derive(ZeroizeOnDrop)]
pub struct KeyMaterial {
    private_key: [u8; 32],
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

impl KeyMaterial {
    /// Parse a hex private key, with or without `0x`
    pub fn from_hex(hex_key: &str) -> Result<Self, SignerError> {
        let trimmed = hex_key.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);

        if digits.is_empty() {
            return Err(SignerError::InvalidKey(
                "Private key cannot be empty".to_string(),
            ));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(SignerError::InvalidKey(
                "Private key must be a valid hex string".to_string(),
            ));
        }

        if digits.len() > 64 {
            return Err(SignerError::InvalidKey(
                "Private key must be at most 32 bytes".to_string(),
            ));
        }

        // Full-width keys decode directly so leading zero bytes survive
        if digits.len() == 64 {
            let mut key_bytes = [0u8; 32];
            hex::decode_to_slice(digits, &mut key_bytes)
                .map_err(|e| SignerError::InvalidKey(format!("Invalid private key hex: {e}")))?;
            return Ok(Self {
                private_key: key_bytes,
            });
        }

        let key_felt = Felt::from_hex(&format!("0x{digits}"))
            .map_err(|e| SignerError::InvalidKey(format!("Invalid private key hex: {e}")))?;

        Ok(Self {
            private_key: key_felt.to_bytes_be(),
        })
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { private_key: bytes }
    }

    /// The private scalar as a felt
    pub fn as_felt(&self) -> Felt {
        Felt::from_bytes_be(&self.private_key)
    }

    /// Public key of this scalar on the Stark curve; zero and out-of-range scalars fail
    pub fn stark_public_key(&self) -> Result<Felt, SignerError> {
        let scalar = self.as_felt();
        if scalar == Felt::ZERO || scalar >= EC_ORDER {
            return Err(SignerError::InvalidKey(
                "private key is not in [1, curve order)".to_string(),
            ));
        }
        Ok(SigningKey::from_secret_scalar(scalar).verifying_key().scalar())
    }

    /// Raw bytes (use with caution)
    pub fn raw_bytes(&self) -> &[u8; 32] {
        &self.private_key
    }
}

impl Clone for KeyMaterial {
    fn clone(&self) -> Self {
        Self::from_bytes(self.private_key)
    }
}
