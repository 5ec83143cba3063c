//! Passphrase sealing for the software keystore.
//!
//! A keystore file is one compact JWE: PBES2-HS256+A128KW key wrapping,
//! A256GCM content encryption, and the Stark public key of the sealed
//! scalar in the `kid` header so a file can be matched to an account
//! without decrypting it.

use josekit::jwe::{JweHeader, PBES2_HS256_A128KW};
use zeroize::Zeroize;

use super::key_material::KeyMaterial;
use crate::errors::SignerError;
use crate::types::{felt_to_hex, parse_felt};

const CONTENT_TYPE: &str = "starknet-stark-key";

pub fn seal_key(key_material: &KeyMaterial, passphrase: &str) -> Result<String, SignerError> {
    let public_key = key_material.stark_public_key()?;

    let mut header = JweHeader::new();
    header.set_algorithm("PBES2-HS256+A128KW");
    header.set_content_encryption("A256GCM");
    header.set_content_type(CONTENT_TYPE);
    header.set_key_id(felt_to_hex(&public_key));

    let encrypter = PBES2_HS256_A128KW
        .encrypter_from_bytes(passphrase.as_bytes())
        .map_err(|e| SignerError::Crypto(format!("Failed to derive wrapping key: {e}")))?;

    josekit::jwe::serialize_compact(key_material.raw_bytes(), &header, &encrypter)
        .map_err(|e| SignerError::Crypto(format!("Sealing failed: {e}")))
}

/// Decrypt a sealed key. A wrong passphrase is a `Crypto` error; a scalar
/// that does not match the recorded public key is `InvalidKey`.
pub fn open_key(token: &str, passphrase: &str) -> Result<KeyMaterial, SignerError> {
    let decrypter = PBES2_HS256_A128KW
        .decrypter_from_bytes(passphrase.as_bytes())
        .map_err(|e| SignerError::Crypto(format!("Failed to derive wrapping key: {e}")))?;

    let (mut plaintext, header) = josekit::jwe::deserialize_compact(token.trim(), &decrypter)
        .map_err(|e| SignerError::Crypto(format!("Unsealing failed: {e}")))?;

    let key_bytes: Result<[u8; 32], _> = plaintext.as_slice().try_into();
    let length = plaintext.len();
    plaintext.zeroize();
    let key_material = KeyMaterial::from_bytes(key_bytes.map_err(|_| {
        SignerError::InvalidKey(format!("Sealed key must be 32 bytes, got {length}"))
    })?);

    if let Some(recorded) = header.key_id() {
        let recorded = parse_felt(recorded).map_err(|_| {
            SignerError::InvalidKey(format!("Keystore records a malformed public key: {recorded}"))
        })?;
        let derived = key_material.stark_public_key()?;
        if derived != recorded {
            return Err(SignerError::InvalidKey(format!(
                "Keystore was sealed for public key {} but holds the key for {}",
                felt_to_hex(&recorded),
                felt_to_hex(&derived)
            )));
        }
    }

    Ok(key_material)
}
