//! Checks an authenticator assertion against the requested hash.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use p256::ecdsa::signature::Verifier;
use p256::ecdsa::{Signature as P256Signature, VerifyingKey};
use p256::FieldBytes;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::debug;

use super::authenticator::WebAuthnSignatureData;
use super::signature::{nonce_point_y_parity, normalize_s, parse_der_signature, WebAuthnSignature};
use crate::constants::webauthn::ASSERTION_TYPE;
use crate::errors::SignerError;

/// rpIdHash (32) + flags (1) + signCount (4)
const MIN_AUTHENTICATOR_DATA_LEN: usize = 37;
const FLAG_USER_PRESENT: u8 = 0x01;

#[derive(Debug, Deserialize)]
struct ClientData {
    #[serde(rename = "type")]
    ceremony_type: String,
    challenge: String,
}

/// Verify `data` was produced for `challenge` by `public_key` and return the
/// canonical signature.
pub(crate) fn verify_assertion(
    challenge: &[u8; 32],
    rp_id: &str,
    data: &WebAuthnSignatureData,
    public_key: &VerifyingKey,
) -> Result<WebAuthnSignature, SignerError> {
    let client_data: ClientData = serde_json::from_slice(&data.client_data_json)
        .map_err(|e| SignerError::MalformedSignature(format!("invalid clientDataJSON: {e}")))?;

    if client_data.ceremony_type != ASSERTION_TYPE {
        return Err(SignerError::MalformedSignature(format!(
            "unexpected clientDataJSON type {}",
            client_data.ceremony_type
        )));
    }
    check_challenge(challenge, &client_data.challenge)?;
    check_authenticator_data(&data.authenticator_data, rp_id)?;

    let (r, s) = parse_der_signature(&data.signature)?;
    let (s, flipped) = normalize_s(s);
    if flipped {
        debug!("Canonicalized high-s WebAuthn signature");
    }

    let signature = P256Signature::from_scalars(FieldBytes::from(r), FieldBytes::from(s))
        .map_err(|_| SignerError::MalformedSignature("invalid signature scalars".to_string()))?;

    let message = data.signed_message();
    public_key.verify(&message, &signature).map_err(|_| {
        SignerError::SigningFailed("assertion signature does not match the credential key".to_string())
    })?;

    let digest: [u8; 32] = Sha256::digest(&message).into();
    let y_parity = nonce_point_y_parity(&digest, &r, &s, public_key)?;

    Ok(WebAuthnSignature {
        authenticator_data: data.authenticator_data.clone(),
        client_data_json: data.client_data_json.clone(),
        r,
        s,
        y_parity,
    })
}

fn check_challenge(expected: &[u8; 32], embedded: &str) -> Result<(), SignerError> {
    let matches = URL_SAFE_NO_PAD
        .decode(embedded)
        .map(|decoded| bool::from(decoded.as_slice().ct_eq(expected.as_slice())))
        .unwrap_or(false);

    if matches {
        Ok(())
    } else {
        Err(SignerError::ChallengeMismatch {
            expected: URL_SAFE_NO_PAD.encode(expected),
            actual: embedded.to_string(),
        })
    }
}

fn check_authenticator_data(authenticator_data: &[u8], rp_id: &str) -> Result<(), SignerError> {
    if authenticator_data.len() < MIN_AUTHENTICATOR_DATA_LEN {
        return Err(SignerError::MalformedSignature(format!(
            "authenticator data too short: {} bytes",
            authenticator_data.len()
        )));
    }

    let rp_id_hash = Sha256::digest(rp_id.as_bytes());
    if !bool::from(authenticator_data[..32].ct_eq(rp_id_hash.as_slice())) {
        return Err(SignerError::MalformedSignature(format!(
            "authenticator data is not scoped to relying party {rp_id}"
        )));
    }
    if authenticator_data[32] & FLAG_USER_PRESENT == 0 {
        return Err(SignerError::MalformedSignature(
            "user presence flag not set".to_string(),
        ));
    }

    Ok(())
}
