use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::time::Duration;

use crate::errors::SignerError;

/// Parameters of one `navigator.credentials.get()` style ceremony
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionRequest {
    pub rp_id: String,
    /// Raw challenge bytes; the authenticator base64url-encodes them into clientDataJSON
    pub challenge: [u8; 32],
    pub credential_id: Vec<u8>,
    pub user_verification: bool,
    pub timeout: Option<Duration>,
}

/// What the platform authenticator hands back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebAuthnSignatureData {
    pub authenticator_data: Vec<u8>,
    pub client_data_json: Vec<u8>,
    /// DER-encoded ECDSA signature
    pub signature: Vec<u8>,
}

impl WebAuthnSignatureData {
    pub fn client_data_hash(&self) -> [u8; 32] {
        Sha256::digest(&self.client_data_json).into()
    }

    /// `authenticatorData || SHA256(clientDataJSON)`, the bytes the authenticator signed
    pub fn signed_message(&self) -> Vec<u8> {
        let mut message = Vec::with_capacity(self.authenticator_data.len() + 32);
        message.extend_from_slice(&self.authenticator_data);
        message.extend_from_slice(&self.client_data_hash());
        message
    }
}

/// Failures reported by the platform authenticator
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthenticatorError {
    #[error("Assertion not allowed: {0}")]
    NotAllowed(String),

    #[error("Ceremony cancelled")]
    Cancelled,

    #[error("Ceremony timed out")]
    Timeout,

    #[error("Authenticator unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid authenticator response: {0}")]
    InvalidResponse(String),
}

impl From<AuthenticatorError> for SignerError {
    fn from(err: AuthenticatorError) -> Self {
        match err {
            AuthenticatorError::NotAllowed(_)
            | AuthenticatorError::Cancelled
            | AuthenticatorError::Timeout => SignerError::UserRejected(err.to_string()),
            AuthenticatorError::Unavailable(message) => SignerError::Unavailable(message),
            AuthenticatorError::InvalidResponse(message) => {
                SignerError::MalformedSignature(message)
            }
        }
    }
}

/// Platform authenticator able to run an assertion ceremony.
///
/// A ceremony may wait on the user indefinitely; the signer races it
/// against a cancel token.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn get_assertion(
        &self,
        request: &AssertionRequest,
    ) -> Result<WebAuthnSignatureData, AuthenticatorError>;
}
