use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("User rejected signing: {0}")]
    UserRejected(String),

    #[error("Signing cancelled")]
    Cancelled,

    #[error("Signing backend unavailable: {0}")]
    Unavailable(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Remote signing failed: {0}")]
    SigningFailed(String),

    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    #[error("Malformed key: {0}")]
    MalformedKey(String),

    #[error("Challenge mismatch: expected {expected}, authenticator signed {actual}")]
    ChallengeMismatch { expected: String, actual: String },

    #[error("Unsupported {kind} transaction version: {version}")]
    UnsupportedVersion { kind: &'static str, version: u64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SignerError {
    /// Transport-level failures that a caller may retry without asking the user again
    pub fn is_retryable(&self) -> bool {
        matches!(self, SignerError::Unavailable(_))
    }

    /// The human declined or aborted; only retry on explicit user action
    pub fn requires_user_action(&self) -> bool {
        matches!(self, SignerError::UserRejected(_) | SignerError::Cancelled)
    }
}

impl From<anyhow::Error> for SignerError {
    fn from(err: anyhow::Error) -> Self {
        SignerError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for SignerError {
    fn from(err: serde_json::Error) -> Self {
        SignerError::InvalidInput(err.to_string())
    }
}

impl From<hex::FromHexError> for SignerError {
    fn from(err: hex::FromHexError) -> Self {
        SignerError::InvalidInput(format!("Hex decode error: {}", err))
    }
}

impl From<reqwest::Error> for SignerError {
    fn from(err: reqwest::Error) -> Self {
        SignerError::Unavailable(err.to_string())
    }
}
