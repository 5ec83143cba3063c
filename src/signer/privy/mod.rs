//! Custodial signer backed by Privy server wallets.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use starknet_crypto::Felt;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::stark::verify_stark_signature;
use super::{PublicKeyMaterial, SignatureComponents, SignerScheme, TransactionSigner};
use crate::cancel::CancelToken;
use crate::constants::curve::ELEMENT_UPPER_BOUND;
use crate::constants::privy::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use crate::errors::SignerError;
use crate::types::{felt_to_hex, parse_felt};
use crate::utils::SecureString;


const SESSION_HEADER: &str = "privy-session";

/// Connection settings for the custodial API
#[derive(Debug, Clone, Deserialize)]
pub struct PrivyConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    pub api_key: SecureString,
    pub wallet_id: String,
    #[serde(default)]
    pub session_token: Option<SecureString>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl PrivyConfig {
    pub fn new(api_key: impl Into<SecureString>, wallet_id: impl Into<String>) -> Self {
        Self {
            api_url: default_api_url(),
            api_key: api_key.into(),
            wallet_id: wallet_id.into(),
            session_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_session_token(mut self, session_token: impl Into<SecureString>) -> Self {
        self.session_token = Some(session_token.into());
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), SignerError> {
        if self.api_key.is_empty() {
            return Err(SignerError::Config("Privy API key cannot be empty".to_string()));
        }
        if self.wallet_id.trim().is_empty() {
            return Err(SignerError::Config("Privy wallet id cannot be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(SignerError::Config(
                "Privy timeout must be at least one second".to_string(),
            ));
        }
        if !self.api_url.starts_with("https://") {
            warn!(
                "⚠️  Privy API URL {} is not HTTPS; credentials travel in clear text",
                self.api_url
            );
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct WalletResponse {
    id: String,
    public_key: String,
}

#[derive(Debug, Serialize)]
struct RawSignRequest<'a> {
    wallet_id: &'a str,
    hash: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignatureField {
    Hex(String),
    Components(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct RawSignResponse {
    #[serde(default)]
    signature: Option<SignatureField>,
    #[serde(default)]
    scheme: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Signer whose key is held by the custodial service
pub struct PrivySigner {
    client: Client,
    config: PrivyConfig,
    public_key: RwLock<Option<Felt>>,
}

impl std::fmt::Debug for PrivySigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivySigner")
            .field("api_url", &self.config.api_url)
            .field("wallet_id", &self.config.wallet_id)
            .finish()
    }
}

impl PrivySigner {
    pub fn new(config: PrivyConfig) -> Result<Self, SignerError> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| SignerError::Config(format!("Failed to build HTTP client: {e}")))?;

        info!(
            "Privy signer configured for wallet {} at {}",
            config.wallet_id, config.api_url
        );

        Ok(Self {
            client,
            config,
            public_key: RwLock::new(None),
        })
    }

    pub fn wallet_id(&self) -> &str {
        &self.config.wallet_id
    }

    /// Public key of the remote wallet, fetched on first use and cached
    pub async fn public_key_felt(&self) -> Result<Felt, SignerError> {
        if let Some(public_key) = *self.public_key.read().await {
            return Ok(public_key);
        }

        let mut cached = self.public_key.write().await;
        // Another caller may have filled the cache while we waited for the lock
        if let Some(public_key) = *cached {
            return Ok(public_key);
        }

        let public_key = self.fetch_public_key().await?;
        *cached = Some(public_key);
        Ok(public_key)
    }

    /// Drop the cached key, e.g. after the remote wallet rotated it
    pub async fn invalidate_public_key(&self) {
        self.public_key.write().await.take();
        debug!("Invalidated cached public key for wallet {}", self.config.wallet_id);
    }

    /// Sign, resolving to `Cancelled` if `cancel` fires before the service answers
    pub async fn sign_with_cancel(
        &self,
        hash: Felt,
        cancel: &CancelToken,
    ) -> Result<SignatureComponents, SignerError> {
        if cancel.is_cancelled() {
            return Err(SignerError::Cancelled);
        }
        tokio::select! {
            result = self.request_signature(hash) => result,
            _ = cancel.cancelled() => {
                warn!("Privy signing request cancelled for hash: {:#x}", hash);
                Err(SignerError::Cancelled)
            }
        }
    }

    fn wallet_url(&self) -> String {
        format!(
            "{}/v1/wallets/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.wallet_id
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.bearer_auth(self.config.api_key.expose());
        match &self.config.session_token {
            Some(token) => request.header(SESSION_HEADER, token.expose()),
            None => request,
        }
    }

    /// One attempt, bounded by the configured timeout
    async fn send(&self, request: RequestBuilder) -> Result<(StatusCode, String), SignerError> {
        let exchange = async {
            let response: Response = self.authorized(request).send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        match tokio::time::timeout(self.config.timeout(), exchange).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) if e.is_timeout() => Err(SignerError::Unavailable(format!(
                "Privy request timed out after {}s",
                self.config.timeout_secs
            ))),
            Ok(Err(e)) => Err(SignerError::from(e)),
            Err(_) => Err(SignerError::Unavailable(format!(
                "Privy request timed out after {}s",
                self.config.timeout_secs
            ))),
        }
    }

    async fn fetch_public_key(&self) -> Result<Felt, SignerError> {
        debug!("Fetching public key for wallet {}", self.config.wallet_id);

        let (status, body) = self.send(self.client.get(self.wallet_url())).await?;
        check_status(status, &body)?;

        let wallet: WalletResponse = serde_json::from_str(&body)
            .map_err(|e| SignerError::SigningFailed(format!("Invalid wallet response: {e}")))?;
        if wallet.id != self.config.wallet_id {
            return Err(SignerError::SigningFailed(format!(
                "Service returned wallet {} instead of {}",
                wallet.id, self.config.wallet_id
            )));
        }

        let public_key = parse_felt(&wallet.public_key).map_err(|_| {
            SignerError::SigningFailed(format!(
                "Invalid public key in wallet response: {}",
                wallet.public_key
            ))
        })?;

        info!(
            "Fetched public key for wallet {}: {:#x}",
            self.config.wallet_id, public_key
        );
        Ok(public_key)
    }

    async fn request_signature(&self, hash: Felt) -> Result<SignatureComponents, SignerError> {
        if hash >= ELEMENT_UPPER_BOUND {
            return Err(SignerError::InvalidInput(format!(
                "hash {:#x} is not below 2^251",
                hash
            )));
        }

        debug!(
            "Requesting custodial signature for hash {:#x} from wallet {}",
            hash, self.config.wallet_id
        );

        let body = RawSignRequest {
            wallet_id: &self.config.wallet_id,
            hash: felt_to_hex(&hash),
        };
        let request = self
            .client
            .post(format!("{}/raw_sign", self.wallet_url()))
            .json(&body);

        let (status, body) = self.send(request).await?;
        check_status(status, &body)?;

        let response: RawSignResponse = serde_json::from_str(&body)
            .map_err(|e| SignerError::SigningFailed(format!("Invalid signing response: {e}")))?;
        let (r, s) = decode_signature(response)?;

        if let Some(public_key) = *self.public_key.read().await {
            if !verify_stark_signature(public_key, hash, r, s) {
                return Err(SignerError::SigningFailed(
                    "Service signature does not verify against the wallet public key".to_string(),
                ));
            }
        }

        info!("✅ Privy wallet {} signed hash {:#x}", self.config.wallet_id, hash);
        Ok(SignatureComponents::Stark { r, s })
    }
}

fn check_status(status: StatusCode, body: &str) -> Result<(), SignerError> {
    if status.is_success() {
        return Ok(());
    }

    let message = format!("HTTP {}: {}", status.as_u16(), error_message(body));
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SignerError::Unauthorized(message)),
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => Err(SignerError::Unavailable(message)),
        _ => Err(SignerError::SigningFailed(message)),
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .or_else(|| value.get("message"))
                .and_then(|message| message.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.chars().take(200).collect())
}

fn decode_signature(response: RawSignResponse) -> Result<(Felt, Felt), SignerError> {
    if let Some(error) = response.error {
        return Err(SignerError::SigningFailed(error));
    }
    if let Some(scheme) = response.scheme.as_deref() {
        if !scheme.eq_ignore_ascii_case("stark") && !scheme.eq_ignore_ascii_case("starknet") {
            return Err(SignerError::SigningFailed(format!(
                "Unexpected signature scheme: {scheme}"
            )));
        }
    }

    match response.signature {
        Some(SignatureField::Hex(hex_signature)) => {
            let digits = hex_signature.trim_start_matches("0x");
            let bytes = hex::decode(digits)
                .map_err(|e| SignerError::SigningFailed(format!("Invalid signature hex: {e}")))?;
            if bytes.len() != 64 {
                return Err(SignerError::SigningFailed(format!(
                    "Signature must be 64 bytes, got {}",
                    bytes.len()
                )));
            }
            Ok((
                felt_from_word(&bytes[..32], "r")?,
                felt_from_word(&bytes[32..], "s")?,
            ))
        }
        Some(SignatureField::Components(components)) => match components.as_slice() {
            [r, s] => {
                let r = parse_felt(r)
                    .map_err(|e| SignerError::SigningFailed(format!("Invalid r: {e}")))?;
                let s = parse_felt(s)
                    .map_err(|e| SignerError::SigningFailed(format!("Invalid s: {e}")))?;
                Ok((r, s))
            }
            _ => Err(SignerError::SigningFailed(format!(
                "Expected [r, s], got {} components",
                components.len()
            ))),
        },
        None => Err(SignerError::SigningFailed(
            "Signing response carried no signature".to_string(),
        )),
    }
}

/// Big-endian 32-byte word that must encode a field element without reduction
fn felt_from_word(word: &[u8], name: &str) -> Result<Felt, SignerError> {
    let felt = Felt::from_bytes_be_slice(word);
    if felt.to_bytes_be().as_slice() != word {
        return Err(SignerError::SigningFailed(format!(
            "Signature {name} is not a field element"
        )));
    }
    Ok(felt)
}

#[async_trait]
impl TransactionSigner for PrivySigner {
    async fn public_key(&self) -> Result<PublicKeyMaterial, SignerError> {
        self.public_key_felt().await.map(PublicKeyMaterial::Stark)
    }

    async fn sign_hash(&self, hash: Felt) -> Result<SignatureComponents, SignerError> {
        self.request_signature(hash).await
    }

    async fn sign_hash_with_cancel(
        &self,
        hash: Felt,
        cancel: &CancelToken,
    ) -> Result<SignatureComponents, SignerError> {
        self.sign_with_cancel(hash, cancel).await
    }

    fn scheme(&self) -> SignerScheme {
        SignerScheme::Stark
    }
}
