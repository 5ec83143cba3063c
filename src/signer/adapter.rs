use async_trait::async_trait;
use starknet_crypto::Felt;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{PublicKeyMaterial, SignatureComponents, SignerScheme, TransactionSigner};
use crate::audit::{AuditLogger, SigningAuditEntry};
use crate::cancel::CancelToken;
use crate::errors::SignerError;
use crate::transaction::{SignableTransaction, SignedTransaction};

/// Forwarding wrapper that adds logging, an optional audit trail and
/// one-at-a-time signing. Signature bytes pass through untouched.
pub struct SignerAdapter {
    inner: Arc<dyn TransactionSigner>,
    label: String,
    audit_logger: Option<Arc<AuditLogger>>,
    signing: Mutex<()>,
}

impl std::fmt::Debug for SignerAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignerAdapter")
            .field("label", &self.label)
            .field("scheme", &self.inner.scheme())
            .field("audit", &self.audit_logger.is_some())
            .finish()
    }
}

impl SignerAdapter {
    pub fn new(inner: Arc<dyn TransactionSigner>, label: impl Into<String>) -> Self {
        Self {
            inner,
            label: label.into(),
            audit_logger: None,
            signing: Mutex::new(()),
        }
    }

    pub fn with_audit_logger(mut self, audit_logger: Arc<AuditLogger>) -> Self {
        self.audit_logger = Some(audit_logger);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn inner(&self) -> &Arc<dyn TransactionSigner> {
        &self.inner
    }

    /// Sign a hashed transaction, recording it with its transaction context
    pub async fn sign_transaction(
        &self,
        transaction: &SignableTransaction,
    ) -> Result<SignedTransaction, SignerError> {
        self.sign_transaction_with_cancel(transaction, &CancelToken::new())
            .await
    }

    /// Like [`Self::sign_transaction`]; a cancelled attempt is audited as a failure
    pub async fn sign_transaction_with_cancel(
        &self,
        transaction: &SignableTransaction,
        cancel: &CancelToken,
    ) -> Result<SignedTransaction, SignerError> {
        let _guard = self.signing.lock().await;
        let start_time = Instant::now();
        let mut entry =
            SigningAuditEntry::for_transaction(&self.label, self.inner.scheme(), transaction);

        let result =
            super::sign_transaction_with_cancel(self.inner.as_ref(), transaction, cancel).await;
        match &result {
            Ok(signed) => entry.set_signature(signed.signature()),
            Err(e) => entry.set_error(e),
        }
        self.finish(entry, start_time).await;

        result
    }

    async fn finish(&self, mut entry: SigningAuditEntry, start_time: Instant) {
        entry.update_duration(start_time);

        if entry.success() {
            info!("✅ {} signer produced a signature", self.label);
        } else {
            warn!("❌ {} signer failed to sign", self.label);
        }

        if let Some(audit_logger) = &self.audit_logger {
            if let Err(e) = audit_logger.log(&entry).await {
                warn!("Failed to write audit log: {}", e);
            }
        }
    }
}

#[async_trait]
impl TransactionSigner for SignerAdapter {
    async fn public_key(&self) -> Result<PublicKeyMaterial, SignerError> {
        self.inner.public_key().await
    }

    async fn sign_hash(&self, hash: Felt) -> Result<SignatureComponents, SignerError> {
        self.sign_hash_with_cancel(hash, &CancelToken::new()).await
    }

    async fn sign_hash_with_cancel(
        &self,
        hash: Felt,
        cancel: &CancelToken,
    ) -> Result<SignatureComponents, SignerError> {
        let _guard = self.signing.lock().await;
        let start_time = Instant::now();
        let mut entry = SigningAuditEntry::for_hash(&self.label, self.inner.scheme(), hash);

        debug!("{} signer signing hash {:#x}", self.label, hash);

        let result = self.inner.sign_hash_with_cancel(hash, cancel).await;
        match &result {
            Ok(signature) => entry.set_signature(signature),
            Err(e) => entry.set_error(e),
        }
        self.finish(entry, start_time).await;

        result
    }

    fn scheme(&self) -> SignerScheme {
        self.inner.scheme()
    }
}
