use std::sync::Arc;
use tracing::info;

use super::types::Config;
use crate::audit::AuditLogger;
use crate::errors::SignerError;
use crate::signer::{PrivySigner, SignerAdapter, StarkSigner, TransactionSigner};
use crate::types::ChainId;

impl Config {
    pub fn chain_id(&self) -> Result<ChainId, SignerError> {
        self.network
            .chain_id
            .parse()
            .map_err(|e| SignerError::Config(format!("Invalid chain id: {e}")))
    }

    /// Construct the configured signing backend
    pub async fn build_signer(&self) -> Result<Arc<dyn TransactionSigner>, SignerError> {
        match self.signer.backend.as_str() {
            "stark" => {
                let keystore = self.open_keystore().await?;
                Ok(Arc::new(StarkSigner::from_keystore(&keystore).await?))
            }
            "privy" => {
                let privy = self.privy.clone().ok_or_else(|| {
                    SignerError::Config("Privy backend selected but [privy] is missing".to_string())
                })?;
                Ok(Arc::new(PrivySigner::new(privy)?))
            }
            other => Err(SignerError::Config(format!(
                "Unknown signer backend: {other}. Supported backends: stark, privy"
            ))),
        }
    }

    /// The configured signer behind a [`SignerAdapter`], with auditing if enabled
    pub async fn build_adapter(&self) -> Result<SignerAdapter, SignerError> {
        let label = self
            .signer
            .label
            .clone()
            .unwrap_or_else(|| self.signer.backend.clone());
        let adapter = SignerAdapter::new(self.build_signer().await?, label);

        if !self.audit.enabled {
            return Ok(adapter);
        }

        info!("📝 Audit logging enabled: {}", self.audit.log_path);
        let audit_logger = AuditLogger::new(&self.audit.log_path)?;
        Ok(adapter.with_audit_logger(Arc::new(audit_logger)))
    }
}
