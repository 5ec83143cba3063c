use chrono::{DateTime, Utc};
use serde::Serialize;
use starknet::core::utils::parse_cairo_short_string;
use starknet_crypto::Felt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tokio::sync::Mutex;

use crate::errors::SignerError;
use crate::signer::{SignatureComponents, SignerScheme};
use crate::transaction::SignableTransaction;

/// One JSON line per signing attempt
#[derive(Debug, Clone, Serialize)]
pub struct SigningAuditEntry {
    timestamp: DateTime<Utc>,

    signer: String,
    scheme: SignerScheme,

    // Transaction context, absent for raw hash signing
    kind: Option<&'static str>,
    chain_id: Option<String>,
    sender_address: Option<String>,
    nonce: Option<String>,

    hash: String,
    signature_r: Option<String>,
    signature_s: Option<String>,

    success: bool,
    error: Option<String>,
    duration_ms: u64,
}

impl SigningAuditEntry {
    pub fn for_hash(signer: &str, scheme: SignerScheme, hash: Felt) -> Self {
        Self {
            timestamp: Utc::now(),
            signer: signer.to_string(),
            scheme,
            kind: None,
            chain_id: None,
            sender_address: None,
            nonce: None,
            hash: format!("{:#x}", hash),
            signature_r: None,
            signature_s: None,
            success: false,
            error: None,
            duration_ms: 0,
        }
    }

    pub fn for_transaction(
        signer: &str,
        scheme: SignerScheme,
        transaction: &SignableTransaction,
    ) -> Self {
        let chain_id = transaction.chain_id().as_felt();
        let chain_name = parse_cairo_short_string(&chain_id)
            .unwrap_or_else(|_| format!("{:#x}", chain_id));

        Self {
            kind: Some(transaction.details().kind()),
            chain_id: Some(chain_name),
            sender_address: Some(transaction.sender_address().to_string()),
            nonce: Some(format!("{:#x}", transaction.details().nonce())),
            ..Self::for_hash(signer, scheme, transaction.hash())
        }
    }

    pub fn set_signature(&mut self, signature: &SignatureComponents) {
        match signature {
            SignatureComponents::Stark { r, s } => {
                self.signature_r = Some(format!("{:#x}", r));
                self.signature_s = Some(format!("{:#x}", s));
            }
            SignatureComponents::WebAuthn(signature) => {
                self.signature_r = Some(format!("0x{}", hex::encode(signature.r)));
                self.signature_s = Some(format!("0x{}", hex::encode(signature.s)));
            }
        }
        self.success = true;
    }

    pub fn set_error(&mut self, error: &SignerError) {
        self.error = Some(error.to_string());
        self.success = false;
    }

    pub fn update_duration(&mut self, start_time: Instant) {
        self.duration_ms = start_time.elapsed().as_millis() as u64;
    }

    pub fn success(&self) -> bool {
        self.success
    }
}

/// Append-only JSON lines audit log
#[derive(Debug)]
pub struct AuditLogger {
    file: Mutex<File>,
}

impl AuditLogger {
    pub fn new(log_path: &str) -> Result<Self, SignerError> {
        let path = Path::new(log_path);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SignerError::Internal(format!("Failed to create audit log directory: {}", e))
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| SignerError::Internal(format!("Failed to open audit log file: {}", e)))?;

        Ok(Self {
            file: Mutex::new(file),
        })
    }

    pub async fn log(&self, entry: &SigningAuditEntry) -> Result<(), SignerError> {
        let json = serde_json::to_string(entry)
            .map_err(|e| SignerError::Internal(format!("Failed to serialize audit entry: {}", e)))?;

        let mut file = self.file.lock().await;
        writeln!(file, "{}", json)
            .map_err(|e| SignerError::Internal(format!("Failed to write audit log: {}", e)))?;
        file.flush()
            .map_err(|e| SignerError::Internal(format!("Failed to flush audit log: {}", e)))?;

        Ok(())
    }
}
