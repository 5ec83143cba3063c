use serde::Deserialize;

use crate::signer::PrivyConfig;
use crate::utils::SecureString;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub signer: SignerConfig,
    #[serde(default)]
    pub keystore: KeystoreConfig,
    pub privy: Option<PrivyConfig>,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SignerConfig {
    /// "stark" (local key) or "privy" (custodial)
    pub backend: String,
    /// Name recorded in logs and audit entries
    pub label: Option<String>,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            backend: "stark".to_string(),
            label: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeystoreConfig {
    pub backend: String,         // "environment" or "software"
    pub path: Option<String>,    // For software backend
    pub env_var: Option<String>, // For environment backend
    /// Setting this in a file is NOT recommended; prefer the prompt
    pub passphrase: Option<SecureString>,
}

impl Default for KeystoreConfig {
    fn default() -> Self {
        Self {
            backend: "environment".to_string(),
            path: None,
            env_var: Some("SIGNER_PRIVATE_KEY".to_string()),
            passphrase: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Short-string name ("SN_MAIN", "SN_SEPOLIA") or 0x-prefixed felt
    pub chain_id: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            chain_id: "SN_SEPOLIA".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub enabled: bool,
    pub log_path: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: "/var/log/starknet-wallet-signer/audit.log".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
