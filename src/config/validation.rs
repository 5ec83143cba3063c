use tracing::warn;

use super::types::Config;
use crate::errors::SignerError;

impl Config {
    pub fn validate(&self) -> Result<(), SignerError> {
        self.validate_signer()?;
        self.validate_network()?;
        self.validate_audit()?;
        Ok(())
    }

    fn validate_signer(&self) -> Result<(), SignerError> {
        match self.signer.backend.as_str() {
            "stark" => self.validate_keystore(),
            "privy" => match &self.privy {
                Some(privy) => privy.validate(),
                None => Err(SignerError::Config(
                    "Privy backend requires a [privy] section or --privy-* flags".to_string(),
                )),
            },
            other => Err(SignerError::Config(format!(
                "Unknown signer backend: '{other}'"
            ))),
        }
    }

    fn validate_keystore(&self) -> Result<(), SignerError> {
        match self.keystore.backend.as_str() {
            "software" => {
                if self.keystore.path.is_none() {
                    return Err(SignerError::Config(
                        "Keystore path is required for software backend".to_string(),
                    ));
                }
                if self.keystore.passphrase.is_some() {
                    warn!("⚠️  SECURITY WARNING: Keystore passphrase supplied via config, CLI or env");
                }
            }
            "environment" => {
                if self.keystore.env_var.is_none() {
                    return Err(SignerError::Config(
                        "Environment variable name is required for environment backend".to_string(),
                    ));
                }

                warn!("⚠️  SECURITY WARNING: Environment backend configured");
                warn!("⚠️  Private keys stored in environment variables are less secure");
                warn!("⚠️  Consider using 'software' backend with encrypted keystore");
            }
            other => {
                return Err(SignerError::Config(format!(
                    "Unknown keystore backend: '{other}'"
                )));
            }
        }

        Ok(())
    }

    fn validate_network(&self) -> Result<(), SignerError> {
        self.chain_id().map(|_| ())
    }

    fn validate_audit(&self) -> Result<(), SignerError> {
        if self.audit.enabled && self.audit.log_path.trim().is_empty() {
            return Err(SignerError::Config(
                "Audit log path is required when audit logging is enabled".to_string(),
            ));
        }
        if !self.audit.enabled {
            warn!("⚠️  Audit logging disabled");
        }
        Ok(())
    }
}
