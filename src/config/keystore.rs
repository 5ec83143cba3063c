use super::types::Config;
use crate::errors::SignerError;
use crate::keystore::{BackendConfig, Keystore};
use crate::utils::{passphrase_or_prompt, SecureString};

impl Config {
    /// Passphrase for encrypted backends, prompting when none was configured
    pub fn keystore_passphrase(&self) -> Result<Option<SecureString>, SignerError> {
        match self.keystore.backend.as_str() {
            "software" => {
                let configured = self
                    .keystore
                    .passphrase
                    .as_ref()
                    .map(|passphrase| passphrase.expose().to_string());
                let passphrase =
                    passphrase_or_prompt(configured, "Enter keystore passphrase: ", false)
                        .map_err(|e| {
                            SignerError::Config(format!("Failed to get passphrase: {e}"))
                        })?;
                Ok(Some(passphrase))
            }
            _ => Ok(None),
        }
    }

    pub fn backend_config(&self) -> Result<BackendConfig, SignerError> {
        match self.keystore.backend.as_str() {
            "software" => {
                let path = self
                    .keystore
                    .path
                    .as_ref()
                    .ok_or_else(|| SignerError::Config("Keystore path not set".to_string()))?;
                Ok(BackendConfig::Software {
                    keystore_path: path.clone(),
                })
            }
            "environment" => {
                let env_var = self.keystore.env_var.as_ref().ok_or_else(|| {
                    SignerError::Config("Environment variable not set".to_string())
                })?;
                Ok(BackendConfig::Environment {
                    var_name: env_var.clone(),
                })
            }
            other => Err(SignerError::Config(format!(
                "Unknown keystore backend: {other}. Supported backends: software, environment"
            ))),
        }
    }

    /// Build and load the configured keystore
    pub async fn open_keystore(&self) -> Result<Keystore, SignerError> {
        let mut keystore = Keystore::new(self.backend_config()?);
        let passphrase = self.keystore_passphrase()?;
        keystore
            .init(passphrase.as_ref().map(|passphrase| passphrase.expose()))
            .await?;
        Ok(keystore)
    }
}
