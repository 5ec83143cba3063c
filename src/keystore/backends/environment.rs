use async_trait::async_trait;
use std::env::{self, VarError};
use tracing::warn;

use crate::errors::SignerError;
use crate::keystore::backends::KeystoreBackend;
use crate::keystore::key_material::KeyMaterial;

/// Plain hex key taken from the process environment. Development only.
#[derive(Debug)]
pub struct EnvironmentBackend {
    var_name: String,
    key_material: Option<KeyMaterial>,
}

impl EnvironmentBackend {
    pub fn new(var_name: impl Into<String>) -> Self {
        Self {
            var_name: var_name.into(),
            key_material: None,
        }
    }
}

#[async_trait]
impl KeystoreBackend for EnvironmentBackend {
    async fn init(&mut self, _passphrase: Option<&str>) -> Result<(), SignerError> {
        warn!(
            "⚠️  SECURITY WARNING: Reading an unencrypted signing key from ${}",
            self.var_name
        );

        let raw = env::var(&self.var_name).map_err(|e| match e {
            VarError::NotPresent => {
                SignerError::Config(format!("Environment variable {} not set", self.var_name))
            }
            VarError::NotUnicode(_) => SignerError::InvalidKey(format!(
                "Environment variable {} is not valid UTF-8",
                self.var_name
            )),
        })?;

        let key_material = KeyMaterial::from_hex(&raw)?;
        // Catch a zero or out-of-range scalar here rather than at first signature
        key_material.stark_public_key()?;
        self.key_material = Some(key_material);
        Ok(())
    }

    async fn load_key(&self) -> Result<KeyMaterial, SignerError> {
        self.key_material
            .clone()
            .ok_or_else(|| SignerError::Config("Keystore not initialized".to_string()))
    }

    fn is_available(&self) -> bool {
        env::var_os(&self.var_name).is_some()
    }

    fn backend_type(&self) -> &'static str {
        "environment"
    }

    fn validate_config(&self) -> Result<(), SignerError> {
        if self.var_name.trim().is_empty() {
            return Err(SignerError::Config(
                "Environment variable name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
