use async_trait::async_trait;

use crate::errors::SignerError;
use crate::keystore::key_material::KeyMaterial;

/// Source of the Stark private key used by the local signer
#[async_trait]
pub trait KeystoreBackend: Send + Sync {
    /// Load the key; `passphrase` is only consulted by encrypted backends
    async fn init(&mut self, passphrase: Option<&str>) -> Result<(), SignerError>;

    /// Copy of the loaded key material
    async fn load_key(&self) -> Result<KeyMaterial, SignerError>;

    fn is_available(&self) -> bool;

    fn backend_type(&self) -> &'static str;

    /// Validate backend-specific configuration
    fn validate_config(&self) -> Result<(), SignerError> {
        Ok(())
    }
}

/// Backend selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    /// JWE-encrypted key file
    Software { keystore_path: String },
    /// Hex key in an environment variable (development only)
    Environment { var_name: String },
}

impl BackendConfig {
    pub fn backend_type(&self) -> &'static str {
        match self {
            BackendConfig::Software { .. } => "software",
            BackendConfig::Environment { .. } => "environment",
        }
    }
}

pub mod environment;
pub mod software;

pub use environment::EnvironmentBackend;
pub use software::SoftwareBackend;
