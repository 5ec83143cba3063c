use std::fmt;
use tracing::info;

use crate::errors::SignerError;
use crate::keystore::backends::{
    BackendConfig, EnvironmentBackend, KeystoreBackend, SoftwareBackend,
};
use crate::keystore::key_material::KeyMaterial;

/// Key storage in front of a pluggable backend
pub struct Keystore {
    backend: Box<dyn KeystoreBackend>,
}

impl fmt::Debug for Keystore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keystore")
            .field("backend", &self.backend.backend_type())
            .finish()
    }
}

impl Keystore {
    pub fn new(config: BackendConfig) -> Self {
        let backend: Box<dyn KeystoreBackend> = match config {
            BackendConfig::Software { keystore_path } => {
                Box::new(SoftwareBackend::new(keystore_path))
            }
            BackendConfig::Environment { var_name } => Box::new(EnvironmentBackend::new(var_name)),
        };

        info!("Created keystore with backend: {}", backend.backend_type());
        Self { backend }
    }

    /// Validate the backend and load the key
    pub async fn init(&mut self, passphrase: Option<&str>) -> Result<(), SignerError> {
        info!(
            "Initializing keystore backend: {}",
            self.backend.backend_type()
        );

        self.backend.validate_config()?;
        self.backend.init(passphrase).await?;

        info!("✅ Keystore initialized successfully");
        Ok(())
    }

    /// Loaded key material; fails before `init`
    pub async fn key_material(&self) -> Result<KeyMaterial, SignerError> {
        self.backend.load_key().await
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    pub fn backend_type(&self) -> &'static str {
        self.backend.backend_type()
    }

    /// Create a new encrypted key file for the software backend
    pub fn create_keystore(
        keystore_path: &str,
        private_key_hex: &str,
        passphrase: &str,
    ) -> Result<(), SignerError> {
        SoftwareBackend::create_keystore(keystore_path, private_key_hex, passphrase)
    }
}
