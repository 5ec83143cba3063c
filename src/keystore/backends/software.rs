use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::SignerError;
use crate::keystore::backends::KeystoreBackend;
use crate::keystore::encryption::{open_key, seal_key};
use crate::keystore::key_material::KeyMaterial;

/// Stark key sealed under a passphrase in a single file
#[derive(Debug)]
pub struct SoftwareBackend {
    path: PathBuf,
    key_material: Option<KeyMaterial>,
}

impl SoftwareBackend {
    pub fn new(keystore_path: impl Into<PathBuf>) -> Self {
        Self {
            path: keystore_path.into(),
            key_material: None,
        }
    }

    /// Seal `private_key_hex` into a new file readable by the owner only.
    /// Refuses to overwrite an existing keystore.
    pub fn create_keystore(
        keystore_path: &str,
        private_key_hex: &str,
        passphrase: &str,
    ) -> Result<(), SignerError> {
        if passphrase.is_empty() {
            return Err(SignerError::Config(
                "Keystore passphrase cannot be empty".to_string(),
            ));
        }

        let key_material = KeyMaterial::from_hex(private_key_hex)?;
        let public_key = key_material.stark_public_key()?;
        let sealed = seal_key(&key_material, passphrase)?;

        write_owner_only(Path::new(keystore_path), sealed.as_bytes())?;

        info!(
            "🔐 Sealed key for public key {:#x} into {}",
            public_key, keystore_path
        );
        Ok(())
    }
}

#[cfg(unix)]
fn write_owner_only(path: &Path, contents: &[u8]) -> Result<(), SignerError> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)
        .map_err(|e| SignerError::Config(format!("Cannot create keystore {}: {e}", path.display())))?;
    file.write_all(contents)
        .map_err(|e| SignerError::Config(format!("Failed to write keystore: {e}")))
}

#[cfg(not(unix))]
fn write_owner_only(path: &Path, contents: &[u8]) -> Result<(), SignerError> {
    if path.exists() {
        return Err(SignerError::Config(format!(
            "Keystore {} already exists",
            path.display()
        )));
    }
    std::fs::write(path, contents)
        .map_err(|e| SignerError::Config(format!("Failed to write keystore: {e}")))
}

#[async_trait]
impl KeystoreBackend for SoftwareBackend {
    async fn init(&mut self, passphrase: Option<&str>) -> Result<(), SignerError> {
        let passphrase = passphrase.ok_or_else(|| {
            SignerError::Config("A passphrase is required to open the keystore".to_string())
        })?;

        let sealed = match tokio::fs::read_to_string(&self.path).await {
            Ok(sealed) => sealed,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SignerError::Config(format!(
                    "Keystore {} does not exist. Use the 'init' command to create it.",
                    self.path.display()
                )))
            }
            Err(e) => {
                return Err(SignerError::Config(format!(
                    "Failed to read keystore {}: {e}",
                    self.path.display()
                )))
            }
        };

        self.key_material = Some(open_key(&sealed, passphrase)?);
        debug!("Opened keystore {}", self.path.display());
        Ok(())
    }

    async fn load_key(&self) -> Result<KeyMaterial, SignerError> {
        self.key_material
            .clone()
            .ok_or_else(|| SignerError::Config("Keystore not initialized".to_string()))
    }

    fn is_available(&self) -> bool {
        self.path.is_file()
    }

    fn backend_type(&self) -> &'static str {
        "software"
    }
}
