pub mod backends;
pub mod core;
pub mod encryption;
pub mod key_material;


// Re-export commonly used types
pub use backends::{BackendConfig, EnvironmentBackend, KeystoreBackend, SoftwareBackend};
pub use core::Keystore;
pub use key_material::KeyMaterial;
