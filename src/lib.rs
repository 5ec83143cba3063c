pub mod audit;
pub mod cancel;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod keystore;
pub mod signer;
pub mod transaction;
pub mod types;
pub mod utils;

pub use cancel::CancelToken;
pub use config::Config;
pub use errors::SignerError;
pub use keystore::Keystore;
pub use signer::{
    PrivySigner, PublicKeyMaterial, SignatureComponents, SignerAdapter, SignerScheme, StarkSigner,
    TransactionSigner, WebAuthnSigner,
};
pub use transaction::{
    ResourceBound, ResourceBounds, SignableTransaction, SignedTransaction, TransactionDetails,
};
pub use types::{Address, ChainId};

// Re-export CLI types for main.rs
pub use cli::*;

// Integration tests
#[cfg(test)]
pub mod integration_test;
