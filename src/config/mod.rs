pub mod keystore;
pub mod loader;
pub mod signer;
pub mod types;
pub mod validation;

#[cfg(test)]
mod tests;

// Re-export main types for easier access
pub use types::*;
