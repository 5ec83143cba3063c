pub mod details;
pub mod hash;
pub mod resource_bounds;
pub mod signable;
mod wire;

#[cfg(test)]
mod tests;

// Re-export main types for easier access
pub use details::{DeclareDetails, DeployAccountDetails, InvokeDetails, TransactionDetails};
pub use hash::{compute_deploy_account_address, compute_transaction_hash, TransactionVersion};
pub use resource_bounds::{
    DataAvailabilityMode, FeeSettings, ResourceBound, ResourceBounds, ResourceKind,
};
pub use signable::{SignableTransaction, SignedTransaction};
