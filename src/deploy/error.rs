//! Deployment error taxonomy.

use alloy::primitives::TxHash;
use thiserror::Error;

use crate::artifacts::ArtifactError;
use crate::blockchain::BlockchainError;
use crate::config::ConfigError;

/// Every way a deployment run can fail.
///
/// All variants map to the same non-zero exit code; none are retried.
#[derive(Debug, Error)]
pub enum DeployError {
    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The contract name is unknown or has not been compiled.
    #[error("{0}")]
    ArtifactNotFound(ArtifactError),

    /// The artifact exists but cannot be used.
    #[error("{0}")]
    Artifact(ArtifactError),

    /// The network rejected the deployment transaction.
    #[error("submission failed: {0}")]
    Submission(String),

    /// The transaction was mined but the deployment could not be confirmed.
    #[error("confirmation failed: {0}")]
    Confirmation(String),

    /// Confirmation was not observed in time. The transaction may still land.
    #[error("transaction {tx_hash} not confirmed within {secs} seconds")]
    ConfirmationTimeout { tx_hash: TxHash, secs: u64 },

    /// The deployment transaction reverted.
    #[error("transaction {0} reverted")]
    Reverted(TxHash),

    /// Wallet, connectivity or chain mismatch problems before submission.
    #[error("{0}")]
    Chain(BlockchainError),
}

impl DeployError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl From<ArtifactError> for DeployError {
    fn from(err: ArtifactError) -> Self {
        if err.is_not_found() {
            DeployError::ArtifactNotFound(err)
        } else {
            DeployError::Artifact(err)
        }
    }
}

impl From<BlockchainError> for DeployError {
    fn from(err: BlockchainError) -> Self {
        match err {
            BlockchainError::Submission(reason) => DeployError::Submission(reason),
            BlockchainError::Confirmation(reason) => DeployError::Confirmation(reason),
            BlockchainError::ConfirmationTimeout { tx_hash, secs } => {
                DeployError::ConfirmationTimeout { tx_hash, secs }
            }
            BlockchainError::Reverted(tx_hash) => DeployError::Reverted(tx_hash),
            other => DeployError::Chain(other),
        }
    }
}
