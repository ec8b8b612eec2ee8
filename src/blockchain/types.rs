//! Chain-specific types and error definitions.

use alloy::primitives::{Address, TxHash};
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The network rejected the transaction at broadcast time.
    #[error("Transaction rejected: {0}")]
    Submission(String),

    /// The transaction was mined but the deployment cannot be confirmed.
    #[error("Confirmation failed: {0}")]
    Confirmation(String),

    /// Transaction was not confirmed within expected time.
    #[error("Transaction {tx_hash} not confirmed after {secs} seconds")]
    ConfirmationTimeout { tx_hash: TxHash, secs: u64 },

    /// Transaction was reverted on-chain.
    #[error("Transaction {0} reverted")]
    Reverted(TxHash),

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Transaction confirmation status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// Transaction is pending in mempool.
    Pending,
    /// Transaction has been mined but not enough confirmations.
    Confirming { current: u32, required: u32 },
    /// Transaction is confirmed with required block depth.
    Confirmed { block_number: u64 },
    /// Transaction reverted.
    Failed,
}

impl ConfirmationStatus {
    /// Classify a mined receipt.
    ///
    /// The inclusion block counts as the first confirmation, so a single
    /// required confirmation is met as soon as the receipt exists.
    pub fn from_receipt(succeeded: bool, tx_block: u64, current_block: u64, required: u32) -> Self {
        if !succeeded {
            return Self::Failed;
        }

        let depth = current_block.saturating_sub(tx_block).saturating_add(1);
        let current = u32::try_from(depth).unwrap_or(u32::MAX);
        if current >= required {
            Self::Confirmed { block_number: tx_block }
        } else {
            Self::Confirming { current, required }
        }
    }
}

/// Result of a confirmed contract-creation transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentReceipt {
    pub contract_address: Address,
    pub tx_hash: TxHash,
    pub block_number: u64,
    pub gas_used: u64,
}
