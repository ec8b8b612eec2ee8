//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! NetworkProfile (RPC URL, private key from the environment)
//!     → wallet.rs (key loading, address)
//!     → client.rs (RPC connection with timeouts)
//!     → transaction.rs (contract-creation request, ChainBackend seam)
//!     → client.rs (broadcast, confirmation polling)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use transaction::ChainBackend;
pub use types::{BlockchainError, BlockchainResult, ChainId, DeploymentReceipt};
pub use wallet::Wallet;
