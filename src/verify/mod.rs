//! Source verification against an Etherscan-compatible explorer.
//!
//! # Data Flow
//! ```text
//! ContractArtifact + BuildInfo (standard JSON input, solc long version)
//!     → types.rs (VerificationRequest)
//!     → etherscan.rs (verifysourcecode → GUID → checkverifystatus)
//!     → VerificationStatus
//! ```
//!
//! Verification runs after a deployment has been reported; its outcome never
//! changes the deployment's exit code.

pub mod etherscan;
pub mod types;

pub use etherscan::VerificationClient;
pub use types::{VerificationRequest, VerificationStatus, VerifyError, VerifyResult};
