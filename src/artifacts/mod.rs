//! Compiled contract artifacts.
//!
//! # Data Flow
//! ```text
//! artifacts/ directory (Hardhat or Foundry output)
//!     → store.rs (locate <Name>.json, parse, decode bytecode)
//!     → ContractArtifact (creation bytecode + ABI)
//!     → deployer
//!
//! <Name>.dbg.json → build-info/<hash>.json
//!     → BuildInfo (compiler version, standard JSON input)
//!     → verifier
//! ```

pub mod store;
pub mod types;

pub use store::ArtifactStore;
pub use types::{ArtifactError, ArtifactResult, BuildInfo, ContractArtifact};
