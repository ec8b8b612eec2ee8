//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env file (optional)
//!     → process environment
//!
//! deployer.toml (optional, non-secret settings)
//!     → loader.rs (parse & deserialize into FileConfig)
//!     → validation.rs (semantic checks)
//!     → loader.rs (bind RPC_URL / PRIVATE_KEY / POLYGON_SCAN_API_KEY)
//!     → ToolchainConfig (validated, immutable)
//!     → passed by reference into the deployer
//! ```
//!
//! # Design Decisions
//! - Config is immutable once resolved
//! - Missing environment variables fail at construction time, all at once
//! - Secrets only ever come from the environment, never from the file

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigError, EnvSource, ProcessEnv};
pub use schema::{FileConfig, NetworkProfile, SecretString, ToolchainConfig, VerificationConfig};
