//! Contract deployment.
//!
//! # Data Flow
//! ```text
//! ToolchainConfig + DeployOptions
//!     → runner.rs (wallet, client, chain check)
//!     → driver.rs (resolve → submit → confirm)
//!     → report.rs (one line to stdout or stderr, exit code)
//! ```
//!
//! # Design Decisions
//! - The driver only sees the `ChainBackend` trait, never the config
//! - Errors are not retried; every failure exits with code 1

pub mod driver;
pub mod error;
pub mod report;
pub mod runner;

pub use driver::{DeployStage, Deployer, DeploymentOutcome, DEFAULT_CONTRACT};
pub use error::DeployError;
pub use report::{report, EXIT_FAILURE, EXIT_SUCCESS};
pub use runner::{connect, run_deployment, DeployOptions};
