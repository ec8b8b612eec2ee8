//! Voote contract deployer library.

pub mod artifacts;
pub mod blockchain;
pub mod config;
pub mod deploy;
pub mod observability;
pub mod verify;

pub use config::ToolchainConfig;
pub use deploy::{Deployer, DeploymentOutcome, DeployError};
