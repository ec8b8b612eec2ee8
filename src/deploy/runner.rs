//! Wiring from a resolved configuration to a live deployment.

use std::path::PathBuf;

use crate::artifacts::ArtifactStore;
use crate::blockchain::{BlockchainClient, BlockchainError, Wallet};
use crate::config::{NetworkProfile, ToolchainConfig};
use crate::deploy::driver::{resolve, Deployer, DeploymentOutcome, DEFAULT_CONTRACT};
use crate::deploy::error::DeployError;

/// What to deploy and where.
#[derive(Debug, Clone)]
pub struct DeployOptions {
    pub contract: String,
    /// Network name; the configured default when `None`.
    pub network: Option<String>,
    /// Artifacts directory override.
    pub artifacts: Option<PathBuf>,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            contract: DEFAULT_CONTRACT.to_string(),
            network: None,
            artifacts: None,
        }
    }
}

impl DeployOptions {
    pub fn artifact_store(&self, config: &ToolchainConfig) -> ArtifactStore {
        ArtifactStore::new(
            self.artifacts
                .clone()
                .unwrap_or_else(|| config.paths.artifacts.clone()),
        )
    }
}

/// Build a client for `profile` and check it is on the expected chain.
///
/// A mismatched chain ID is fatal. An unreachable node is only logged here;
/// the submission that follows reports it.
pub async fn connect(profile: &NetworkProfile) -> Result<BlockchainClient, DeployError> {
    let wallet = Wallet::from_profile(profile)?;
    let client = BlockchainClient::new(profile, &wallet);

    match client.verify_chain_id().await {
        Ok(chain_id) => {
            tracing::info!(network = %profile.name, chain_id = chain_id.0, "Connected to network");
        }
        Err(e @ BlockchainError::ChainMismatch { .. }) => return Err(e.into()),
        Err(e) => {
            tracing::warn!(
                network = %profile.name,
                error = %e,
                "Chain verification failed, continuing"
            );
        }
    }

    Ok(client)
}

/// Deploy according to `options` using `config`.
///
/// The artifact is resolved before the node is contacted.
pub async fn run_deployment(
    config: &ToolchainConfig,
    options: &DeployOptions,
) -> Result<DeploymentOutcome, DeployError> {
    let profile = config.network(options.network.as_deref())?;
    let store = options.artifact_store(config);
    let artifact = resolve(&store, &options.contract)?;

    let client = connect(profile).await?;
    Deployer::new(store, client)
        .with_compiler_version(config.solidity.version.clone())
        .deploy_artifact(artifact)
        .await
}
