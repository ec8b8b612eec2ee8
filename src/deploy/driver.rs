//! Deployment driver.
//!
//! # Stages
//! ```text
//! Resolve  → look up the compiled artifact
//! Submit   → broadcast the contract-creation transaction
//! Confirm  → wait for the receipt (the only suspension point)
//! Report   → hand the outcome to the caller for output
//! ```
//!
//! Strictly sequential. A failure in any stage ends the run; a transaction
//! that was already broadcast is never withdrawn.

use alloy::primitives::{Address, TxHash};
use std::fmt;

use crate::artifacts::{ArtifactStore, ContractArtifact};
use crate::blockchain::{ChainBackend, DeploymentReceipt};
use crate::deploy::error::DeployError;

/// Contract deployed when none is named.
pub const DEFAULT_CONTRACT: &str = "Voote";

/// Step of the deployment state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployStage {
    Resolve,
    Submit,
    Confirm,
    Report,
}

impl fmt::Display for DeployStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeployStage::Resolve => "resolve",
            DeployStage::Submit => "submit",
            DeployStage::Confirm => "confirm",
            DeployStage::Report => "report",
        };
        f.write_str(name)
    }
}

/// A successful, confirmed deployment. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentOutcome {
    /// Fully qualified contract name.
    pub contract: String,
    pub address: Address,
    pub tx_hash: TxHash,
    pub receipt: DeploymentReceipt,
}

/// Drives one deployment through a [`ChainBackend`].
#[derive(Debug)]
pub struct Deployer<B> {
    store: ArtifactStore,
    backend: B,
    compiler_version: Option<String>,
}

impl<B: ChainBackend> Deployer<B> {
    pub fn new(store: ArtifactStore, backend: B) -> Self {
        Self {
            store,
            backend,
            compiler_version: None,
        }
    }

    /// Warn when an artifact was built by a different compiler than `version`.
    pub fn with_compiler_version(mut self, version: impl Into<String>) -> Self {
        self.compiler_version = Some(version.into());
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Deploy `contract` and wait for confirmation.
    pub async fn deploy(&self, contract: &str) -> Result<DeploymentOutcome, DeployError> {
        let artifact = resolve(&self.store, contract)?;
        self.deploy_artifact(artifact).await
    }

    /// Submit an already resolved artifact and wait for confirmation.
    pub async fn deploy_artifact(
        &self,
        artifact: ContractArtifact,
    ) -> Result<DeploymentOutcome, DeployError> {
        let contract = artifact.fully_qualified_name();
        self.check_compiler(&artifact);

        if artifact.constructor_takes_args() {
            tracing::warn!(
                contract = %contract,
                "Constructor declares parameters but none are supplied"
            );
        }

        self.log_balance().await;

        enter(DeployStage::Submit, &contract);
        let tx_hash = self
            .backend
            .submit(artifact.bytecode.clone())
            .await
            .map_err(|e| failed(DeployStage::Submit, e.into()))?;

        enter(DeployStage::Confirm, &contract);
        let receipt = self
            .backend
            .confirm(tx_hash)
            .await
            .map_err(|e| failed(DeployStage::Confirm, e.into()))?;

        enter(DeployStage::Report, &contract);
        tracing::info!(
            contract = %contract,
            address = %receipt.contract_address,
            tx_hash = %receipt.tx_hash,
            block_number = receipt.block_number,
            gas_used = receipt.gas_used,
            "Contract deployed"
        );

        Ok(DeploymentOutcome {
            contract,
            address: receipt.contract_address,
            tx_hash,
            receipt,
        })
    }

    fn check_compiler(&self, artifact: &ContractArtifact) {
        let Some(expected) = &self.compiler_version else {
            return;
        };
        match self.store.build_info(artifact) {
            Ok(info) if &info.solc_version != expected => tracing::warn!(
                contract = %artifact.contract_name,
                expected = %expected,
                actual = %info.solc_version,
                "Artifact was compiled with a different solc version"
            ),
            Ok(_) => {}
            Err(e) => tracing::debug!(error = %e, "Skipping compiler version check"),
        }
    }

    /// Funding is an external precondition; it is logged, never enforced.
    async fn log_balance(&self) {
        let deployer = self.backend.deployer_address();
        match self.backend.balance().await {
            Ok(balance) if balance.is_zero() => tracing::warn!(
                deployer = %deployer,
                "Deployer has no funds; the transaction will likely be rejected"
            ),
            Ok(balance) => tracing::info!(deployer = %deployer, balance_wei = %balance, "Deployer balance"),
            Err(e) => tracing::warn!(deployer = %deployer, error = %e, "Could not read deployer balance"),
        }
    }
}

/// Resolve stage. Touches only the artifacts directory, never the network.
pub fn resolve(store: &ArtifactStore, contract: &str) -> Result<ContractArtifact, DeployError> {
    enter(DeployStage::Resolve, contract);
    store
        .resolve(contract)
        .map_err(|e| failed(DeployStage::Resolve, e.into()))
}

fn enter(stage: DeployStage, contract: &str) {
    tracing::debug!(stage = %stage, contract = contract, "Entering deployment stage");
}

fn failed(stage: DeployStage, err: DeployError) -> DeployError {
    tracing::error!(stage = %stage, error = %err, "Deployment stage failed");
    err
}
