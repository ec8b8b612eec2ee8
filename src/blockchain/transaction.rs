//! Contract-creation transactions and the chain backend seam.
//!
//! # Responsibilities
//! - Build contract-creation requests
//! - Define the [`ChainBackend`] trait the deployer drives, so the driver can
//!   run against a live node or a test double

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use std::future::Future;

use crate::blockchain::types::{BlockchainResult, DeploymentReceipt};

/// Operations the deployer needs from a network.
///
/// `submit` broadcasts and returns as soon as the node accepts the
/// transaction; `confirm` is the only call that waits on the chain.
pub trait ChainBackend: Send + Sync {
    /// Address that signs and pays for deployments.
    fn deployer_address(&self) -> Address;

    /// Native balance of the deployer.
    fn balance(&self) -> impl Future<Output = BlockchainResult<U256>> + Send;

    /// Sign and broadcast a contract-creation transaction.
    fn submit(&self, init_code: Bytes) -> impl Future<Output = BlockchainResult<TxHash>> + Send;

    /// Wait until `tx_hash` is mined deep enough and return the deployment.
    fn confirm(
        &self,
        tx_hash: TxHash,
    ) -> impl Future<Output = BlockchainResult<DeploymentReceipt>> + Send;
}

/// Build a contract-creation request from `from` carrying `init_code`.
///
/// Nonce, gas and chain ID are left for the provider's fillers.
pub fn build_deploy_request(from: Address, init_code: Bytes) -> TransactionRequest {
    TransactionRequest::default()
        .with_from(from)
        .with_deploy_code(init_code)
        .with_value(U256::ZERO)
}
