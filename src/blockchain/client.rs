//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint of a network profile with the deployer
//!   wallet attached
//! - Query chain state (chain ID, block number, balances, receipts)
//! - Broadcast contract-creation transactions and poll for confirmation
//! - Bound every RPC call by the profile's timeout

use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionReceipt;
use std::fmt::Display;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, timeout, MissedTickBehavior};

use crate::blockchain::transaction::{build_deploy_request, ChainBackend};
use crate::blockchain::types::{
    BlockchainError, BlockchainResult, ChainId, ConfirmationStatus, DeploymentReceipt,
};
use crate::blockchain::wallet::Wallet;
use crate::config::NetworkProfile;

/// JSON-RPC client bound to one network and one signing wallet.
#[derive(Clone)]
pub struct BlockchainClient {
    /// Provider with the wallet and gas/nonce/chain-id fillers attached.
    provider: Arc<dyn Provider + Send + Sync>,
    /// Network this client talks to.
    profile: NetworkProfile,
    /// Deployer address.
    address: Address,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// No request is made here; use [`verify_chain_id`](Self::verify_chain_id)
    /// to check connectivity.
    pub fn new(profile: &NetworkProfile, wallet: &Wallet) -> Self {
        let provider = ProviderBuilder::new()
            .wallet(wallet.to_ethereum_wallet())
            .connect_http(profile.url.clone());

        tracing::info!(
            network = %profile.name,
            rpc_host = profile.url.host_str().unwrap_or("unknown"),
            deployer = %wallet.address(),
            "Blockchain client initialized"
        );

        Self {
            provider: Arc::new(provider),
            profile: profile.clone(),
            address: wallet.address(),
            timeout_duration: Duration::from_secs(profile.rpc_timeout_secs),
        }
    }

    /// Run one RPC call under the request timeout.
    async fn call<T, E, F>(&self, method: &str, fut: F) -> BlockchainResult<T>
    where
        F: IntoFuture<Output = Result<T, E>>,
        E: Display,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(BlockchainError::Rpc(format!("{} failed: {}", method, e))),
            Err(_) => Err(BlockchainError::Timeout(self.profile.rpc_timeout_secs)),
        }
    }

    /// Verify the connected chain ID matches configuration.
    ///
    /// Returns the chain ID reported by the node. A profile without a pinned
    /// chain ID accepts any.
    pub async fn verify_chain_id(&self) -> BlockchainResult<ChainId> {
        let chain_id = self.get_chain_id().await?;
        if let Some(expected) = self.profile.chain_id {
            if chain_id.0 != expected {
                return Err(BlockchainError::ChainMismatch {
                    expected,
                    actual: chain_id.0,
                });
            }
        }
        Ok(chain_id)
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        self.call("eth_chainId", self.provider.get_chain_id())
            .await
            .map(ChainId)
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        self.call("eth_blockNumber", self.provider.get_block_number())
            .await
    }

    /// Get the balance of an address.
    pub async fn get_balance(&self, address: Address) -> BlockchainResult<U256> {
        self.call("eth_getBalance", self.provider.get_balance(address))
            .await
    }

    /// Get a transaction receipt by hash.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<TransactionReceipt>> {
        self.call(
            "eth_getTransactionReceipt",
            self.provider.get_transaction_receipt(tx_hash),
        )
        .await
    }

    /// Network profile this client was built from.
    pub fn profile(&self) -> &NetworkProfile {
        &self.profile
    }

    /// Poll until `tx_hash` reaches the required depth.
    ///
    /// Transient RPC errors while polling are logged and retried on the next
    /// tick; only the overall deadline ends the wait.
    pub async fn wait_for_confirmation(&self, tx_hash: TxHash) -> BlockchainResult<DeploymentReceipt> {
        let required = self.profile.confirmations;
        let deadline = Duration::from_secs(self.profile.confirmation_timeout_secs);
        let poll_interval = Duration::from_millis(self.profile.poll_interval_ms);

        let result = timeout(deadline, async {
            let mut ticker = interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let receipt = match self.get_transaction_receipt(tx_hash).await {
                    Ok(Some(receipt)) => receipt,
                    Ok(None) => {
                        tracing::debug!(
                            tx_hash = %tx_hash,
                            status = ?ConfirmationStatus::Pending,
                            "Transaction pending"
                        );
                        continue;
                    }
                    Err(e) => {
                        tracing::warn!(tx_hash = %tx_hash, error = %e, "Receipt poll failed");
                        continue;
                    }
                };

                let current_block = match self.get_block_number().await {
                    Ok(block) => block,
                    Err(e) => {
                        tracing::warn!(tx_hash = %tx_hash, error = %e, "Block number poll failed");
                        continue;
                    }
                };
                let tx_block = receipt.block_number.unwrap_or(current_block);

                match ConfirmationStatus::from_receipt(receipt.status(), tx_block, current_block, required) {
                    ConfirmationStatus::Failed => return Err(BlockchainError::Reverted(tx_hash)),
                    ConfirmationStatus::Confirmed { block_number } => {
                        let contract_address = receipt.contract_address.ok_or_else(|| {
                            BlockchainError::Confirmation(format!(
                                "receipt for {} has no contract address",
                                tx_hash
                            ))
                        })?;
                        return Ok(DeploymentReceipt {
                            contract_address,
                            tx_hash,
                            block_number,
                            gas_used: receipt.gas_used,
                        });
                    }
                    status => {
                        tracing::debug!(
                            tx_hash = %tx_hash,
                            status = ?status,
                            "Waiting for confirmations"
                        );
                    }
                }
            }
        })
        .await;

        match result {
            Ok(receipt) => receipt,
            Err(_) => Err(BlockchainError::ConfirmationTimeout {
                tx_hash,
                secs: self.profile.confirmation_timeout_secs,
            }),
        }
    }
}

impl ChainBackend for BlockchainClient {
    fn deployer_address(&self) -> Address {
        self.address
    }

    async fn balance(&self) -> BlockchainResult<U256> {
        self.get_balance(self.address).await
    }

    async fn submit(&self, init_code: Bytes) -> BlockchainResult<TxHash> {
        let tx = build_deploy_request(self.address, init_code);

        let pending = match timeout(self.timeout_duration, self.provider.send_transaction(tx)).await {
            Ok(Ok(pending)) => pending,
            Ok(Err(e)) => return Err(BlockchainError::Submission(e.to_string())),
            Err(_) => {
                return Err(BlockchainError::Submission(format!(
                    "node did not accept the transaction within {} seconds",
                    self.profile.rpc_timeout_secs
                )))
            }
        };

        let tx_hash = *pending.tx_hash();
        tracing::info!(tx_hash = %tx_hash, network = %self.profile.name, "Deployment transaction broadcast");
        Ok(tx_hash)
    }

    async fn confirm(&self, tx_hash: TxHash) -> BlockchainResult<DeploymentReceipt> {
        self.wait_for_confirmation(tx_hash).await
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("network", &self.profile.name)
            .field("chain_id", &self.profile.chain_id)
            .field("deployer", &self.address)
            .field("timeout_secs", &self.profile.rpc_timeout_secs)
            .finish()
    }
}
