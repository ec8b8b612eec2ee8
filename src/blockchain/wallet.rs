//! Deployer wallet.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables (via config)
//! - Keys are never logged or serialized

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;

use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::config::validation::strip_hex_prefix;
use crate::config::NetworkProfile;

/// Signing account for deployment transactions.
#[derive(Debug, Clone)]
pub struct Wallet {
    /// The underlying signer (private key).
    signer: PrivateKeySigner,
    /// Chain ID for EIP-155 replay protection, when known up front.
    chain_id: Option<u64>,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    /// * `chain_id` - Chain ID for transaction signing, if pinned
    pub fn from_private_key(private_key_hex: &str, chain_id: Option<u64>) -> BlockchainResult<Self> {
        let key_hex = strip_hex_prefix(private_key_hex.trim());

        let mut signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;
        signer.set_chain_id(chain_id);

        tracing::info!(
            address = %signer.address(),
            chain_id = ?chain_id,
            "Wallet initialized"
        );

        Ok(Self { signer, chain_id })
    }

    /// Build the deployer wallet for a network profile.
    pub fn from_profile(profile: &NetworkProfile) -> BlockchainResult<Self> {
        let key = profile.deployer_key().ok_or_else(|| {
            BlockchainError::Wallet(format!("Network '{}' has no accounts", profile.name))
        })?;
        Self::from_private_key(key.expose(), profile.chain_id)
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Get the chain ID this wallet is pinned to.
    pub fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    /// Wrap the signer for use in a provider.
    pub fn to_ethereum_wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecretString;

    // Well-known test private key (Anvil's first account)
    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

    #[test]
    fn test_wallet_from_private_key() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY, Some(1)).unwrap();
        assert_eq!(wallet.address().to_string().to_lowercase(), TEST_ADDRESS);
        assert_eq!(wallet.chain_id(), Some(1));
    }

    #[test]
    fn test_wallet_with_0x_prefix() {
        let wallet = Wallet::from_private_key(&format!("0x{}", TEST_PRIVATE_KEY), None).unwrap();
        assert_eq!(wallet.address().to_string().to_lowercase(), TEST_ADDRESS);
    }

    #[test]
    fn test_wallet_with_uppercase_prefix() {
        let wallet = Wallet::from_private_key(&format!("0X{}", TEST_PRIVATE_KEY), None).unwrap();
        assert_eq!(wallet.address().to_string().to_lowercase(), TEST_ADDRESS);
    }

    #[test]
    fn test_invalid_private_key() {
        let result = Wallet::from_private_key("invalid_key", None);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid private key"));
    }

    #[test]
    fn test_from_profile() {
        let profile = NetworkProfile {
            name: "sepolia".to_string(),
            url: "http://localhost:8545".parse().unwrap(),
            accounts: vec![SecretString::new(TEST_PRIVATE_KEY)],
            chain_id: Some(11_155_111),
            confirmations: 1,
            confirmation_timeout_secs: 60,
            poll_interval_ms: 100,
            rpc_timeout_secs: 5,
        };
        let wallet = Wallet::from_profile(&profile).unwrap();
        assert_eq!(wallet.chain_id(), Some(11_155_111));

        let empty = NetworkProfile { accounts: Vec::new(), ..profile };
        assert!(Wallet::from_profile(&empty).is_err());
    }

    #[test]
    fn test_debug_hides_key() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY, None).unwrap();
        assert!(!format!("{:?}", wallet).contains(TEST_PRIVATE_KEY));
    }
}
