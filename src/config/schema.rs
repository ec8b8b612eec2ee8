//! Configuration schema definitions.
//!
//! Two layers live here:
//! - [`FileConfig`]: the non-secret settings deserialized from `deployer.toml`.
//!   Every field has a default so an absent file yields the stock Sepolia setup.
//! - [`ToolchainConfig`]: the resolved, immutable value handed to the deployer
//!   once secrets have been bound from the environment.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use url::Url;

use crate::config::loader::ConfigError;

/// Name of the network profile used when nothing else is configured.
pub const DEFAULT_NETWORK: &str = "sepolia";

/// Sepolia testnet chain ID.
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

/// Pinned Solidity compiler version.
pub const DEFAULT_SOLC_VERSION: &str = "0.8.25";

/// Environment variable carrying the JSON-RPC endpoint.
pub const RPC_URL_ENV: &str = "RPC_URL";

/// Environment variable carrying the hex-encoded deployer key.
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

/// Environment variable carrying the source-verification API key.
pub const VERIFY_API_KEY_ENV: &str = "POLYGON_SCAN_API_KEY";

/// Etherscan v2 multichain endpoint.
pub const DEFAULT_VERIFY_API_URL: &str = "https://api.etherscan.io/v2/api";

/// Root of the on-disk configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Compiler settings.
    pub solidity: SolidityConfig,

    /// Network used when the CLI does not name one.
    pub default_network: String,

    /// Network settings keyed by network name.
    pub networks: BTreeMap<String, NetworkSettings>,

    /// Source-verification service settings.
    pub etherscan: EtherscanSettings,

    /// Filesystem locations.
    pub paths: PathsConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        let mut networks = BTreeMap::new();
        networks.insert(
            DEFAULT_NETWORK.to_string(),
            NetworkSettings {
                chain_id: Some(SEPOLIA_CHAIN_ID),
                ..NetworkSettings::default()
            },
        );

        Self {
            solidity: SolidityConfig::default(),
            default_network: DEFAULT_NETWORK.to_string(),
            networks,
            etherscan: EtherscanSettings::default(),
            paths: PathsConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Solidity compiler settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SolidityConfig {
    /// Semantic version string, e.g. "0.8.25".
    pub version: String,
}

impl Default for SolidityConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_SOLC_VERSION.to_string(),
        }
    }
}

/// Per-network settings as written in the config file.
///
/// Secrets are never stored here; only the names of the environment
/// variables that carry them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    /// Expected chain ID. Checked against the RPC before submitting when set.
    pub chain_id: Option<u64>,

    /// Environment variable holding the RPC endpoint URL.
    pub url_env: String,

    /// Environment variable holding the deployer private key.
    pub key_env: String,

    /// Block depth required before a deployment counts as confirmed.
    pub confirmations: u32,

    /// Upper bound on the confirmation wait, in seconds.
    pub confirmation_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Timeout for a single RPC request, in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            chain_id: None,
            url_env: RPC_URL_ENV.to_string(),
            key_env: PRIVATE_KEY_ENV.to_string(),
            confirmations: 1,
            confirmation_timeout_secs: 300,
            poll_interval_ms: 2000,
            rpc_timeout_secs: 30,
        }
    }
}

/// Verification service settings as written in the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EtherscanSettings {
    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Base URL of the Etherscan-compatible API.
    pub api_url: String,
}

impl Default for EtherscanSettings {
    fn default() -> Self {
        Self {
            api_key_env: VERIFY_API_KEY_ENV.to_string(),
            api_url: DEFAULT_VERIFY_API_URL.to_string(),
        }
    }
}

/// Filesystem locations.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding compiled contract artifacts.
    pub artifacts: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            artifacts: PathBuf::from("artifacts"),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// A string that must never appear in logs or error messages.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the underlying value.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString(***)")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Fully resolved configuration. Immutable once built.
#[derive(Debug, Clone)]
pub struct ToolchainConfig {
    pub solidity: SolidityConfig,
    pub default_network: String,
    pub networks: BTreeMap<String, NetworkProfile>,
    pub etherscan: VerificationConfig,
    pub paths: PathsConfig,
    pub observability: ObservabilityConfig,
}

impl ToolchainConfig {
    /// Look up a network profile, falling back to the default network.
    pub fn network(&self, name: Option<&str>) -> Result<&NetworkProfile, ConfigError> {
        let name = name.unwrap_or(&self.default_network);
        self.networks
            .get(name)
            .ok_or_else(|| ConfigError::UnknownNetwork(name.to_string()))
    }
}

/// A network endpoint bound to its signing credentials.
#[derive(Debug, Clone)]
pub struct NetworkProfile {
    pub name: String,
    pub url: Url,
    /// Signing keys; the first one deploys.
    pub accounts: Vec<SecretString>,
    pub chain_id: Option<u64>,
    pub confirmations: u32,
    pub confirmation_timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub rpc_timeout_secs: u64,
}

impl NetworkProfile {
    /// Key of the account that signs deployments.
    pub fn deployer_key(&self) -> Option<&SecretString> {
        self.accounts.first()
    }
}

/// Source-verification credential and endpoint.
#[derive(Debug, Clone)]
pub struct VerificationConfig {
    pub api_key: SecretString,
    pub api_url: String,
}
