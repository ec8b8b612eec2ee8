//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation of the config file (serde handles syntactic)
//! - Validate values read from the environment (URL shape, key format)
//! - Check that the default network exists and that timeouts are non-zero
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Secret values never appear in error messages, only variable names

use thiserror::Error;
use url::Url;

use crate::config::schema::FileConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("compiler version '{0}' is not of the form MAJOR.MINOR.PATCH")]
    InvalidCompilerVersion(String),

    #[error("no networks configured")]
    NoNetworks,

    #[error("default network '{0}' is not configured")]
    UnknownDefaultNetwork(String),

    #[error("network '{network}': {field} must be greater than zero")]
    ZeroValue { network: String, field: &'static str },

    #[error("{field} must name an environment variable")]
    EmptyVariableName { field: String },

    #[error("{variable} is not a valid URL: {reason}")]
    InvalidUrl { variable: String, reason: String },

    #[error("{variable} uses unsupported scheme '{scheme}' (expected http or https)")]
    UnsupportedScheme { variable: String, scheme: String },

    #[error("{variable} is not a valid private key: {reason}")]
    InvalidPrivateKey { variable: String, reason: String },
}

/// Validate the non-secret part of the configuration.
pub fn validate_file_config(config: &FileConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !is_semver(&config.solidity.version) {
        errors.push(ValidationError::InvalidCompilerVersion(
            config.solidity.version.clone(),
        ));
    }

    if config.networks.is_empty() {
        errors.push(ValidationError::NoNetworks);
    } else if !config.networks.contains_key(&config.default_network) {
        errors.push(ValidationError::UnknownDefaultNetwork(
            config.default_network.clone(),
        ));
    }

    for (name, network) in &config.networks {
        let numeric = [
            ("confirmations", u64::from(network.confirmations)),
            ("confirmation_timeout_secs", network.confirmation_timeout_secs),
            ("poll_interval_ms", network.poll_interval_ms),
            ("rpc_timeout_secs", network.rpc_timeout_secs),
        ];
        for (field, value) in numeric {
            if value == 0 {
                errors.push(ValidationError::ZeroValue {
                    network: name.clone(),
                    field,
                });
            }
        }

        if network.url_env.trim().is_empty() {
            errors.push(ValidationError::EmptyVariableName {
                field: format!("networks.{}.url_env", name),
            });
        }
        if network.key_env.trim().is_empty() {
            errors.push(ValidationError::EmptyVariableName {
                field: format!("networks.{}.key_env", name),
            });
        }
    }

    if config.etherscan.api_key_env.trim().is_empty() {
        errors.push(ValidationError::EmptyVariableName {
            field: "etherscan.api_key_env".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Parse an RPC endpoint read from `variable`.
pub fn parse_rpc_url(variable: &str, value: &str) -> Result<Url, ValidationError> {
    let url = Url::parse(value.trim()).map_err(|e| ValidationError::InvalidUrl {
        variable: variable.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ValidationError::UnsupportedScheme {
            variable: variable.to_string(),
            scheme: other.to_string(),
        }),
    }
}

/// Check that `value` is a 32-byte hex private key (optional `0x` prefix).
pub fn check_private_key(variable: &str, value: &str) -> Result<(), ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidPrivateKey {
        variable: variable.to_string(),
        reason: reason.to_string(),
    };

    let hex = strip_hex_prefix(value.trim());

    if hex.len() != 64 {
        return Err(invalid("expected 64 hex characters"));
    }
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid("contains non-hex characters"));
    }
    if hex.chars().all(|c| c == '0') {
        return Err(invalid("key is zero"));
    }
    Ok(())
}

/// Drop a leading `0x` or `0X`.
pub fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

/// `MAJOR.MINOR.PATCH` with numeric components.
pub fn is_semver(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::NetworkSettings;

    const ANVIL_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_file_config(&FileConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = FileConfig::default();
        config.solidity.version = "0.8".to_string();
        config.default_network = "mainnet".to_string();
        config.networks.insert(
            "local".to_string(),
            NetworkSettings {
                confirmations: 0,
                poll_interval_ms: 0,
                url_env: String::new(),
                ..NetworkSettings::default()
            },
        );

        let errors = validate_file_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::InvalidCompilerVersion("0.8".into())));
        assert!(errors.contains(&ValidationError::UnknownDefaultNetwork("mainnet".into())));
        assert!(errors.contains(&ValidationError::ZeroValue {
            network: "local".into(),
            field: "confirmations",
        }));
        assert!(errors.contains(&ValidationError::ZeroValue {
            network: "local".into(),
            field: "poll_interval_ms",
        }));
        assert!(errors.contains(&ValidationError::EmptyVariableName {
            field: "networks.local.url_env".into(),
        }));
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn test_empty_networks() {
        let mut config = FileConfig::default();
        config.networks.clear();
        let errors = validate_file_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::NoNetworks]);
    }

    #[test]
    fn test_parse_rpc_url() {
        let url = parse_rpc_url("RPC_URL", "https://sepolia.infura.io/v3/abc").unwrap();
        assert_eq!(url.host_str(), Some("sepolia.infura.io"));

        let err = parse_rpc_url("RPC_URL", "not a url").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidUrl { .. }));

        let err = parse_rpc_url("RPC_URL", "wss://node.example").unwrap_err();
        assert!(err.to_string().contains("wss"));
    }

    #[test]
    fn test_private_key_format() {
        assert!(check_private_key("PRIVATE_KEY", ANVIL_KEY).is_ok());
        assert!(check_private_key("PRIVATE_KEY", &format!("0x{}", ANVIL_KEY)).is_ok());
        assert!(check_private_key("PRIVATE_KEY", &format!("0X{}", ANVIL_KEY)).is_ok());

        let err = check_private_key("PRIVATE_KEY", "abc").unwrap_err();
        assert!(err.to_string().contains("PRIVATE_KEY"));

        let bad = "zz".repeat(32);
        assert!(check_private_key("PRIVATE_KEY", &bad).is_err());
        assert!(check_private_key("PRIVATE_KEY", &"0".repeat(64)).is_err());
    }

    #[test]
    fn test_errors_never_echo_key() {
        let key = "g".repeat(64);
        let err = check_private_key("PRIVATE_KEY", &key).unwrap_err();
        assert!(!err.to_string().contains(&key));
    }

    #[test]
    fn test_semver() {
        assert!(is_semver("0.8.25"));
        assert!(!is_semver("0.8"));
        assert!(!is_semver("v0.8.25"));
        assert!(!is_semver("0.8.x"));
    }
}
