//! Configuration loading from disk and the environment.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::{
    FileConfig, NetworkProfile, SecretString, ToolchainConfig, VerificationConfig,
};
use crate::config::validation::{
    check_private_key, parse_rpc_url, validate_file_config, ValidationError,
};

/// Config file picked up from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "deployer.toml";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    EnvFile(dotenv::Error),
    MissingVariables(Vec<String>),
    Validation(Vec<ValidationError>),
    UnknownNetwork(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::EnvFile(e) => write!(f, "Env file error: {}", e),
            ConfigError::MissingVariables(vars) => {
                write!(f, "Missing required environment variable(s): {}", vars.join(", "))
            }
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
            ConfigError::UnknownNetwork(name) => write!(f, "Unknown network '{}'", name),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Read-only view of environment variables.
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Load a `.env` file into the process environment.
///
/// With an explicit path the file must exist. Without one, `.env` is looked up
/// from the working directory upwards and silently skipped when absent.
/// Variables already present in the environment are never overwritten.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    match path {
        Some(path) => {
            dotenv::from_path(path).map_err(ConfigError::EnvFile)?;
            Ok(Some(path.to_path_buf()))
        }
        None => Ok(dotenv::dotenv().ok()),
    }
}

/// Parse the config file at `path`.
pub fn load_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Load the config file if one is given or `deployer.toml` exists, else defaults.
pub fn load_file_config_or_default(path: Option<&Path>) -> Result<FileConfig, ConfigError> {
    match path {
        Some(path) => load_file_config(path),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                load_file_config(default_path)
            } else {
                Ok(FileConfig::default())
            }
        }
    }
}

/// Bind secrets from `env` into a validated [`ToolchainConfig`].
///
/// Fails before any network profile is produced if a referenced variable is
/// unset or empty; every missing variable is reported, not just the first.
pub fn resolve_config(file: FileConfig, env: &impl EnvSource) -> Result<ToolchainConfig, ConfigError> {
    validate_file_config(&file).map_err(ConfigError::Validation)?;

    let mut missing = Vec::new();
    let mut lookup = |name: &str| -> Option<String> {
        match env.var(name).filter(|v| !v.trim().is_empty()) {
            Some(value) => Some(value),
            None => {
                if !missing.iter().any(|m| m == name) {
                    missing.push(name.to_string());
                }
                None
            }
        }
    };

    let mut bound = Vec::with_capacity(file.networks.len());
    for (name, settings) in &file.networks {
        let url = lookup(&settings.url_env);
        let key = lookup(&settings.key_env);
        bound.push((name, settings, url, key));
    }
    let api_key = lookup(&file.etherscan.api_key_env);

    if !missing.is_empty() {
        return Err(ConfigError::MissingVariables(missing));
    }

    let mut errors = Vec::new();
    let mut networks = BTreeMap::new();
    for (name, settings, url, key) in bound {
        let (Some(url), Some(key)) = (url, key) else {
            continue;
        };

        let url = match parse_rpc_url(&settings.url_env, &url) {
            Ok(url) => Some(url),
            Err(e) => {
                errors.push(e);
                None
            }
        };
        if let Err(e) = check_private_key(&settings.key_env, &key) {
            errors.push(e);
        }

        if let Some(url) = url {
            networks.insert(
                name.clone(),
                NetworkProfile {
                    name: name.clone(),
                    url,
                    accounts: vec![SecretString::new(key.trim())],
                    chain_id: settings.chain_id,
                    confirmations: settings.confirmations,
                    confirmation_timeout_secs: settings.confirmation_timeout_secs,
                    poll_interval_ms: settings.poll_interval_ms,
                    rpc_timeout_secs: settings.rpc_timeout_secs,
                },
            );
        }
    }

    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors));
    }

    Ok(ToolchainConfig {
        solidity: file.solidity,
        default_network: file.default_network,
        networks,
        etherscan: VerificationConfig {
            api_key: SecretString::new(api_key.unwrap_or_default()),
            api_url: file.etherscan.api_url,
        },
        paths: file.paths,
        observability: file.observability,
    })
}

/// Load, bind and validate configuration in one step.
pub fn load_config(path: Option<&Path>, env: &impl EnvSource) -> Result<ToolchainConfig, ConfigError> {
    let file = load_file_config_or_default(path)?;
    resolve_config(file, env)
}
