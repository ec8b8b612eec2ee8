//! Configuration loading through the public API.

use std::collections::HashMap;
use std::path::PathBuf;

use voote_deployer::config::loader::load_config;
use voote_deployer::config::ConfigError;

const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

struct TempConfig {
    dir: PathBuf,
}

impl TempConfig {
    fn new(toml: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("voote-config-it-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("deployer.toml"), toml).unwrap();
        Self { dir }
    }

    fn path(&self) -> PathBuf {
        self.dir.join("deployer.toml")
    }
}

impl Drop for TempConfig {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

const TWO_NETWORKS: &str = r#"
default_network = "amoy"

[solidity]
version = "0.8.25"

[networks.sepolia]
chain_id = 11155111

[networks.amoy]
chain_id = 80002
url_env = "AMOY_RPC_URL"
key_env = "AMOY_PRIVATE_KEY"
confirmations = 2

[paths]
artifacts = "build/artifacts"
"#;

#[test]
fn test_two_networks_from_file() {
    let file = TempConfig::new(TWO_NETWORKS);
    let vars = env(&[
        ("RPC_URL", "https://rpc.sepolia.org"),
        ("PRIVATE_KEY", KEY),
        ("AMOY_RPC_URL", "https://rpc-amoy.polygon.technology"),
        ("AMOY_PRIVATE_KEY", KEY),
        ("POLYGON_SCAN_API_KEY", "K"),
    ]);

    let config = load_config(Some(&file.path()), &vars).unwrap();

    let default = config.network(None).unwrap();
    assert_eq!(default.name, "amoy");
    assert_eq!(default.chain_id, Some(80_002));
    assert_eq!(default.confirmations, 2);
    assert_eq!(default.url.host_str(), Some("rpc-amoy.polygon.technology"));

    let sepolia = config.network(Some("sepolia")).unwrap();
    assert_eq!(sepolia.chain_id, Some(11_155_111));
    assert_eq!(config.paths.artifacts, PathBuf::from("build/artifacts"));
}

#[test]
fn test_every_missing_variable_is_named() {
    let file = TempConfig::new(TWO_NETWORKS);
    let vars = env(&[("RPC_URL", "https://rpc.sepolia.org"), ("PRIVATE_KEY", KEY)]);

    let err = load_config(Some(&file.path()), &vars).unwrap_err();
    match &err {
        ConfigError::MissingVariables(names) => {
            assert!(names.contains(&"AMOY_RPC_URL".to_string()));
            assert!(names.contains(&"AMOY_PRIVATE_KEY".to_string()));
            assert!(names.contains(&"POLYGON_SCAN_API_KEY".to_string()));
            assert_eq!(names.len(), 3);
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(err.to_string().contains("AMOY_PRIVATE_KEY"));
}

#[test]
fn test_secrets_never_in_error_text() {
    let vars = env(&[
        ("RPC_URL", "ftp://rpc.sepolia.org"),
        ("PRIVATE_KEY", "0xdeadbeef"),
        ("POLYGON_SCAN_API_KEY", "K"),
    ]);

    let err = load_config(None, &vars).unwrap_err();
    let text = err.to_string();
    assert!(matches!(err, ConfigError::Validation(_)));
    assert!(text.contains("RPC_URL"));
    assert!(text.contains("PRIVATE_KEY"));
    assert!(!text.contains("deadbeef"));
}

#[test]
fn test_malformed_file_is_parse_error() {
    let file = TempConfig::new("networks = [");
    let err = load_config(Some(&file.path()), &HashMap::new()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_missing_file_is_io_error() {
    let path = std::env::temp_dir().join(format!("voote-absent-{}.toml", uuid::Uuid::new_v4()));
    let err = load_config(Some(&path), &HashMap::new()).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
