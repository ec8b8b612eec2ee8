//! Artifact types and error definitions.

use alloy::primitives::Bytes;
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// A compiled contract ready for deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractArtifact {
    /// Bare contract name, e.g. "Voote".
    pub contract_name: String,
    /// Source unit, e.g. "contracts/Voote.sol". Absent in some layouts.
    pub source_name: Option<String>,
    /// ABI as emitted by the compiler.
    pub abi: Value,
    /// Creation bytecode.
    pub bytecode: Bytes,
    /// File the artifact was read from.
    pub path: PathBuf,
}

impl ContractArtifact {
    /// `source:Name` when the source unit is known, else the bare name.
    pub fn fully_qualified_name(&self) -> String {
        match &self.source_name {
            Some(source) => format!("{}:{}", source, self.contract_name),
            None => self.contract_name.clone(),
        }
    }

    /// Whether the ABI declares a constructor taking arguments.
    pub fn constructor_takes_args(&self) -> bool {
        self.abi
            .as_array()
            .into_iter()
            .flatten()
            .filter(|item| item.get("type").and_then(Value::as_str) == Some("constructor"))
            .any(|ctor| {
                ctor.get("inputs")
                    .and_then(Value::as_array)
                    .is_some_and(|inputs| !inputs.is_empty())
            })
    }
}

/// Compiler input and version for the build that produced an artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildInfo {
    /// Short version, e.g. "0.8.25".
    pub solc_version: String,
    /// Long version, e.g. "0.8.25+commit.b61c2a91".
    pub solc_long_version: String,
    /// Standard JSON input passed to the compiler.
    pub input: Value,
}

/// Errors raised while locating or reading artifacts.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// No artifact with this name exists under the artifacts root.
    #[error("Artifact for contract '{name}' not found (has it been compiled?)")]
    NotFound { name: String },

    /// The artifact exists but carries no creation bytecode.
    #[error("Contract '{name}' has no bytecode (abstract, interface, or not compiled)")]
    NotCompiled { name: String },

    /// More than one source defines a contract with this name.
    #[error("Contract name '{name}' is ambiguous, use one of: {}", .candidates.join(", "))]
    Ambiguous { name: String, candidates: Vec<String> },

    /// Filesystem error.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The artifact file is malformed.
    #[error("Invalid artifact {}: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },

    /// No build info could be located for the artifact.
    #[error("Build info for contract '{name}' not found")]
    MissingBuildInfo { name: String },
}

impl ArtifactError {
    /// True when the contract is unknown or has never been compiled.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::NotCompiled { .. })
    }
}

/// Result type for artifact operations.
pub type ArtifactResult<T> = Result<T, ArtifactError>;

/// Artifact JSON as written by Hardhat (`hh-sol-artifact-1`) or Foundry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawArtifact {
    #[serde(default)]
    pub contract_name: Option<String>,
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default)]
    pub abi: Value,
    #[serde(default)]
    pub bytecode: Option<RawBytecode>,
}

/// Hardhat stores bytecode as a hex string, Foundry as `{ "object": "0x.." }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawBytecode {
    Hex(String),
    Object { object: String },
}

impl RawBytecode {
    pub fn as_hex(&self) -> &str {
        match self {
            RawBytecode::Hex(hex) => hex,
            RawBytecode::Object { object } => object,
        }
    }
}

/// Hardhat's `<Name>.dbg.json` pointer to the build info file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DebugFile {
    pub build_info: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawBuildInfo {
    pub solc_version: String,
    pub solc_long_version: String,
    pub input: Value,
}
