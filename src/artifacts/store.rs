//! Artifact lookup on disk.
//!
//! # Layout
//! ```text
//! artifacts/
//!   build-info/<hash>.json
//!   contracts/Voote.sol/Voote.json       ← artifact
//!   contracts/Voote.sol/Voote.dbg.json   ← pointer to build info
//! ```

use alloy::primitives::Bytes;
use std::fs;
use std::path::{Path, PathBuf};

use crate::artifacts::types::{
    ArtifactError, ArtifactResult, BuildInfo, ContractArtifact, DebugFile, RawArtifact,
    RawBuildInfo,
};

const BUILD_INFO_DIR: &str = "build-info";
const DEBUG_SUFFIX: &str = ".dbg.json";

/// Read-only view over a compiled artifacts directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at `root`. The directory is not touched until lookup.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a contract by bare name ("Voote") or fully qualified name
    /// ("contracts/Voote.sol:Voote").
    pub fn resolve(&self, name: &str) -> ArtifactResult<ContractArtifact> {
        let path = match name.rsplit_once(':') {
            Some((source, contract)) => self
                .qualified_path(source, contract)
                .ok_or_else(|| ArtifactError::NotFound { name: name.to_string() })?,
            None => self.find_unique(name)?,
        };

        let mut artifact = read_artifact(&path, name)?;
        if artifact.source_name.is_none() {
            artifact.source_name = name.rsplit_once(':').map(|(source, _)| source.to_string());
        }
        tracing::debug!(
            contract = %artifact.fully_qualified_name(),
            path = %path.display(),
            bytecode_len = artifact.bytecode.len(),
            "Artifact resolved"
        );
        Ok(artifact)
    }

    /// Load the build info that produced `artifact`.
    pub fn build_info(&self, artifact: &ContractArtifact) -> ArtifactResult<BuildInfo> {
        let missing = || ArtifactError::MissingBuildInfo {
            name: artifact.contract_name.clone(),
        };

        let dbg_path = artifact
            .path
            .with_file_name(format!("{}{}", artifact.contract_name, DEBUG_SUFFIX));
        if !dbg_path.is_file() {
            return Err(missing());
        }

        let dbg: DebugFile = read_json(&dbg_path)?;
        let build_info_path = dbg_path
            .parent()
            .map(|dir| dir.join(&dbg.build_info))
            .ok_or_else(missing)?;
        if !build_info_path.is_file() {
            return Err(missing());
        }

        let raw: RawBuildInfo = read_json(&build_info_path)?;
        Ok(BuildInfo {
            solc_version: raw.solc_version,
            solc_long_version: raw.solc_long_version,
            input: raw.input,
        })
    }

    /// Hardhat keeps the source directory (`contracts/Voote.sol/`), Foundry
    /// only the file name (`Voote.sol/`).
    fn qualified_path(&self, source: &str, contract: &str) -> Option<PathBuf> {
        let file_name = format!("{}.json", contract);
        let hardhat = self.root.join(source).join(&file_name);
        if hardhat.is_file() {
            return Some(hardhat);
        }

        let foundry = self.root.join(Path::new(source).file_name()?).join(&file_name);
        foundry.is_file().then_some(foundry)
    }

    fn find_unique(&self, name: &str) -> ArtifactResult<PathBuf> {
        let mut candidates = self.find_candidates(name)?;
        match candidates.len() {
            0 => Err(ArtifactError::NotFound { name: name.to_string() }),
            1 => Ok(candidates.remove(0)),
            _ => Err(ArtifactError::Ambiguous {
                name: name.to_string(),
                candidates: candidates
                    .iter()
                    .map(|path| self.qualified_name_for(path, name))
                    .collect(),
            }),
        }
    }

    /// Every `<name>.json` below the root, skipping build info and debug files.
    fn find_candidates(&self, name: &str) -> ArtifactResult<Vec<PathBuf>> {
        let file_name = format!("{}.json", name);
        let mut found = Vec::new();

        if !self.root.is_dir() {
            return Ok(found);
        }

        let mut pending = vec![self.root.clone()];
        while let Some(dir) = pending.pop() {
            let entries = fs::read_dir(&dir).map_err(|source| ArtifactError::Io {
                path: dir.clone(),
                source,
            })?;

            for entry in entries {
                let entry = entry.map_err(|source| ArtifactError::Io {
                    path: dir.clone(),
                    source,
                })?;
                let path = entry.path();
                let file_type = entry.file_type().map_err(|source| ArtifactError::Io {
                    path: path.clone(),
                    source,
                })?;

                // Symlinked directories are not followed.
                if file_type.is_dir() {
                    if dir == self.root && entry.file_name() == BUILD_INFO_DIR {
                        continue;
                    }
                    pending.push(path);
                } else if entry.file_name().to_string_lossy() == file_name {
                    found.push(path);
                }
            }
        }

        found.sort();
        Ok(found)
    }

    fn qualified_name_for(&self, path: &Path, name: &str) -> String {
        path.parent()
            .and_then(|dir| dir.strip_prefix(&self.root).ok())
            .map(|source| format!("{}:{}", source.to_string_lossy().replace('\\', "/"), name))
            .unwrap_or_else(|| name.to_string())
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> ArtifactResult<T> {
    let content = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|e| ArtifactError::Invalid {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn read_artifact(path: &Path, requested: &str) -> ArtifactResult<ContractArtifact> {
    let raw: RawArtifact = read_json(path)?;

    let contract_name = raw.contract_name.unwrap_or_else(|| {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| requested.to_string())
    });

    let hex = raw.bytecode.as_ref().map(|b| b.as_hex()).unwrap_or("");
    let hex = hex.trim().trim_start_matches("0x");
    if hex.is_empty() {
        return Err(ArtifactError::NotCompiled { name: contract_name });
    }
    if hex.contains("__") {
        return Err(ArtifactError::Invalid {
            path: path.to_path_buf(),
            reason: "bytecode has unlinked library references".to_string(),
        });
    }

    let bytecode = alloy::hex::decode(hex).map_err(|e| ArtifactError::Invalid {
        path: path.to_path_buf(),
        reason: format!("bytecode is not valid hex: {}", e),
    })?;

    Ok(ContractArtifact {
        contract_name,
        source_name: raw.source_name,
        abi: raw.abi,
        bytecode: Bytes::from(bytecode),
        path: path.to_path_buf(),
    })
}
