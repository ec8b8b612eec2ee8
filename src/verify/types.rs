//! Verification API types.

use alloy::primitives::{Address, Bytes};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::artifacts::{ArtifactError, BuildInfo, ContractArtifact};

/// Everything the verification service needs to rebuild a contract.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationRequest {
    pub address: Address,
    /// `source:Name` form.
    pub contract_name: String,
    /// Long compiler version with a `v` prefix, e.g. "v0.8.25+commit.b61c2a91".
    pub compiler_version: String,
    /// Standard JSON compiler input, serialized.
    pub source: String,
    /// ABI-encoded constructor arguments.
    pub constructor_args: Bytes,
}

impl VerificationRequest {
    pub fn new(
        address: Address,
        artifact: &ContractArtifact,
        build_info: &BuildInfo,
        constructor_args: Bytes,
    ) -> Self {
        Self {
            address,
            contract_name: artifact.fully_qualified_name(),
            compiler_version: format!("v{}", build_info.solc_long_version),
            source: build_info.input.to_string(),
            constructor_args,
        }
    }
}

/// Envelope returned by every Etherscan-compatible endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub result: Value,
}

impl ApiResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "1"
    }

    /// `result` as text; non-string results are rendered as JSON.
    pub fn result_text(&self) -> String {
        match &self.result {
            Value::String(s) => s.clone(),
            Value::Null => self.message.clone(),
            other => other.to_string(),
        }
    }
}

/// Answer to a `verifysourcecode` submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Accepted; poll with this GUID.
    Submitted(String),
    AlreadyVerified,
    /// The explorer has not indexed the bytecode yet; retry later.
    NotIndexed,
    Rejected(String),
}

impl SubmitOutcome {
    pub fn classify(response: &ApiResponse) -> Self {
        let text = response.result_text();
        let lower = text.to_lowercase();

        if lower.contains("already verified") {
            SubmitOutcome::AlreadyVerified
        } else if response.is_ok() {
            SubmitOutcome::Submitted(text)
        } else if lower.contains("unable to locate contractcode") {
            SubmitOutcome::NotIndexed
        } else {
            SubmitOutcome::Rejected(text)
        }
    }
}

/// Answer to a `checkverifystatus` poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Pending,
    Verified,
    AlreadyVerified,
    Failed(String),
}

impl CheckOutcome {
    pub fn classify(response: &ApiResponse) -> Self {
        let text = response.result_text();
        let lower = text.to_lowercase();

        if lower.contains("pending in queue") {
            CheckOutcome::Pending
        } else if lower.contains("already verified") {
            CheckOutcome::AlreadyVerified
        } else if response.is_ok() || lower.starts_with("pass") {
            CheckOutcome::Verified
        } else {
            CheckOutcome::Failed(text)
        }
    }
}

/// Final result of a verification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStatus {
    Verified,
    AlreadyVerified,
}

/// Errors that can occur during verification.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Verification rejected: {0}")]
    Rejected(String),

    #[error("Verification did not finish after {attempts} attempts")]
    Timeout { attempts: u32 },

    #[error("{0}")]
    Artifact(#[from] ArtifactError),
}

/// Result type for verification operations.
pub type VerifyResult<T> = Result<T, VerifyError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: Value) -> ApiResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_submit_classification() {
        let ok = response(json!({ "status": "1", "message": "OK", "result": "abc-guid" }));
        assert_eq!(SubmitOutcome::classify(&ok), SubmitOutcome::Submitted("abc-guid".into()));

        let done = response(json!({
            "status": "0", "message": "NOTOK", "result": "Contract source code already verified"
        }));
        assert_eq!(SubmitOutcome::classify(&done), SubmitOutcome::AlreadyVerified);

        let early = response(json!({
            "status": "0", "message": "NOTOK",
            "result": "Unable to locate ContractCode at 0x5fbdb2315678afecb367f032d93f642f64180aa3"
        }));
        assert_eq!(SubmitOutcome::classify(&early), SubmitOutcome::NotIndexed);

        let bad = response(json!({ "status": "0", "message": "NOTOK", "result": "Invalid API Key" }));
        assert_eq!(SubmitOutcome::classify(&bad), SubmitOutcome::Rejected("Invalid API Key".into()));
    }

    #[test]
    fn test_check_classification() {
        let pending = response(json!({ "status": "0", "message": "NOTOK", "result": "Pending in queue" }));
        assert_eq!(CheckOutcome::classify(&pending), CheckOutcome::Pending);

        let pass = response(json!({ "status": "1", "message": "OK", "result": "Pass - Verified" }));
        assert_eq!(CheckOutcome::classify(&pass), CheckOutcome::Verified);

        let fail = response(json!({
            "status": "0", "message": "NOTOK", "result": "Fail - Unable to verify"
        }));
        assert_eq!(
            CheckOutcome::classify(&fail),
            CheckOutcome::Failed("Fail - Unable to verify".into())
        );
    }

    #[test]
    fn test_result_text_fallbacks() {
        let null = response(json!({ "status": "0", "message": "NOTOK" }));
        assert_eq!(null.result_text(), "NOTOK");

        let object = response(json!({ "status": "1", "result": { "a": 1 } }));
        assert_eq!(object.result_text(), r#"{"a":1}"#);
    }
}
