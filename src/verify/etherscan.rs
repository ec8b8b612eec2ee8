//! Etherscan-compatible verification client.
//!
//! # Responsibilities
//! - Submit standard-JSON sources with `verifysourcecode`
//! - Poll `checkverifystatus` until the explorer reaches a verdict
//! - Retry submission while the explorer has not indexed the bytecode yet

use std::time::Duration;

use crate::config::{SecretString, VerificationConfig};
use crate::verify::types::{
    ApiResponse, CheckOutcome, SubmitOutcome, VerificationRequest, VerificationStatus, VerifyError,
    VerifyResult,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for one explorer API and one chain.
#[derive(Debug, Clone)]
pub struct VerificationClient {
    http: reqwest::Client,
    api_url: String,
    api_key: SecretString,
    chain_id: u64,
    poll_interval: Duration,
    max_attempts: u32,
}

impl VerificationClient {
    pub fn new(config: &VerificationConfig, chain_id: u64) -> VerifyResult<Self> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            chain_id,
            poll_interval: Duration::from_secs(5),
            max_attempts: 10,
        })
    }

    /// Override how often and how many times the explorer is polled.
    pub fn with_polling(mut self, poll_interval: Duration, max_attempts: u32) -> Self {
        self.poll_interval = poll_interval;
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Form fields for a `verifysourcecode` submission.
    pub fn submission_form(&self, request: &VerificationRequest) -> Vec<(&'static str, String)> {
        vec![
            ("apikey", self.api_key.expose().to_string()),
            ("module", "contract".to_string()),
            ("action", "verifysourcecode".to_string()),
            ("contractaddress", request.address.to_string()),
            ("sourceCode", request.source.clone()),
            ("codeformat", "solidity-standard-json-input".to_string()),
            ("contractname", request.contract_name.clone()),
            ("compilerversion", request.compiler_version.clone()),
            // Misspelling is part of the API.
            (
                "constructorArguements",
                alloy::hex::encode(&request.constructor_args),
            ),
        ]
    }

    /// Submit sources once.
    pub async fn submit(&self, request: &VerificationRequest) -> VerifyResult<SubmitOutcome> {
        let response: ApiResponse = self
            .http
            .post(&self.api_url)
            .query(&[("chainid", self.chain_id)])
            .form(&self.submission_form(request))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let outcome = SubmitOutcome::classify(&response);
        tracing::debug!(
            contract = %request.contract_name,
            outcome = ?outcome,
            "Verification submission answered"
        );
        Ok(outcome)
    }

    /// Query the status of a submission.
    pub async fn check_status(&self, guid: &str) -> VerifyResult<CheckOutcome> {
        let chain_id = self.chain_id.to_string();
        let response: ApiResponse = self
            .http
            .get(&self.api_url)
            .query(&[
                ("chainid", chain_id.as_str()),
                ("module", "contract"),
                ("action", "checkverifystatus"),
                ("guid", guid),
                ("apikey", self.api_key.expose()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(CheckOutcome::classify(&response))
    }

    /// Submit and wait for a verdict.
    pub async fn verify(&self, request: &VerificationRequest) -> VerifyResult<VerificationStatus> {
        tracing::info!(
            contract = %request.contract_name,
            address = %request.address,
            chain_id = self.chain_id,
            "Submitting source for verification"
        );

        let mut attempts = 0;
        let guid = loop {
            attempts += 1;
            match self.submit(request).await? {
                SubmitOutcome::Submitted(guid) => break guid,
                SubmitOutcome::AlreadyVerified => return Ok(VerificationStatus::AlreadyVerified),
                SubmitOutcome::Rejected(reason) => return Err(VerifyError::Rejected(reason)),
                SubmitOutcome::NotIndexed if attempts < self.max_attempts => {
                    tracing::debug!(attempt = attempts, "Bytecode not indexed yet, retrying");
                    tokio::time::sleep(self.poll_interval).await;
                }
                SubmitOutcome::NotIndexed => return Err(VerifyError::Timeout { attempts }),
            }
        };

        for attempt in 1..=self.max_attempts {
            tokio::time::sleep(self.poll_interval).await;
            match self.check_status(&guid).await? {
                CheckOutcome::Pending => {
                    tracing::debug!(guid = %guid, attempt = attempt, "Verification pending");
                }
                CheckOutcome::Verified => {
                    tracing::info!(contract = %request.contract_name, "Source verified");
                    return Ok(VerificationStatus::Verified);
                }
                CheckOutcome::AlreadyVerified => return Ok(VerificationStatus::AlreadyVerified),
                CheckOutcome::Failed(reason) => return Err(VerifyError::Rejected(reason)),
            }
        }

        Err(VerifyError::Timeout {
            attempts: self.max_attempts,
        })
    }
}
