//! Operator-facing output.
//!
//! Exactly one line is written per run: the deployed address on the output
//! stream, or the failure on the error stream. Nothing is written until the
//! run has a final result, so an address is never printed before its
//! transaction is confirmed.

use std::io::Write;

use crate::deploy::driver::DeploymentOutcome;
use crate::deploy::error::DeployError;

/// Exit code for a confirmed deployment.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for any failed deployment.
pub const EXIT_FAILURE: i32 = 1;

pub fn success_line(outcome: &DeploymentOutcome) -> String {
    format!("✅ Contract deployed to: {}", outcome.address)
}

pub fn failure_line(err: &DeployError) -> String {
    format!("❌ Deployment failed: {}", err)
}

/// Write the result of a run and return the process exit code.
pub fn report<O, E>(result: &Result<DeploymentOutcome, DeployError>, out: &mut O, err: &mut E) -> i32
where
    O: Write,
    E: Write,
{
    match result {
        Ok(outcome) => {
            if let Err(e) = writeln!(out, "{}", success_line(outcome)) {
                tracing::error!(error = %e, "Failed to write deployment report");
            }
            EXIT_SUCCESS
        }
        Err(failure) => {
            if let Err(e) = writeln!(err, "{}", failure_line(failure)) {
                tracing::error!(error = %e, "Failed to write deployment report");
            }
            failure.exit_code()
        }
    }
}
