//! CLI command implementations.
//!
//! | Module   | Commands handled |
//! |----------|------------------|
//! | `deploy` | `Deploy`         |
//! | `report` | `Report`         |

pub mod deploy;
pub mod report;

pub use deploy::{DeployFlags, cmd_deploy};
pub use report::{ReportFlags, cmd_report};

use airlift::deploy::{DeployResult, JobState};
use airlift::errors::JobError;
use airlift::ui;

/// Print the outcome of a poll session. A failed deploy becomes a command
/// failure; a timeout becomes a retry hint plus the timeout error itself,
/// since the remote job is still running.
pub(crate) fn report_outcome(
    job_id: &str,
    outcome: Result<DeployResult, JobError>,
) -> anyhow::Result<()> {
    match outcome {
        Ok(result) => print_result(&result),
        Err(err @ JobError::PollTimeout { .. }) => {
            ui::failure(&format!(
                "Deploy {job_id} is still running. Re-run `airlift report {job_id}` to keep waiting."
            ));
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}

pub(crate) fn print_result(result: &DeployResult) -> anyhow::Result<()> {
    let status = &result.status;
    match result.state() {
        JobState::Completed => {
            ui::success(&format!(
                "Deploy {} succeeded ({}/{} components).",
                status.id, status.number_components_deployed, status.number_components_total
            ));
            Ok(())
        }
        JobState::Failed => {
            for failure in &status.component_failures {
                ui::failure(&format!(
                    "  {}:{} - {}",
                    failure.component_type, failure.full_name, failure.problem
                ));
            }
            anyhow::bail!(
                "Deploy {} failed with {} component error(s)",
                status.id,
                status.number_component_errors
            )
        }
        state => {
            ui::note(&format!(
                "Deploy {} is {} ({}/{} components).",
                status.id,
                state,
                status.number_components_deployed,
                status.number_components_total
            ));
            Ok(())
        }
    }
}
