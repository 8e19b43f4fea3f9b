//! Deadline-bounded status polling.
//!
//! One poll session drives repeated `check_status` calls at a fixed cadence
//! against a wall-clock deadline. The deadline only bounds the session: the
//! remote job keeps running after a timeout and can be re-polled later with
//! the same id. Callers must not run parallel pollers against one job id
//! from the same process.

use std::time::Duration;
use tokio::time::{self, Instant};
use tracing::debug;

use super::api::DeployApi;
use super::status::DeployResult;
use crate::component::ComponentSet;
use crate::errors::JobError;

/// Cadence and deadline for one poll session.
#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    pub frequency: Duration,
    pub timeout: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            frequency: Duration::from_secs(1),
            timeout: Duration::from_secs(33 * 60),
        }
    }
}

impl PollOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Default::default()
        }
    }
}

/// Poll until the status payload reports completion or the deadline passes.
///
/// The final payload is wrapped together with the component set the job was
/// submitted for. Status-check errors propagate unchanged; only the deadline
/// produces [`JobError::PollTimeout`].
pub async fn poll(
    api: &dyn DeployApi,
    job_id: &str,
    components: ComponentSet,
    options: PollOptions,
) -> Result<DeployResult, JobError> {
    let deadline = Instant::now() + options.timeout;
    loop {
        let status = api.check_status(job_id, true).await?;
        if status.done {
            debug!(job_id, success = status.success, "deploy job finished");
            return Ok(DeployResult::new(status, components));
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(timeout_error(job_id, options));
        }
        debug!(job_id, "deploy job still in progress");
        time::sleep_until(deadline.min(now + options.frequency)).await;
        if Instant::now() >= deadline {
            return Err(timeout_error(job_id, options));
        }
    }
}

fn timeout_error(job_id: &str, options: PollOptions) -> JobError {
    JobError::PollTimeout {
        job_id: job_id.to_string(),
        waited: options.timeout,
    }
}
