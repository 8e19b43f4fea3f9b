//! Deploy status payloads and lifecycle states.

use serde::{Deserialize, Serialize};

use crate::component::ComponentSet;

/// Lifecycle of one deploy job as seen by this process. Terminal states
/// admit no further transition within a session; a fresh submission starts
/// a new session over the stashed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    #[default]
    NotSubmitted,
    Submitted,
    Polling,
    Completed,
    Failed,
    TimedOut,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::TimedOut)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            JobState::NotSubmitted => "not submitted",
            JobState::Submitted => "submitted",
            JobState::Polling => "in progress",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
            JobState::TimedOut => "timed out",
        };
        write!(f, "{label}")
    }
}

/// One component-level failure reported by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentFailure {
    pub component_type: String,
    pub full_name: String,
    pub problem: String,
}

/// Raw status payload returned by the deploy status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployStatus {
    pub id: String,
    /// True once the job has reached a terminal state on the server.
    pub done: bool,
    #[serde(default)]
    pub success: bool,
    /// Server-side state label, e.g. "InProgress" or "Succeeded".
    #[serde(default)]
    pub state_detail: Option<String>,
    #[serde(default)]
    pub number_components_deployed: u32,
    #[serde(default)]
    pub number_components_total: u32,
    #[serde(default)]
    pub number_component_errors: u32,
    #[serde(default)]
    pub component_failures: Vec<ComponentFailure>,
}

/// Final result handed to the command layer: the raw status correlated with
/// the component set the job was submitted for.
#[derive(Debug, Clone)]
pub struct DeployResult {
    pub status: DeployStatus,
    pub components: ComponentSet,
}

impl DeployResult {
    pub fn new(status: DeployStatus, components: ComponentSet) -> Self {
        Self { status, components }
    }

    pub fn state(&self) -> JobState {
        match (self.status.done, self.status.success) {
            (true, true) => JobState::Completed,
            (true, false) => JobState::Failed,
            (false, _) => JobState::Polling,
        }
    }
}
