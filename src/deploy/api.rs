//! Remote deploy service client.
//!
//! The command layer talks to the service through the [`DeployApi`] trait so
//! the poller and commands stay testable with stubs; [`HttpDeployApi`] is the
//! real client.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::status::DeployStatus;
use crate::component::ComponentSet;
use crate::config::Transport;

/// Test invocation level requested for a deploy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TestLevel {
    #[default]
    NoTestRun,
    RunSpecifiedTests,
    RunLocalTests,
    RunAllTestsInOrg,
}

impl FromStr for TestLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NoTestRun" => Ok(TestLevel::NoTestRun),
            "RunSpecifiedTests" => Ok(TestLevel::RunSpecifiedTests),
            "RunLocalTests" => Ok(TestLevel::RunLocalTests),
            "RunAllTestsInOrg" => Ok(TestLevel::RunAllTestsInOrg),
            _ => anyhow::bail!(
                "Invalid test level '{}'. Valid values: NoTestRun, RunSpecifiedTests, RunLocalTests, RunAllTestsInOrg",
                s
            ),
        }
    }
}

/// Options forwarded to the deploy submission endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOptions {
    pub check_only: bool,
    pub ignore_warnings: bool,
    pub rollback_on_error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_tests: Option<Vec<String>>,
    pub test_level: TestLevel,
    /// Packages the service resolves on its side; the local component set
    /// stays empty for these.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub package_names: Vec<String>,
    pub transport: Transport,
}

impl Default for ApiOptions {
    fn default() -> Self {
        Self {
            check_only: false,
            ignore_warnings: false,
            rollback_on_error: true,
            run_tests: None,
            test_level: TestLevel::default(),
            package_names: Vec::new(),
            transport: Transport::default(),
        }
    }
}

/// Remote job operations the lifecycle manager depends on.
#[async_trait]
pub trait DeployApi: Send + Sync {
    /// Submit a deploy job; returns the job id assigned by the service.
    async fn submit_deploy(
        &self,
        components: &ComponentSet,
        options: &ApiOptions,
    ) -> Result<String>;

    /// Fetch the current status of a job.
    async fn check_status(&self, job_id: &str, include_details: bool) -> Result<DeployStatus>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeployRequest<'a> {
    components: &'a ComponentSet,
    #[serde(flatten)]
    options: &'a ApiOptions,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    id: String,
}

/// HTTP client against the org's metadata deploy endpoints.
pub struct HttpDeployApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDeployApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl DeployApi for HttpDeployApi {
    async fn submit_deploy(
        &self,
        components: &ComponentSet,
        options: &ApiOptions,
    ) -> Result<String> {
        let url = format!("{}/metadata/deploy", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&DeployRequest {
                components,
                options,
            })
            .send()
            .await
            .context("Failed to send deploy request to the service")?;
        let response = response
            .error_for_status()
            .context("Deploy request was rejected by the service")?;
        let submitted: SubmitResponse = response
            .json()
            .await
            .context("Failed to parse deploy submission response")?;
        Ok(submitted.id)
    }

    async fn check_status(&self, job_id: &str, include_details: bool) -> Result<DeployStatus> {
        let url = format!("{}/metadata/deploy/{}", self.base_url, job_id);
        let response = self
            .client
            .get(&url)
            .query(&[("includeDetails", include_details)])
            .send()
            .await
            .context("Failed to send deploy status request to the service")?;
        let response = response
            .error_for_status()
            .context("Deploy status request was rejected by the service")?;
        response
            .json()
            .await
            .context("Failed to parse deploy status response")
    }
}
