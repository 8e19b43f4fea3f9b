//! `airlift report` — resolve a job id and poll its status.

use anyhow::Result;
use std::time::Duration;

use airlift::component::ComponentSet;
use airlift::config::AirliftConfig;
use airlift::deploy::{
    DeployApi, DeployResult, DeployStash, HttpDeployApi, JobClass, PollOptions, poll,
};
use airlift::ui;

pub struct ReportFlags {
    pub job_id: Option<String>,
    pub wait_minutes: u64,
}

pub async fn cmd_report(flags: ReportFlags) -> Result<()> {
    let config = AirliftConfig::load()?;
    let stash = DeployStash::open()?;
    let job_id = stash.resolve_job_id(JobClass::Source, flags.job_id.as_deref())?;
    println!("Deploy ID: {job_id}");

    let api = HttpDeployApi::new(config.service_url()?);
    // a standalone report has no freshly resolved set to correlate against
    let components = ComponentSet::new();

    if flags.wait_minutes == 0 {
        let status = api.check_status(&job_id, true).await?;
        return super::print_result(&DeployResult::new(status, components));
    }

    let options = PollOptions::with_timeout(Duration::from_secs(flags.wait_minutes * 60));
    let spinner = ui::poll_spinner(&job_id);
    let outcome = poll(&api, &job_id, components, options).await;
    spinner.finish_and_clear();
    super::report_outcome(&job_id, outcome)
}
