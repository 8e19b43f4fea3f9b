//! `airlift deploy` — resolve selectors, submit the job, stash its id.

use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

use airlift::component::{
    ComponentSetBuilder, ComponentSetOptions, ManifestOptions, MetadataOptions,
};
use airlift::config::AirliftConfig;
use airlift::deploy::{
    ApiOptions, DeployAction, DeployApi, DeployStash, HttpDeployApi, JobClass, PollOptions,
    TestLevel, poll, version_banner,
};
use airlift::ui;

pub struct DeployFlags {
    pub source_paths: Vec<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub metadata: Vec<String>,
    pub package_names: Vec<String>,
    pub source_dirs: Vec<PathBuf>,
    pub api_version: Option<String>,
    pub source_api_version: Option<String>,
    pub destructive: bool,
    pub check_only: bool,
    pub ignore_warnings: bool,
    pub ignore_errors: bool,
    pub run_tests: Vec<String>,
    pub test_level: Option<String>,
    pub soap: bool,
    pub wait_minutes: u64,
}

pub async fn cmd_deploy(flags: DeployFlags) -> Result<()> {
    let config = AirliftConfig::load()?;
    let source_dirs = config.source_dirs(&flags.source_dirs);

    let selector_options = ComponentSetOptions {
        source_paths: (!flags.source_paths.is_empty()).then(|| flags.source_paths.clone()),
        manifest: flags.manifest.clone().map(|manifest_path| ManifestOptions {
            manifest_path,
            directory_paths: source_dirs.clone(),
        }),
        metadata: (!flags.metadata.is_empty()).then(|| MetadataOptions {
            metadata_entries: flags.metadata.clone(),
            directory_paths: source_dirs,
        }),
        package_names: (!flags.package_names.is_empty()).then(|| flags.package_names.clone()),
        api_version: flags.api_version.clone(),
        source_api_version: flags.source_api_version.clone(),
        destructive: flags.destructive,
    };
    let components = ComponentSetBuilder::build(selector_options).await?;

    let transport = config.transport(flags.soap);
    println!(
        "{}",
        version_banner(DeployAction::Deploying, &components, transport.is_rest())
    );

    let test_level = match &flags.test_level {
        Some(raw) => raw.parse()?,
        None => TestLevel::default(),
    };
    let api_options = ApiOptions {
        check_only: flags.check_only,
        ignore_warnings: flags.ignore_warnings,
        rollback_on_error: !flags.ignore_errors,
        run_tests: (!flags.run_tests.is_empty()).then(|| flags.run_tests.clone()),
        test_level,
        package_names: flags.package_names.clone(),
        transport,
    };

    let api = HttpDeployApi::new(config.service_url()?);
    let job_id = api.submit_deploy(&components, &api_options).await?;

    let stash = DeployStash::open()?;
    stash.write(JobClass::Source, &job_id)?;
    println!("Deploy ID: {job_id}");

    if flags.wait_minutes == 0 {
        ui::note("Deploy started. Run `airlift report` to check its status.");
        return Ok(());
    }

    let poll_options = PollOptions::with_timeout(Duration::from_secs(flags.wait_minutes * 60));
    let spinner = ui::poll_spinner(&job_id);
    let outcome = poll(&api, &job_id, components, poll_options).await;
    spinner.finish_and_clear();
    super::report_outcome(&job_id, outcome)
}
