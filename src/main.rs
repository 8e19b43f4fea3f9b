use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cmd;

#[derive(Parser)]
#[command(name = "airlift")]
#[command(version, about = "Command-line deployment orchestrator for org metadata")]
pub struct Cli {
    /// Enable debug diagnostics (selector traces, poll progress)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve component selectors and submit a deploy job
    Deploy {
        /// File or directory paths to deploy
        #[arg(long = "source-path", value_name = "PATH")]
        source_paths: Vec<PathBuf>,

        /// Manifest file enumerating types and members
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Metadata selectors of the form Type or Type:FullName
        #[arg(long = "metadata", value_name = "ENTRY")]
        metadata: Vec<String>,

        /// Packages resolved on the service side
        #[arg(long = "package-name", value_name = "NAME")]
        package_names: Vec<String>,

        /// Directories to resolve manifest and metadata selectors against
        #[arg(long = "source-dir", value_name = "DIR")]
        source_dirs: Vec<PathBuf>,

        #[arg(long)]
        api_version: Option<String>,

        #[arg(long)]
        source_api_version: Option<String>,

        /// Treat the selected components as removals
        #[arg(long)]
        destructive: bool,

        /// Validate the deploy without saving changes
        #[arg(long)]
        check_only: bool,

        #[arg(long)]
        ignore_warnings: bool,

        /// Keep going instead of rolling back on error
        #[arg(long)]
        ignore_errors: bool,

        /// Tests to run with RunSpecifiedTests
        #[arg(long = "run-tests", value_name = "TEST")]
        run_tests: Vec<String>,

        /// NoTestRun, RunSpecifiedTests, RunLocalTests or RunAllTestsInOrg
        #[arg(long)]
        test_level: Option<String>,

        /// Use the legacy SOAP transport
        #[arg(long)]
        soap: bool,

        /// Minutes to wait for completion; 0 returns right after submission
        #[arg(long, default_value = "33")]
        wait: u64,
    },
    /// Check the status of a submitted deploy job
    Report {
        /// Job ID; defaults to the stashed id from the last deploy
        job_id: Option<String>,

        /// Minutes to wait for completion; 0 checks once
        #[arg(long, default_value = "33")]
        wait: u64,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "airlift=debug"
    } else {
        "airlift=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Deploy {
            source_paths,
            manifest,
            metadata,
            package_names,
            source_dirs,
            api_version,
            source_api_version,
            destructive,
            check_only,
            ignore_warnings,
            ignore_errors,
            run_tests,
            test_level,
            soap,
            wait,
        } => {
            cmd::cmd_deploy(cmd::DeployFlags {
                source_paths,
                manifest,
                metadata,
                package_names,
                source_dirs,
                api_version,
                source_api_version,
                destructive,
                check_only,
                ignore_warnings,
                ignore_errors,
                run_tests,
                test_level,
                soap,
                wait_minutes: wait,
            })
            .await?;
        }
        Commands::Report { job_id, wait } => {
            cmd::cmd_report(cmd::ReportFlags {
                job_id,
                wait_minutes: wait,
            })
            .await?;
        }
    }
    Ok(())
}
