//! Scan workflow
//!
//! One run goes through policy selection, target creation, task start,
//! waiting, report download and delivery. Each step is a plain function over
//! the client traits; [`ScanWorkflow`] sequences them and owns everything a
//! run needs.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;

use crate::client::{AuthApi, Connect};
use crate::config::Credentials;
use crate::error::Result;
use crate::notify::{Notifier, ReportMail};
use crate::scheduler::ScanJob;

pub mod naming;
pub mod policy;
pub mod report;
pub mod scanner;
pub mod target;
pub mod task;
pub mod wait;

pub use policy::ScanPolicy;
use task::TaskBinding;

/// What to scan and who gets the report
#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    pub policy: ScanPolicy,
    pub target_name: Option<String>,
    pub hosts: Vec<String>,
    pub recipient: String,
    pub sender: String,
    pub report_dir: PathBuf,
    pub poll_interval: Duration,
    /// Stop each task right after starting it (debugging aid)
    pub stop_after_start: bool,
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub task_id: String,
    pub task_name: String,
    pub report_path: PathBuf,
}

/// Runs the complete scan workflow against fresh scan manager sessions
pub struct ScanWorkflow<C, N> {
    connector: C,
    notifier: N,
    credentials: Credentials,
    settings: WorkflowSettings,
}

impl<C, N> ScanWorkflow<C, N>
where
    C: Connect,
    N: Notifier,
{
    pub fn new(connector: C, notifier: N, credentials: Credentials, settings: WorkflowSettings) -> Self {
        Self {
            connector,
            notifier,
            credentials,
            settings,
        }
    }

    /// Execute one run from a new session.
    ///
    /// Remote objects created before a failure are left in place.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<RunSummary> {
        let client = self.connector.connect().await?;
        client
            .authenticate(&self.credentials.gvm_username, &self.credentials.gvm_password)
            .await?;

        let settings = &self.settings;

        let config_id = policy::resolve_policy(&client, settings.policy).await?;
        let target_id =
            target::resolve_or_create(&client, settings.target_name.as_deref(), &settings.hosts)
                .await?;
        let scanner_id = scanner::select(&client).await?;

        let binding = TaskBinding {
            config_id,
            target_id,
            scanner_id,
        };
        let started = task::create_and_start(
            &client,
            &binding,
            &settings.recipient,
            settings.stop_after_start,
        )
        .await?;
        println!("{} Task started: {}", "✓".green(), started.name.bold());

        let spinner = progress_spinner();
        let waited = wait::wait_for_finish(
            &client,
            &started.id,
            settings.poll_interval,
            cancel,
            |task| {
                let progress = task
                    .progress
                    .filter(|p| *p >= 0)
                    .map(|p| format!(" {}%", p))
                    .unwrap_or_default();
                spinner.set_message(format!("Scanning in progress... {}{}", task.status, progress));
            },
        )
        .await;
        spinner.finish_and_clear();
        waited?;
        println!("{} Scan finished", "✓".green());

        println!("{}", "Extracting report".cyan());
        let report_path = report::extract(&client, &started.id, &settings.report_dir).await?;
        println!("{} PDF created: {}", "✓".green(), report_path.display());

        println!(
            "{}",
            format!("Sending e-mail with report to {}", settings.recipient).cyan()
        );
        let mail = ReportMail::for_task(
            &settings.recipient,
            &settings.sender,
            &started.id,
            &started.name,
            report_path.clone(),
        );
        self.notifier.send(&mail).await?;
        println!("{} E-mail successfully sent!", "✓".green());

        Ok(RunSummary {
            task_id: started.id,
            task_name: started.name,
            report_path,
        })
    }
}

#[async_trait]
impl<C, N> ScanJob for ScanWorkflow<C, N>
where
    C: Connect + 'static,
    N: Notifier + 'static,
{
    async fn run_once(&self, cancel: &CancellationToken) -> Result<()> {
        let summary = self.run(cancel).await?;
        log::info!(
            "Run complete: task {} ({}), report {}",
            summary.task_name,
            summary.task_id,
            summary.report_path.display()
        );
        Ok(())
    }
}

fn progress_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Scanning in progress...");
    spinner.enable_steady_tick(Duration::from_millis(200));
    spinner
}
