//! Wiring of configuration, secrets, transports and the scheduler

use std::time::Duration;

use colored::Colorize;
use tokio_util::sync::CancellationToken;

use crate::cli::{Cli, credentials};
use crate::client::UnixSocketConnector;
use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::notify::SmtpNotifier;
use crate::scheduler::Scheduler;
use crate::workflow::{ScanPolicy, ScanWorkflow, WorkflowSettings, wait};

/// Build everything a run needs from the parsed command line
pub fn settings_from(cli: &Cli, config: &Config) -> Result<WorkflowSettings> {
    let hosts = cli.host_list();
    if hosts.is_empty() {
        return Err(ConfigError::MissingHosts.into());
    }

    Ok(WorkflowSettings {
        policy: ScanPolicy::try_from(i64::from(cli.scan_config))?,
        target_name: cli.target_name.clone(),
        hosts,
        recipient: cli.recipient.clone(),
        sender: cli.sender.clone(),
        report_dir: config.report_dir.clone(),
        poll_interval: wait::POLL_INTERVAL,
        stop_after_start: cli.stop_after_start,
    })
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = Config::load_at(cli.config.as_deref())?
        .with_overrides(cli.socket.clone(), cli.report_dir.clone());
    config.validate()?;
    log::debug!("Using socket {}", config.socket_path.display());

    let settings = settings_from(&cli, &config)?;
    let credentials = credentials::collect(config.gvm_username.as_deref(), &cli.sender)?;

    let notifier = SmtpNotifier::new(&config.smtp, &cli.sender, &credentials.mail_password)?;
    let connector = UnixSocketConnector::new(config.socket_path.clone(), config.request_timeout());

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        println!("\n{}", "Interrupted, shutting down (Ctrl-C again to force)".yellow());
        on_signal.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Forced exit");
            std::process::exit(130);
        }
    });

    println!(
        "{} {} on {}",
        "Scanning with".cyan(),
        settings.policy.to_string().bold(),
        settings.hosts.join(", ")
    );

    let workflow = ScanWorkflow::new(connector, notifier, credentials, settings);
    let interval = cli.interval.map(|hours| Duration::from_secs(hours * 3600));

    Scheduler::new(workflow, interval, cancel).run().await
}
