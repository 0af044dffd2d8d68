//! Recurring execution of scan runs
//!
//! The first run starts immediately. With an interval, later runs are fed to
//! a single worker through a one-slot queue: a tick that arrives while a run
//! is still going is queued once, further ticks are dropped. Runs therefore
//! never overlap and the schedule stays anchored to the start time.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use colored::Colorize;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// One unit of scheduled work
#[async_trait]
pub trait ScanJob: Send + Sync + 'static {
    async fn run_once(&self, cancel: &CancellationToken) -> Result<()>;
}

pub struct Scheduler<J> {
    job: Arc<J>,
    interval: Option<Duration>,
    cancel: CancellationToken,
}

impl<J: ScanJob> Scheduler<J> {
    /// `interval: None` performs a single run
    pub fn new(job: J, interval: Option<Duration>, cancel: CancellationToken) -> Self {
        Self {
            job: Arc::new(job),
            interval,
            cancel,
        }
    }

    /// Run until cancelled, or until the single run completes.
    ///
    /// Returns an error when the initial run cannot reach or authenticate
    /// against the scan manager, or when a single run fails.
    pub async fn run(self) -> Result<()> {
        let Some(period) = self.interval else {
            return match run_cancellable(self.job.as_ref(), &self.cancel).await {
                Err(Error::Cancelled) => {
                    log::info!("Run cancelled");
                    Ok(())
                }
                other => other,
            };
        };

        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        match run_cancellable(self.job.as_ref(), &self.cancel).await {
            Ok(()) => announce_next(period),
            Err(Error::Cancelled) => return Ok(()),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => report_failure(&e, period),
        }

        let (trigger, queue) = mpsc::channel::<()>(1);
        let worker = tokio::spawn(worker(
            Arc::clone(&self.job),
            queue,
            period,
            self.cancel.clone(),
        ));

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = ticker.tick() => {
                    if trigger.try_send(()).is_err() {
                        log::warn!("Previous run still in progress; skipping this trigger");
                    }
                }
            }
        }

        drop(trigger);
        if let Err(e) = worker.await {
            log::error!("Scan worker terminated abnormally: {}", e);
        }
        Ok(())
    }
}

async fn worker<J: ScanJob>(
    job: Arc<J>,
    mut queue: mpsc::Receiver<()>,
    period: Duration,
    cancel: CancellationToken,
) {
    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => None,
            next = queue.recv() => next,
        };
        if next.is_none() {
            break;
        }

        match run_cancellable(job.as_ref(), &cancel).await {
            Ok(()) => announce_next(period),
            Err(Error::Cancelled) => break,
            Err(e) => report_failure(&e, period),
        }
    }
}

/// Run the job, abandoning it as soon as `cancel` fires
async fn run_cancellable<J: ScanJob>(job: &J, cancel: &CancellationToken) -> Result<()> {
    tokio::select! {
        _ = cancel.cancelled() => Err(Error::Cancelled),
        result = job.run_once(cancel) => result,
    }
}

fn report_failure(err: &Error, period: Duration) {
    log::error!("Scan run failed: {}", err);
    println!("{} {}", "✗".red(), err);
    announce_next(period);
}

fn announce_next(period: Duration) {
    let mut line = format!("Another task scheduled in {}", describe(period));
    if let Ok(delta) = chrono::Duration::from_std(period) {
        let at = chrono::Local::now() + delta;
        line.push_str(&format!(" (around {})", at.format("%Y-%m-%d %H:%M")));
    }
    println!("{}", line.cyan());
}

/// Human form of the interval ("1 hour", "6 hours")
fn describe(period: Duration) -> String {
    let secs = period.as_secs();
    if secs > 0 && secs % 3600 == 0 {
        let hours = secs / 3600;
        format!("{} hour{}", hours, if hours == 1 { "" } else { "s" })
    } else {
        format!("{} seconds", secs)
    }
}
