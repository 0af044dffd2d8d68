//! Waiting for a scan to finish

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::client::TaskApi;
use crate::client::models::Task;
use crate::error::{Error, Result};

/// Delay between two status polls
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Poll the task until it reports a finished report.
///
/// There is no upper bound on the number of polls; a scan takes as long as it
/// takes. `on_poll` sees every observed task state. Cancelling `cancel`
/// aborts the wait, also while a poll is still unanswered.
pub async fn wait_for_finish<C, F>(
    client: &C,
    task_id: &str,
    poll_interval: Duration,
    cancel: &CancellationToken,
    mut on_poll: F,
) -> Result<Task>
where
    C: TaskApi + ?Sized,
    F: FnMut(&Task) + Send,
{
    let mut warned_halted = false;

    loop {
        let task = tokio::select! {
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            task = client.get_task(task_id) => task?,
        };
        on_poll(&task);
        log::debug!(
            "Task {} status {} progress {:?} finished reports {}",
            task_id,
            task.status,
            task.progress,
            task.finished_reports
        );

        if task.finished_reports > 0 {
            return Ok(task);
        }

        if task.status.is_halted() && !warned_halted {
            log::warn!(
                "Task {} is {} and will not finish without intervention",
                task_id,
                task.status
            );
            warned_halted = true;
        }

        tokio::select! {
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            _ = tokio::time::sleep(poll_interval) => {}
        }
    }
}
