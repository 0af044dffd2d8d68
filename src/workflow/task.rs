//! Task creation and start

use crate::client::models::NewTask;
use crate::client::{ListingApi, TaskApi};
use crate::error::Result;

use super::naming::{count_suffixed_name, name_filter};

/// IDs of the scan resources a task is bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskBinding {
    pub config_id: String,
    pub target_id: String,
    pub scanner_id: String,
}

/// A task that was created and started
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedTask {
    pub id: String,
    pub name: String,
}

/// Base task name for a recipient
pub fn task_name_for(recipient: &str) -> String {
    format!("Quick Scan for {}", recipient)
}

/// Create the recipient's task and start it.
///
/// With `stop_after_start` the task is stopped right away, which keeps
/// debugging sessions from running full scans.
pub async fn create_and_start<C>(
    client: &C,
    binding: &TaskBinding,
    recipient: &str,
    stop_after_start: bool,
) -> Result<StartedTask>
where
    C: ListingApi + TaskApi + ?Sized,
{
    let base = task_name_for(recipient);
    let matches = client.get_tasks(&name_filter(&base)).await?.len();
    let name = count_suffixed_name(&base, matches);

    let id = client
        .create_task(&NewTask {
            name: name.clone(),
            config_id: binding.config_id.clone(),
            target_id: binding.target_id.clone(),
            scanner_id: binding.scanner_id.clone(),
        })
        .await?;

    client.start_task(&id).await?;
    log::info!("Started task {} ({})", name, id);

    if stop_after_start {
        client.stop_task(&id).await?;
        log::warn!("Task {} stopped right after start (--stop-after-start)", id);
    }

    Ok(StartedTask { id, name })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockGmpClient;
    use crate::client::mock::task_poll;
    use crate::client::models::TaskStatus;

    fn binding() -> TaskBinding {
        TaskBinding {
            config_id: "c-0".to_string(),
            target_id: "target-1".to_string(),
            scanner_id: "s-default".to_string(),
        }
    }

    #[tokio::test]
    async fn test_first_task_uses_plain_name() {
        let mock = MockGmpClient::new().with_next_task_id("t-1").await;

        let task = create_and_start(&mock, &binding(), "a@x.com", false)
            .await
            .unwrap();
        assert_eq!(task.id, "t-1");
        assert_eq!(task.name, "Quick Scan for a@x.com");

        let captured = mock.captured().await;
        assert_eq!(captured.tasks[0].name, "Quick Scan for a@x.com");
        assert_eq!(captured.tasks[0].config_id, "c-0");
        assert_eq!(captured.tasks[0].target_id, "target-1");
        assert_eq!(captured.tasks[0].scanner_id, "s-default");
        assert_eq!(captured.started, vec!["t-1".to_string()]);
        assert!(captured.stopped.is_empty());
    }

    #[tokio::test]
    async fn test_existing_matches_are_counted() {
        let mock = MockGmpClient::new()
            .with_tasks(vec![
                task_poll("old-1", TaskStatus::Finished, 1),
                task_poll("old-2", TaskStatus::Finished, 1),
            ])
            .await;

        let task = create_and_start(&mock, &binding(), "a@x.com", false)
            .await
            .unwrap();
        assert_eq!(task.name, "Quick Scan for a@x.com (2)");
    }

    #[tokio::test]
    async fn test_stop_after_start() {
        let mock = MockGmpClient::new().with_next_task_id("t-5").await;

        create_and_start(&mock, &binding(), "a@x.com", true)
            .await
            .unwrap();

        let captured = mock.captured().await;
        assert_eq!(captured.started, vec!["t-5".to_string()]);
        assert_eq!(captured.stopped, vec!["t-5".to_string()]);
    }
}
