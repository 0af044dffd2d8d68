//! Target and task lifecycle API trait

use async_trait::async_trait;

use crate::client::models::{NewTarget, NewTask, Task};
use crate::error::Result;

/// Create and drive scan targets and tasks
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Create a target, returning its ID
    async fn create_target(&self, target: &NewTarget) -> Result<String>;

    /// Create a task, returning its ID
    async fn create_task(&self, task: &NewTask) -> Result<String>;

    /// Start a task
    async fn start_task(&self, task_id: &str) -> Result<()>;

    /// Stop a running task
    async fn stop_task(&self, task_id: &str) -> Result<()>;

    /// Get a single task with its status and report counts
    async fn get_task(&self, task_id: &str) -> Result<Task>;
}
