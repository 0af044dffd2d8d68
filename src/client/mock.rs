//! Mock GMP client for testing
//!
//! Provides an in-memory implementation of the API traits so the workflow can
//! be unit tested without a running scan manager.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::Connect;
use super::api::{AuthApi, ListingApi, ReportApi, TaskApi};
use super::models::{
    NewTarget, NewTask, ReportDocument, ReportSummary, ScanConfig, Scanner, Target, Task,
    TaskStatus,
};
use crate::config::Secret;
use crate::error::{ApiError, Result};

/// Mock API client for testing.
///
/// Configure responses via builder methods, then use in tests. Clones share
/// state, so a clone handed to the workflow can be inspected afterwards.
///
/// # Example
/// ```ignore
/// let mock = MockGmpClient::new()
///     .with_scan_configs(vec![ScanConfig { id: "c-1".into(), name: "Full and fast".into() }])
///     .await;
///
/// let configs = mock.get_scan_configs("rows=-1").await?;
/// assert_eq!(configs.len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockGmpClient {
    /// Scan configs to return from get_scan_configs
    scan_configs: Arc<Mutex<Vec<ScanConfig>>>,
    /// Targets to return from get_targets
    targets: Arc<Mutex<Vec<Target>>>,
    /// Scanners to return from get_scanners
    scanners: Arc<Mutex<Vec<Scanner>>>,
    /// Tasks to return from get_tasks
    tasks: Arc<Mutex<Vec<Task>>>,
    /// Successive get_task answers; the last one repeats
    task_polls: Arc<Mutex<VecDeque<Task>>>,
    /// Reports to return from get_reports
    reports: Arc<Mutex<Vec<ReportSummary>>>,
    /// Report documents by report ID
    documents: Arc<Mutex<HashMap<String, ReportDocument>>>,
    /// ID handed out by create_task
    next_task_id: Arc<Mutex<Option<String>>>,
    /// When set, get_task never answers
    stall: Arc<Mutex<bool>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
    /// Captured requests for test assertions
    captured: Arc<Mutex<Captured>>,
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub authenticate: usize,
    pub get_scan_configs: usize,
    pub get_targets: usize,
    pub get_scanners: usize,
    pub get_tasks: usize,
    pub get_reports: usize,
    pub create_target: usize,
    pub create_task: usize,
    pub start_task: usize,
    pub stop_task: usize,
    pub get_task: usize,
    pub get_report: usize,
}

impl CallCounts {
    /// Get total number of API calls made.
    pub fn total(&self) -> usize {
        self.authenticate
            + self.get_scan_configs
            + self.get_targets
            + self.get_scanners
            + self.get_tasks
            + self.get_reports
            + self.create_target
            + self.create_task
            + self.start_task
            + self.stop_task
            + self.get_task
            + self.get_report
    }
}

/// Requests captured for test assertions
#[derive(Default, Debug, Clone)]
pub struct Captured {
    pub filters: Vec<String>,
    pub targets: Vec<NewTarget>,
    pub tasks: Vec<NewTask>,
    pub started: Vec<String>,
    pub stopped: Vec<String>,
    pub report_formats: Vec<(String, String)>,
}

impl MockGmpClient {
    /// Create a new mock client with default (empty) responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure scan configs to return from get_scan_configs.
    pub async fn with_scan_configs(self, configs: Vec<ScanConfig>) -> Self {
        *self.scan_configs.lock().await = configs;
        self
    }

    /// Configure targets to return from get_targets.
    pub async fn with_targets(self, targets: Vec<Target>) -> Self {
        *self.targets.lock().await = targets;
        self
    }

    /// Configure scanners to return from get_scanners.
    pub async fn with_scanners(self, scanners: Vec<Scanner>) -> Self {
        *self.scanners.lock().await = scanners;
        self
    }

    /// Configure tasks to return from get_tasks.
    pub async fn with_tasks(self, tasks: Vec<Task>) -> Self {
        *self.tasks.lock().await = tasks;
        self
    }

    /// Configure the successive answers of get_task.
    pub async fn with_task_polls(self, polls: Vec<Task>) -> Self {
        *self.task_polls.lock().await = polls.into();
        self
    }

    /// Configure reports to return from get_reports.
    pub async fn with_reports(self, reports: Vec<ReportSummary>) -> Self {
        *self.reports.lock().await = reports;
        self
    }

    /// Configure a document to return from get_report.
    pub async fn with_document(self, document: ReportDocument) -> Self {
        self.documents
            .lock()
            .await
            .insert(document.id.clone(), document);
        self
    }

    /// Configure the ID create_task hands out.
    pub async fn with_next_task_id(self, id: &str) -> Self {
        *self.next_task_id.lock().await = Some(id.to_string());
        self
    }

    /// Configure an error to return on the next API call.
    /// The error is consumed after one use.
    pub async fn with_error(self, error: ApiError) -> Self {
        *self.error.lock().await = Some(error);
        self
    }

    /// Make get_task hang like an unresponsive scan manager.
    pub async fn stalling(self) -> Self {
        *self.stall.lock().await = true;
        self
    }

    /// Get the call counts for verification in tests.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Get all captured requests for test assertions.
    pub async fn captured(&self) -> Captured {
        self.captured.lock().await.clone()
    }

    /// Check if there's a pending error and consume it.
    async fn check_error(&self) -> Result<()> {
        if let Some(e) = self.error.lock().await.take() {
            return Err(e.into());
        }
        Ok(())
    }

    async fn capture_filter(&self, filter: &str) {
        self.captured.lock().await.filters.push(filter.to_string());
    }
}

// ============================================================================
// AuthApi Implementation
// ============================================================================

#[async_trait]
impl AuthApi for MockGmpClient {
    async fn authenticate(&self, _username: &str, _password: &Secret) -> Result<()> {
        self.check_error().await?;
        self.call_count.lock().await.authenticate += 1;
        Ok(())
    }
}

// ============================================================================
// ListingApi Implementation
// ============================================================================

#[async_trait]
impl ListingApi for MockGmpClient {
    async fn get_scan_configs(&self, filter: &str) -> Result<Vec<ScanConfig>> {
        self.capture_filter(filter).await;
        self.check_error().await?;
        self.call_count.lock().await.get_scan_configs += 1;
        Ok(self.scan_configs.lock().await.clone())
    }

    async fn get_targets(&self, filter: &str) -> Result<Vec<Target>> {
        self.capture_filter(filter).await;
        self.check_error().await?;
        self.call_count.lock().await.get_targets += 1;
        Ok(self.targets.lock().await.clone())
    }

    async fn get_scanners(&self) -> Result<Vec<Scanner>> {
        self.check_error().await?;
        self.call_count.lock().await.get_scanners += 1;
        Ok(self.scanners.lock().await.clone())
    }

    async fn get_tasks(&self, filter: &str) -> Result<Vec<Task>> {
        self.capture_filter(filter).await;
        self.check_error().await?;
        self.call_count.lock().await.get_tasks += 1;
        Ok(self.tasks.lock().await.clone())
    }

    async fn get_reports(&self, filter: &str) -> Result<Vec<ReportSummary>> {
        self.capture_filter(filter).await;
        self.check_error().await?;
        self.call_count.lock().await.get_reports += 1;
        Ok(self.reports.lock().await.clone())
    }
}

// ============================================================================
// TaskApi Implementation
// ============================================================================

#[async_trait]
impl TaskApi for MockGmpClient {
    async fn create_target(&self, target: &NewTarget) -> Result<String> {
        self.check_error().await?;
        let mut counts = self.call_count.lock().await;
        counts.create_target += 1;
        let id = format!("target-{}", counts.create_target);
        drop(counts);

        self.captured.lock().await.targets.push(target.clone());
        Ok(id)
    }

    async fn create_task(&self, task: &NewTask) -> Result<String> {
        self.check_error().await?;
        let mut counts = self.call_count.lock().await;
        counts.create_task += 1;
        let fallback = format!("task-{}", counts.create_task);
        drop(counts);

        self.captured.lock().await.tasks.push(task.clone());
        let id = self.next_task_id.lock().await.clone();
        Ok(id.unwrap_or(fallback))
    }

    async fn start_task(&self, task_id: &str) -> Result<()> {
        self.check_error().await?;
        self.call_count.lock().await.start_task += 1;
        self.captured.lock().await.started.push(task_id.to_string());
        Ok(())
    }

    async fn stop_task(&self, task_id: &str) -> Result<()> {
        self.check_error().await?;
        self.call_count.lock().await.stop_task += 1;
        self.captured.lock().await.stopped.push(task_id.to_string());
        Ok(())
    }

    async fn get_task(&self, task_id: &str) -> Result<Task> {
        self.check_error().await?;
        self.call_count.lock().await.get_task += 1;
        if *self.stall.lock().await {
            std::future::pending::<()>().await;
        }

        let mut polls = self.task_polls.lock().await;
        let task = if polls.len() > 1 {
            polls.pop_front()
        } else {
            polls.front().cloned()
        };

        task.ok_or_else(|| ApiError::NotFound(format!("task {}", task_id)).into())
    }
}

// ============================================================================
// ReportApi Implementation
// ============================================================================

#[async_trait]
impl ReportApi for MockGmpClient {
    async fn get_report(&self, report_id: &str, format_id: &str) -> Result<ReportDocument> {
        self.check_error().await?;
        self.call_count.lock().await.get_report += 1;
        self.captured
            .lock()
            .await
            .report_formats
            .push((report_id.to_string(), format_id.to_string()));

        self.documents
            .lock()
            .await
            .get(report_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("report {}", report_id)).into())
    }
}

/// Hands out clones of one mock client, counting sessions
#[derive(Clone, Default)]
pub struct MockConnector {
    client: MockGmpClient,
    connections: Arc<Mutex<usize>>,
    refuse: Arc<Mutex<bool>>,
}

impl MockConnector {
    pub fn new(client: MockGmpClient) -> Self {
        Self {
            client,
            ..Self::default()
        }
    }

    /// Make every connection attempt fail
    pub async fn refusing(self) -> Self {
        *self.refuse.lock().await = true;
        self
    }

    pub async fn connections(&self) -> usize {
        *self.connections.lock().await
    }
}

#[async_trait]
impl Connect for MockConnector {
    type Client = MockGmpClient;

    async fn connect(&self) -> Result<MockGmpClient> {
        if *self.refuse.lock().await {
            return Err(ApiError::Connection("connection refused".to_string()).into());
        }
        *self.connections.lock().await += 1;
        Ok(self.client.clone())
    }
}

/// Build a task as get_task would report it
pub fn task_poll(id: &str, status: TaskStatus, finished_reports: u32) -> Task {
    Task {
        id: id.to_string(),
        name: format!("task {}", id),
        status,
        progress: None,
        finished_reports,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_client_default_empty() {
        let mock = MockGmpClient::new();

        let configs = mock.get_scan_configs("rows=-1").await.unwrap();
        assert!(configs.is_empty());

        let targets = mock.get_targets("name~target").await.unwrap();
        assert!(targets.is_empty());
    }

    #[tokio::test]
    async fn test_mock_client_with_error() {
        let mock = MockGmpClient::new()
            .with_error(ApiError::Connection("refused".to_string()))
            .await;

        let result = mock.get_scanners().await;
        assert!(result.is_err());

        // Error is consumed, next call succeeds
        let result = mock.get_scanners().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_mock_task_polls_repeat_last() {
        let mock = MockGmpClient::new()
            .with_task_polls(vec![
                task_poll("t-1", TaskStatus::Running, 0),
                task_poll("t-1", TaskStatus::Finished, 1),
            ])
            .await;

        assert_eq!(mock.get_task("t-1").await.unwrap().finished_reports, 0);
        assert_eq!(mock.get_task("t-1").await.unwrap().finished_reports, 1);
        assert_eq!(mock.get_task("t-1").await.unwrap().finished_reports, 1);
        assert_eq!(mock.call_counts().await.get_task, 3);
    }

    #[tokio::test]
    async fn test_mock_clones_share_state() {
        let mock = MockGmpClient::new();
        let clone = mock.clone();

        clone.start_task("t-1").await.unwrap();

        assert_eq!(mock.call_counts().await.start_task, 1);
        assert_eq!(mock.captured().await.started, vec!["t-1".to_string()]);
    }
}
