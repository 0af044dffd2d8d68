//! Listing API trait

use async_trait::async_trait;

use crate::client::models::{ReportSummary, ScanConfig, Scanner, Target, Task};
use crate::error::Result;

/// Collection listing operations
///
/// `filter` uses the manager's filter syntax, e.g. `rows=-1 name~"target"`.
#[async_trait]
pub trait ListingApi: Send + Sync {
    /// List scan configurations
    async fn get_scan_configs(&self, filter: &str) -> Result<Vec<ScanConfig>>;

    /// List targets
    async fn get_targets(&self, filter: &str) -> Result<Vec<Target>>;

    /// List scanners
    async fn get_scanners(&self) -> Result<Vec<Scanner>>;

    /// List tasks
    async fn get_tasks(&self, filter: &str) -> Result<Vec<Task>>;

    /// List reports
    async fn get_reports(&self, filter: &str) -> Result<Vec<ReportSummary>>;
}
