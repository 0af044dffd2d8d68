//! Report API trait

use async_trait::async_trait;

use crate::client::models::ReportDocument;
use crate::error::Result;

/// Report download
#[async_trait]
pub trait ReportApi: Send + Sync {
    /// Fetch a report rendered by the given report format
    async fn get_report(&self, report_id: &str, format_id: &str) -> Result<ReportDocument>;
}
