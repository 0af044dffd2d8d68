//! Report download

use std::io::Write;
use std::path::{Path, PathBuf};

use base64::{Engine as _, engine::general_purpose};
use tempfile::NamedTempFile;

use crate::client::{ListingApi, ReportApi};
use crate::error::{ApiError, Result};

/// Built-in "PDF" report format
pub const PDF_REPORT_FORMAT_ID: &str = "c402cc3e-b531-11e1-9163-406186ea4fc5";

/// Where the report of `task_id` is stored.
///
/// The id comes from the scan manager, so ids that could leave `report_dir`
/// are rejected.
pub fn report_path(report_dir: &Path, task_id: &str) -> Result<PathBuf> {
    if task_id.is_empty() || task_id.contains(['/', '\\', '\0']) {
        return Err(ApiError::InvalidResponse(format!(
            "Task id {:?} is not usable as a file name",
            task_id
        ))
        .into());
    }
    Ok(report_dir.join(format!("{}_report.pdf", task_id)))
}

/// Download the PDF report of a finished task into `report_dir`.
///
/// Fails without touching the disk when the report has no content.
pub async fn extract<C>(client: &C, task_id: &str, report_dir: &Path) -> Result<PathBuf>
where
    C: ListingApi + ReportApi + ?Sized,
{
    let path = report_path(report_dir, task_id)?;
    let reports = client.get_reports("rows=-1").await?;
    let report = reports
        .iter()
        .find(|report| report.task_id.as_deref() == Some(task_id))
        .ok_or_else(|| ApiError::NotFound(format!("report for task {}", task_id)))?;

    let document = client.get_report(&report.id, PDF_REPORT_FORMAT_ID).await?;
    let Some(content) = document.content else {
        return Err(ApiError::EmptyReport(format!("report {}", report.id)).into());
    };

    let pdf = decode_payload(&content)?;
    write_atomically(&path, &pdf)?;

    log::info!("Wrote {} bytes to {}", pdf.len(), path.display());
    Ok(path)
}

/// Decode the base64 payload, ignoring line breaks the manager may insert
fn decode_payload(content: &str) -> Result<Vec<u8>> {
    let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| ApiError::InvalidResponse(format!("Report is not valid base64: {}", e)).into())
}

/// Write through a temporary file in the same directory, then rename
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.flush()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
