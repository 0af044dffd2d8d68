//! GMP client implementation
//!
//! Greenbone Management Protocol sessions are a strict command/response
//! exchange over a byte stream: write one XML command, read one XML document
//! back. The client is generic over the stream so tests can drive it through
//! an in-memory pipe.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use super::api::{AuthApi, ListingApi, ReportApi, TaskApi};
use super::models::{
    NewTarget, NewTask, ReportDocument, ReportSummary, ScanConfig, Scanner, Target, Task,
};
use super::xml::{self, Element, escape};
use crate::config::Secret;
use crate::error::{ApiError, Result};

/// Bytes requested from the stream per read
const READ_CHUNK_SIZE: usize = 16 * 1024;

/// GMP client over a connected stream
pub struct GmpClient<S> {
    stream: Mutex<S>,
    timeout: Option<Duration>,
}

impl<S> GmpClient<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap a connected stream
    pub fn new(stream: S) -> Self {
        Self {
            stream: Mutex::new(stream),
            timeout: None,
        }
    }

    /// Bound every command/response exchange
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send a command and return the response root after checking its status
    async fn command(&self, command: &str) -> Result<Element> {
        let response = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.exchange(command))
                .await
                .map_err(|_| ApiError::Timeout(limit))??,
            None => self.exchange(command).await?,
        };
        check_status(&response)?;
        Ok(response)
    }

    async fn exchange(&self, command: &str) -> Result<Element> {
        let mut stream = self.stream.lock().await;
        stream
            .write_all(command.as_bytes())
            .await
            .map_err(ApiError::from)?;
        stream.flush().await.map_err(ApiError::from)?;

        let mut buffer: Vec<u8> = Vec::with_capacity(READ_CHUNK_SIZE);
        let mut chunk = vec![0u8; READ_CHUNK_SIZE];

        loop {
            let read = stream.read(&mut chunk).await.map_err(ApiError::from)?;
            if read == 0 {
                return match try_parse(&buffer) {
                    Ok(Some(root)) => Ok(root),
                    Ok(None) if buffer.is_empty() => Err(ApiError::Connection(
                        "Scan manager closed the connection".to_string(),
                    )
                    .into()),
                    Ok(None) => Err(ApiError::InvalidResponse(
                        "Connection closed in the middle of a response".to_string(),
                    )
                    .into()),
                    Err(e) => Err(e),
                };
            }
            buffer.extend_from_slice(&chunk[..read]);

            // A document can only be complete once it ends with a closing '>'
            if !ends_with_tag(&buffer) {
                continue;
            }
            if let Some(root) = try_parse(&buffer)? {
                log::debug!("GMP <{}> response: {} bytes", root.name, buffer.len());
                return Ok(root);
            }
        }
    }
}

fn ends_with_tag(buffer: &[u8]) -> bool {
    buffer
        .iter()
        .rev()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'>')
}

fn try_parse(buffer: &[u8]) -> Result<Option<Element>> {
    match std::str::from_utf8(buffer) {
        Ok(text) => xml::parse(text),
        // Multi-byte character split across reads
        Err(e) if e.error_len().is_none() => Ok(None),
        Err(e) => Err(ApiError::InvalidResponse(format!("Response is not UTF-8: {}", e)).into()),
    }
}

/// Map the response's `status` attribute onto the error taxonomy
fn check_status(response: &Element) -> Result<()> {
    let code: u16 = response
        .attr("status")
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            ApiError::InvalidResponse(format!("<{}> without a status", response.name))
        })?;
    let text = response.attr("status_text").unwrap_or_default().to_string();

    match code {
        200..=299 => Ok(()),
        404 => Err(ApiError::NotFound(text).into()),
        _ => Err(ApiError::Status { code, text }.into()),
    }
}

fn created_id(response: &Element) -> Result<String> {
    response.attr("id").map(str::to_string).ok_or_else(|| {
        ApiError::InvalidResponse(format!("<{}> without the new resource id", response.name))
            .into()
    })
}

fn collect<T>(
    response: &Element,
    name: &str,
    build: impl Fn(&Element) -> Result<T>,
) -> Result<Vec<T>> {
    response.children_named(name).map(build).collect()
}

#[async_trait]
impl<S> AuthApi for GmpClient<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn authenticate(&self, username: &str, password: &Secret) -> Result<()> {
        let command = format!(
            "<authenticate><credentials><username>{}</username><password>{}</password></credentials></authenticate>",
            escape(username),
            escape(password.expose())
        );

        match self.command(&command).await {
            Ok(_) => {
                log::debug!("Authenticated as {}", username);
                Ok(())
            }
            Err(crate::error::Error::Api(ApiError::Status { code: 400, .. })) => {
                Err(ApiError::AuthenticationFailed.into())
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl<S> ListingApi for GmpClient<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn get_scan_configs(&self, filter: &str) -> Result<Vec<ScanConfig>> {
        let command = format!(
            r#"<get_configs usage_type="scan" filter="{}"/>"#,
            escape(filter)
        );
        let response = self.command(&command).await?;
        collect(&response, "config", ScanConfig::from_element)
    }

    async fn get_targets(&self, filter: &str) -> Result<Vec<Target>> {
        let command = format!(r#"<get_targets filter="{}"/>"#, escape(filter));
        let response = self.command(&command).await?;
        collect(&response, "target", Target::from_element)
    }

    async fn get_scanners(&self) -> Result<Vec<Scanner>> {
        let response = self.command("<get_scanners/>").await?;
        collect(&response, "scanner", Scanner::from_element)
    }

    async fn get_tasks(&self, filter: &str) -> Result<Vec<Task>> {
        let command = format!(r#"<get_tasks filter="{}"/>"#, escape(filter));
        let response = self.command(&command).await?;
        collect(&response, "task", Task::from_element)
    }

    async fn get_reports(&self, filter: &str) -> Result<Vec<ReportSummary>> {
        let command = format!(
            r#"<get_reports filter="{}" ignore_pagination="1" details="0"/>"#,
            escape(filter)
        );
        let response = self.command(&command).await?;
        collect(&response, "report", ReportSummary::from_element)
    }
}

#[async_trait]
impl<S> TaskApi for GmpClient<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn create_target(&self, target: &NewTarget) -> Result<String> {
        let command = format!(
            r#"<create_target><name>{}</name><hosts>{}</hosts><port_list id="{}"/></create_target>"#,
            escape(&target.name),
            escape(&target.hosts.join(",")),
            escape(&target.port_list_id)
        );
        let response = self.command(&command).await?;
        created_id(&response)
    }

    async fn create_task(&self, task: &NewTask) -> Result<String> {
        let command = format!(
            r#"<create_task><name>{}</name><config id="{}"/><target id="{}"/><scanner id="{}"/></create_task>"#,
            escape(&task.name),
            escape(&task.config_id),
            escape(&task.target_id),
            escape(&task.scanner_id)
        );
        let response = self.command(&command).await?;
        created_id(&response)
    }

    async fn start_task(&self, task_id: &str) -> Result<()> {
        let command = format!(r#"<start_task task_id="{}"/>"#, escape(task_id));
        self.command(&command).await.map(|_| ())
    }

    async fn stop_task(&self, task_id: &str) -> Result<()> {
        let command = format!(r#"<stop_task task_id="{}"/>"#, escape(task_id));
        self.command(&command).await.map(|_| ())
    }

    async fn get_task(&self, task_id: &str) -> Result<Task> {
        let command = format!(r#"<get_tasks task_id="{}" details="1"/>"#, escape(task_id));
        let response = self.command(&command).await?;
        let task = response
            .child("task")
            .ok_or_else(|| ApiError::NotFound(format!("task {}", task_id)))?;
        Task::from_element(task)
    }
}

#[async_trait]
impl<S> ReportApi for GmpClient<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn get_report(&self, report_id: &str, format_id: &str) -> Result<ReportDocument> {
        let command = format!(
            r#"<get_reports report_id="{}" format_id="{}" details="1" ignore_pagination="1"/>"#,
            escape(report_id),
            escape(format_id)
        );
        let response = self.command(&command).await?;
        let report = response
            .child("report")
            .ok_or_else(|| ApiError::NotFound(format!("report {}", report_id)))?;
        ReportDocument::from_element(report)
    }
}
