//! Scan task models

use std::fmt;

use crate::client::xml::Element;
use crate::error::Result;

/// Task status as reported by the scan manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    /// "New": created, never started
    Created,
    /// "Requested", "Queued" or "Running"
    Running,
    /// "Done"
    Finished,
    /// "Stop Requested" or "Stopped"
    Stopped,
    /// "Interrupted"
    Interrupted,
    /// Anything else the manager reports
    Other(String),
}

impl TaskStatus {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "New" => TaskStatus::Created,
            "Requested" | "Queued" | "Running" => TaskStatus::Running,
            "Done" => TaskStatus::Finished,
            "Stop Requested" | "Stopped" => TaskStatus::Stopped,
            "Interrupted" => TaskStatus::Interrupted,
            other => TaskStatus::Other(other.to_string()),
        }
    }

    /// Whether the task can no longer produce a finished report on its own
    pub fn is_halted(&self) -> bool {
        matches!(self, TaskStatus::Stopped | TaskStatus::Interrupted)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Created => write!(f, "Created"),
            TaskStatus::Running => write!(f, "Running"),
            TaskStatus::Finished => write!(f, "Finished"),
            TaskStatus::Stopped => write!(f, "Stopped"),
            TaskStatus::Interrupted => write!(f, "Interrupted"),
            TaskStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Scan task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Task ID
    pub id: String,

    /// Task name
    pub name: String,

    /// Current status
    pub status: TaskStatus,

    /// Progress in percent; the manager reports -1 when not running
    pub progress: Option<i32>,

    /// Number of reports in the "Done" state
    pub finished_reports: u32,
}

impl Task {
    pub fn from_element(element: &Element) -> Result<Self> {
        let status = element
            .text_at(&["status"])
            .map(TaskStatus::parse)
            .unwrap_or(TaskStatus::Other(String::new()));

        let finished_reports = element
            .text_at(&["report_count", "finished"])
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        Ok(Self {
            id: super::required_id(element)?,
            name: super::name_of(element),
            status,
            progress: element.text_at(&["progress"]).and_then(|v| v.parse().ok()),
            finished_reports,
        })
    }
}

/// Request body for creating a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
    pub config_id: String,
    pub target_id: String,
    pub scanner_id: String,
}
