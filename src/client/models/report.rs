//! Report models

use crate::client::xml::Element;
use crate::error::Result;

/// Report listing entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    /// Report ID
    pub id: String,

    /// ID of the task that produced the report
    pub task_id: Option<String>,
}

impl ReportSummary {
    pub fn from_element(element: &Element) -> Result<Self> {
        // The listing nests the report body inside the report element; the
        // body's task reference is authoritative, the outer one a fallback.
        let task_id = element
            .find(&["report", "task"])
            .or_else(|| element.child("task"))
            .and_then(|task| task.attr("id"))
            .map(str::to_string);

        Ok(Self {
            id: super::required_id(element)?,
            task_id,
        })
    }
}

/// A report rendered by one of the manager's report formats
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    /// Report ID
    pub id: String,

    /// Base64 payload that follows the `report_format` element, if any
    pub content: Option<String>,
}

impl ReportDocument {
    pub fn from_element(element: &Element) -> Result<Self> {
        let content = element
            .child("report_format")
            .map(|format| format.tail.trim())
            .filter(|content| !content.is_empty())
            .map(str::to_string);

        Ok(Self {
            id: super::required_id(element)?,
            content,
        })
    }
}
