//! GMP data models
//!
//! Only the fields the scan workflow reads are modelled. Each model is built
//! from the element the scan manager returns for it.

mod config;
mod report;
mod scanner;
mod target;
mod task;

pub use config::ScanConfig;
pub use report::{ReportDocument, ReportSummary};
pub use scanner::Scanner;
pub use target::{NewTarget, Target};
pub use task::{NewTask, Task, TaskStatus};

use super::xml::Element;
use crate::error::{ApiError, Result};

/// Read the mandatory `id` attribute of a resource element
pub(crate) fn required_id(element: &Element) -> Result<String> {
    element
        .attr("id")
        .map(str::to_string)
        .ok_or_else(|| {
            ApiError::InvalidResponse(format!("<{}> element without an id", element.name)).into()
        })
}

/// Read the `name` child of a resource element, empty when absent
pub(crate) fn name_of(element: &Element) -> String {
    element.text_at(&["name"]).unwrap_or_default().to_string()
}
