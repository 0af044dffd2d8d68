//! Scan configuration models

use crate::client::xml::Element;
use crate::error::Result;

/// Scan configuration (policy) known to the scan manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Configuration ID
    pub id: String,

    /// Configuration name, e.g. "Full and fast"
    pub name: String,
}

impl ScanConfig {
    pub fn from_element(element: &Element) -> Result<Self> {
        Ok(Self {
            id: super::required_id(element)?,
            name: super::name_of(element),
        })
    }
}
