//! Scan target models

use crate::client::xml::Element;
use crate::error::Result;

/// Existing scan target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Target ID
    pub id: String,

    /// Display name, unique per owner on the scan manager
    pub name: String,
}

impl Target {
    pub fn from_element(element: &Element) -> Result<Self> {
        Ok(Self {
            id: super::required_id(element)?,
            name: super::name_of(element),
        })
    }
}

/// Request body for creating a target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTarget {
    /// Display name (already disambiguated)
    pub name: String,

    /// Host specifiers: addresses, ranges or hostnames
    pub hosts: Vec<String>,

    /// Port list the target is scanned with
    pub port_list_id: String,
}
