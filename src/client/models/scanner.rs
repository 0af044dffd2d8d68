//! Scanner models

use crate::client::xml::Element;
use crate::error::Result;

/// Scanner registered with the scan manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scanner {
    pub id: String,
    pub name: String,
}

impl Scanner {
    pub fn from_element(element: &Element) -> Result<Self> {
        Ok(Self {
            id: super::required_id(element)?,
            name: super::name_of(element),
        })
    }
}
