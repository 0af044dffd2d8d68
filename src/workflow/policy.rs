//! Scan policy selection

use std::fmt;

use crate::client::ListingApi;
use crate::error::{ApiError, ConfigError, Result};

/// Scan configurations selectable by index on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPolicy {
    FullAndFast,
    FullAndFastUltimate,
    FullAndVeryDeep,
    FullAndVeryDeepUltimate,
    SystemDiscovery,
}

impl ScanPolicy {
    /// Selector order, index = selector
    pub const ALL: [ScanPolicy; 5] = [
        ScanPolicy::FullAndFast,
        ScanPolicy::FullAndFastUltimate,
        ScanPolicy::FullAndVeryDeep,
        ScanPolicy::FullAndVeryDeepUltimate,
        ScanPolicy::SystemDiscovery,
    ];

    /// Name of the scan config on the scan manager
    pub fn config_name(&self) -> &'static str {
        match self {
            ScanPolicy::FullAndFast => "Full and fast",
            ScanPolicy::FullAndFastUltimate => "Full and fast ultimate",
            ScanPolicy::FullAndVeryDeep => "Full and very deep",
            ScanPolicy::FullAndVeryDeepUltimate => "Full and very deep ultimate",
            ScanPolicy::SystemDiscovery => "System Discovery",
        }
    }
}

impl TryFrom<i64> for ScanPolicy {
    type Error = ConfigError;

    fn try_from(selector: i64) -> std::result::Result<Self, Self::Error> {
        usize::try_from(selector)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
            .ok_or(ConfigError::InvalidScanConfig(selector))
    }
}

impl fmt::Display for ScanPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_name())
    }
}

/// Resolve a selector to the ID of the matching scan config.
///
/// The selector is validated before the scan manager is contacted.
pub async fn resolve<C: ListingApi + ?Sized>(client: &C, selector: i64) -> Result<String> {
    let policy = ScanPolicy::try_from(selector)?;
    resolve_policy(client, policy).await
}

/// Find the scan config named after `policy`
pub async fn resolve_policy<C: ListingApi + ?Sized>(client: &C, policy: ScanPolicy) -> Result<String> {
    let configs = client.get_scan_configs("rows=-1").await?;

    let config = configs
        .into_iter()
        .find(|config| config.name == policy.config_name())
        .ok_or_else(|| ApiError::NotFound(format!("scan config '{}'", policy.config_name())))?;

    log::debug!("{}: {}", config.name, config.id);
    Ok(config.id)
}
