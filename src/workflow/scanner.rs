//! Scanner selection

use crate::client::ListingApi;
use crate::error::{ApiError, Result};

/// Name of the scanner gvmd installs by default
pub const DEFAULT_SCANNER_NAME: &str = "OpenVAS Default";

/// Pick the scanner tasks run on.
///
/// Prefers the default OpenVAS scanner by name. Installations that renamed it
/// fall back to the second listed scanner, which is where gvmd lists it after
/// the CVE scanner.
pub async fn select<C: ListingApi + ?Sized>(client: &C) -> Result<String> {
    let scanners = client.get_scanners().await?;

    if let Some(scanner) = scanners.iter().find(|s| s.name == DEFAULT_SCANNER_NAME) {
        return Ok(scanner.id.clone());
    }

    scanners
        .get(1)
        .map(|scanner| {
            log::warn!(
                "No scanner named '{}', using '{}'",
                DEFAULT_SCANNER_NAME,
                scanner.name
            );
            scanner.id.clone()
        })
        .ok_or_else(|| ApiError::NotFound(format!("scanner '{}'", DEFAULT_SCANNER_NAME)).into())
}
