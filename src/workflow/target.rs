//! Scan target resolution

use std::collections::HashSet;

use crate::client::models::NewTarget;
use crate::client::{ListingApi, TaskApi};
use crate::error::{ConfigError, Result};

use super::naming::{name_filter, vacant_slot_name};

/// Name used when none is given on the command line
pub const DEFAULT_TARGET_NAME: &str = "target";

/// "All IANA assigned TCP" port list shipped with the scan manager
pub const PORT_LIST_ID: &str = "33d0cd82-57c6-11e1-8ed1-406186ea4fc5";

/// Create a target for `hosts` under a name no existing target uses.
///
/// A new target is created on every call, even when an identical one
/// exists. Uniqueness is only checked against a single listing, so
/// concurrent creators can still collide.
pub async fn resolve_or_create<C>(client: &C, name: Option<&str>, hosts: &[String]) -> Result<String>
where
    C: ListingApi + TaskApi + ?Sized,
{
    if hosts.is_empty() {
        return Err(ConfigError::MissingHosts.into());
    }

    let requested = name.unwrap_or(DEFAULT_TARGET_NAME);
    let existing: HashSet<String> = client
        .get_targets(&name_filter(requested))
        .await?
        .into_iter()
        .map(|target| target.name)
        .collect();

    let unique = vacant_slot_name(requested, &existing);
    log::debug!("target name: {}", unique);

    let target_id = client
        .create_target(&NewTarget {
            name: unique.clone(),
            hosts: hosts.to_vec(),
            port_list_id: PORT_LIST_ID.to_string(),
        })
        .await?;

    println!("New target '{}' created.", unique);
    Ok(target_id)
}
