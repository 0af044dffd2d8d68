//! Scan manager (GMP) client

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::UnixStream;

use crate::error::{ApiError, Result};

pub mod api;
pub mod gmp;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod xml;

pub use api::{AuthApi, GmpApi, ListingApi, ReportApi, TaskApi};
pub use gmp::GmpClient;
#[cfg(test)]
pub use mock::MockGmpClient;

/// Opens a fresh scan manager session
///
/// The workflow connects once per run, so a daemon restart between two
/// scheduled runs does not poison later runs.
#[async_trait]
pub trait Connect: Send + Sync {
    /// Session type handed to the workflow
    type Client: GmpApi;

    /// Open a connection; authentication is left to the caller
    async fn connect(&self) -> Result<Self::Client>;
}

/// Connects to gvmd over its Unix domain socket
#[derive(Debug, Clone)]
pub struct UnixSocketConnector {
    path: PathBuf,
    timeout: Option<Duration>,
}

impl UnixSocketConnector {
    pub fn new(path: PathBuf, timeout: Option<Duration>) -> Self {
        Self { path, timeout }
    }
}

#[async_trait]
impl Connect for UnixSocketConnector {
    type Client = GmpClient<UnixStream>;

    async fn connect(&self) -> Result<Self::Client> {
        log::debug!("Connecting to {}", self.path.display());
        let stream = UnixStream::connect(&self.path).await.map_err(|e| {
            ApiError::Connection(format!("{}: {}", self.path.display(), e))
        })?;
        Ok(GmpClient::new(stream).with_timeout(self.timeout))
    }
}
