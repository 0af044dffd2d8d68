//! Authentication API trait

use async_trait::async_trait;

use crate::config::Secret;
use crate::error::Result;

/// Authentication operations for a GMP session
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Authenticate the session; every later command runs as this user
    async fn authenticate(&self, username: &str, password: &Secret) -> Result<()>;
}
