//! Credentials captured once at start-up

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A secret string that is zeroed on drop and never printed
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the secret for handing it to a transport.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Scan manager login plus the sender's mail password.
///
/// Held for the process lifetime and reused by every scheduled run.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub gvm_username: String,
    pub gvm_password: Secret,
    pub mail_password: Secret,
}
