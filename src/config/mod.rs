//! Configuration management for bso-scan

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};

mod credentials;

pub use credentials::{Credentials, Secret};

/// Default GMP socket of a local gvmd installation
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/gvm/gvmd/gvmd.sock";

/// Default directory for downloaded PDF reports
pub const DEFAULT_REPORT_DIR: &str = "/tmp/bso_reports";

/// Application configuration
///
/// Every key is optional in the file; missing keys fall back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path of the gvmd management socket
    #[serde(default = "default_socket_path")]
    pub socket_path: PathBuf,

    /// Directory where PDF reports are written
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,

    /// Scan manager username (the password is never read from the file)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gvm_username: Option<String>,

    /// Upper bound for a single GMP exchange, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Outgoing mail server
    #[serde(default)]
    pub smtp: SmtpSettings,
}

/// SMTP relay settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpSettings {
    /// Relay host, reached over implicit TLS
    #[serde(default = "default_smtp_host")]
    pub host: String,

    /// Relay port
    #[serde(default = "default_smtp_port")]
    pub port: u16,
}

fn default_socket_path() -> PathBuf {
    PathBuf::from(DEFAULT_SOCKET_PATH)
}

fn default_report_dir() -> PathBuf {
    PathBuf::from(DEFAULT_REPORT_DIR)
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    465
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            report_dir: default_report_dir(),
            gvm_username: None,
            request_timeout_secs: None,
            smtp: SmtpSettings::default(),
        }
    }
}

impl Config {
    /// Get the default config file path (~/.bso-scan/config.yaml)
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".bso-scan").join("config.yaml"))
    }

    /// Load configuration from an explicit path, or from the default path.
    ///
    /// A missing file at the default location yields the built-in defaults.
    /// A missing file that was asked for explicitly is an error.
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(Path::new(path)),
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    log::debug!("No config file at {}, using defaults", path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;
        config.validate()?;

        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Reject values that would only fail later, mid-run
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == Some(0) {
            return Err(
                ConfigError::Invalid("request_timeout_secs must be positive".to_string()).into(),
            );
        }
        if self.smtp.host.trim().is_empty() {
            return Err(ConfigError::Invalid("smtp.host must not be empty".to_string()).into());
        }
        Ok(())
    }

    /// Apply command-line and environment overrides on top of the file values
    pub fn with_overrides(mut self, socket: Option<PathBuf>, report_dir: Option<PathBuf>) -> Self {
        if let Some(socket) = socket {
            self.socket_path = socket;
        }
        if let Some(report_dir) = report_dir {
            self.report_dir = report_dir;
        }
        self
    }

    /// Per-exchange timeout, if one is configured
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
