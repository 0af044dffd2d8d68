//! Runtime secrets
//!
//! Values come from the environment when set, otherwise the user is prompted
//! once at startup. Nothing is written back to disk.

use dialoguer::{Input, Password, theme::ColorfulTheme};

use crate::config::{Credentials, Secret};
use crate::error::Result;

pub const GVM_USERNAME_ENV: &str = "BSO_SCAN_GVM_USERNAME";
pub const GVM_PASSWORD_ENV: &str = "BSO_SCAN_GVM_PASSWORD";
pub const MAIL_PASSWORD_ENV: &str = "BSO_SCAN_MAIL_PASSWORD";

/// Collect credentials from the process environment or interactive prompts
pub fn collect(config_username: Option<&str>, sender: &str) -> Result<Credentials> {
    collect_with(|name| std::env::var(name).ok(), config_username, sender)
}

/// Collect credentials, looking values up through `lookup` before prompting.
///
/// The scan manager username falls back to the config file before prompting.
pub fn collect_with<F>(lookup: F, config_username: Option<&str>, sender: &str) -> Result<Credentials>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |name: &str| lookup(name).filter(|value| !value.is_empty());

    let gvm_username = match non_empty(GVM_USERNAME_ENV)
        .or_else(|| config_username.map(str::to_string))
    {
        Some(username) => username,
        None => Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt("OpenVAS username")
            .interact_text()?,
    };

    let gvm_password = match non_empty(GVM_PASSWORD_ENV) {
        Some(password) => Secret::new(password),
        None => Secret::new(
            Password::with_theme(&ColorfulTheme::default())
                .with_prompt(format!("OpenVAS password for {}", gvm_username))
                .interact()?,
        ),
    };

    let mail_password = match non_empty(MAIL_PASSWORD_ENV) {
        Some(password) => Secret::new(password),
        None => Secret::new(
            Password::with_theme(&ColorfulTheme::default())
                .with_prompt(format!("E-mail password for {}", sender))
                .interact()?,
        ),
    };

    log::debug!("Credentials collected for scan manager user {}", gvm_username);
    Ok(Credentials {
        gvm_username,
        gvm_password,
        mail_password,
    })
}
