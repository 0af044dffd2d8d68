//! Report delivery
//!
//! The workflow only knows the [`Notifier`] trait; [`SmtpNotifier`] is the
//! production transport.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;

mod smtp;

pub use smtp::SmtpNotifier;

/// Subject line of every report mail
pub const REPORT_SUBJECT: &str = "[BSO-Scan] Scan Report";

/// An e-mail carrying one report attachment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportMail {
    pub recipient: String,
    pub sender: String,
    pub subject: String,
    pub body: String,
    pub attachment: PathBuf,
}

impl ReportMail {
    /// Build the mail announcing a finished task
    pub fn for_task(
        recipient: &str,
        sender: &str,
        task_id: &str,
        task_name: &str,
        attachment: PathBuf,
    ) -> Self {
        let body = format!(
            "\nTask {task_name} with id {task_id} has finished.\n\
             This email escalation is configured to attach .pdf report.\n\n\
             Note:\n\
             This email was sent to you as a configured security scan escalation.\n\
             Please contact your local system administrator if you think you\n\
             should not have received it."
        );

        Self {
            recipient: recipient.to_string(),
            sender: sender.to_string(),
            subject: REPORT_SUBJECT.to_string(),
            body,
            attachment,
        }
    }
}

/// Delivers report mails
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one mail; the transport holds the sender's credentials
    async fn send(&self, mail: &ReportMail) -> Result<()>;
}

#[cfg(test)]
pub mod recording {
    //! Notifier double that records what it was asked to send

    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use super::{Notifier, ReportMail};
    use crate::error::{MailError, Result};

    #[derive(Clone, Default)]
    pub struct RecordingNotifier {
        sent: Arc<Mutex<Vec<ReportMail>>>,
        fail: Arc<Mutex<bool>>,
    }

    impl RecordingNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every send fail with a transport error
        pub async fn failing(self) -> Self {
            *self.fail.lock().await = true;
            self
        }

        pub async fn sent(&self) -> Vec<ReportMail> {
            self.sent.lock().await.clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, mail: &ReportMail) -> Result<()> {
            if *self.fail.lock().await {
                return Err(MailError::Transport("535 authentication rejected".to_string()).into());
            }
            self.sent.lock().await.push(mail.clone());
            Ok(())
        }
    }
}
