//! SMTP notifier

use std::path::Path;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials as SmtpCredentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{Notifier, ReportMail};
use crate::config::{Secret, SmtpSettings};
use crate::error::{MailError, Result};

/// Sends report mails through an authenticated SMTP relay (implicit TLS)
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotifier {
    /// Build the transport; no connection is made until the first send
    pub fn new(settings: &SmtpSettings, sender: &str, password: &Secret) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
            .map_err(MailError::from)?
            .port(settings.port)
            .credentials(SmtpCredentials::new(
                sender.to_string(),
                password.expose().to_string(),
            ))
            .build();

        Ok(Self { transport })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, mail: &ReportMail) -> Result<()> {
        let attachment = tokio::fs::read(&mail.attachment).await?;
        let message = build_message(mail, attachment)?;

        self.transport.send(message).await.map_err(MailError::from)?;
        log::info!("Report mail sent to {}", mail.recipient);
        Ok(())
    }
}

/// Assemble the multipart message: plain-text body plus the PDF attachment
fn build_message(mail: &ReportMail, attachment: Vec<u8>) -> Result<Message> {
    let from: Mailbox = mail.sender.parse().map_err(MailError::from)?;
    let to: Mailbox = mail.recipient.parse().map_err(MailError::from)?;

    let filename = attachment_name(&mail.attachment);
    let pdf = ContentType::parse("application/pdf")
        .map_err(|e| MailError::Build(e.to_string()))?;

    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(mail.subject.clone())
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(mail.body.clone()))
                .singlepart(Attachment::new(filename).body(attachment, pdf)),
        )
        .map_err(MailError::from)?;

    Ok(message)
}

fn attachment_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report.pdf".to_string())
}
