//! Outbound mail: message model and the SMTP submission client.
//!
//! One fresh STARTTLS session per message: the transport connects in
//! plaintext on the submission port and upgrades before credentials are
//! exchanged. Attachments carry the MIME type guessed from their filename,
//! falling back to `application/pdf`.

use std::path::Path;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment as MailAttachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::debug;

use crate::sender::SenderAccount;

/// Mail-submission port (STARTTLS).
pub const SUBMISSION_PORT: u16 = 587;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build email: {0}")]
    Build(String),

    #[error("Invalid attachment: {0}")]
    Attachment(String),

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// An application e-mail ready for submission.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    /// Plain-text fallback body.
    pub text_body: String,
    pub html_body: String,
    pub attachments: Vec<Attachment>,
}

/// A file attachment.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl Attachment {
    /// Read an attachment from disk. MIME type is guessed from the file
    /// extension and defaults to `application/pdf`.
    pub fn from_file(path: &Path) -> Result<Self, MailError> {
        let data = std::fs::read(path)
            .map_err(|e| MailError::Attachment(format!("{}: {e}", path.display())))?;

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| MailError::Attachment(format!("Invalid filename: {}", path.display())))?
            .to_string();

        let content_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/pdf")
            .to_string();

        Ok(Self {
            filename,
            content_type,
            data,
        })
    }
}

/// Seam for the mail-submission collaborator.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, account: &SenderAccount, email: &OutboundEmail) -> Result<(), MailError>;
}

/// Sends through the account's submission host with STARTTLS + login.
pub struct SmtpMailer;

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, account: &SenderAccount, email: &OutboundEmail) -> Result<(), MailError> {
        let message = build_message(account, email)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&account.smtp_host)?
            .port(SUBMISSION_PORT)
            .credentials(Credentials::new(
                account.email.clone(),
                account.password.clone(),
            ))
            .build();

        debug!(host = %account.smtp_host, to = %email.to, "Submitting message");
        transport.send(message).await?;
        Ok(())
    }
}

/// Assemble the multipart message: alternative(plain, html) + attachments.
fn build_message(account: &SenderAccount, email: &OutboundEmail) -> Result<Message, MailError> {
    let from: Mailbox = account.email.parse()?;
    let to: Mailbox = email.to.parse()?;

    let body_part = MultiPart::alternative()
        .singlepart(SinglePart::plain(email.text_body.clone()))
        .singlepart(SinglePart::html(email.html_body.clone()));

    let mut multipart = MultiPart::mixed().multipart(body_part);
    for attachment in &email.attachments {
        let content_type: ContentType = attachment
            .content_type
            .parse()
            .map_err(|e| MailError::Attachment(format!("Invalid content type: {e}")))?;
        multipart = multipart.singlepart(
            MailAttachment::new(attachment.filename.clone())
                .body(attachment.data.clone(), content_type),
        );
    }

    Message::builder()
        .from(from)
        .to(to)
        .subject(&email.subject)
        .multipart(multipart)
        .map_err(|e| MailError::Build(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> SenderAccount {
        SenderAccount {
            email: "me@gmail.com".into(),
            password: "pw".into(),
            smtp_host: "smtp.gmail.com".into(),
        }
    }

    fn email_with_attachment() -> OutboundEmail {
        OutboundEmail {
            to: "recruiter@corp.example".into(),
            subject: "Application - Marie Dupont".into(),
            text_body: "Please view this message in HTML.".into(),
            html_body: "<p>Hello</p>".into(),
            attachments: vec![Attachment {
                filename: "CV_DUPONT_Marie.pdf".into(),
                content_type: "application/pdf".into(),
                data: b"%PDF-1.4".to_vec(),
            }],
        }
    }

    #[test]
    fn test_build_message_succeeds_with_attachment() {
        let message = build_message(&account(), &email_with_attachment()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Application"));
        assert!(raw.contains("CV_DUPONT_Marie.pdf"));
    }

    #[test]
    fn test_invalid_recipient_is_an_address_error() {
        let mut email = email_with_attachment();
        email.to = "not-an-address".into();
        let err = build_message(&account(), &email).unwrap_err();
        assert!(matches!(err, MailError::Address(_)));
    }

    #[test]
    fn test_attachment_from_file_defaults_to_pdf_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("letter");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let attachment = Attachment::from_file(&path).unwrap();
        assert_eq!(attachment.content_type, "application/pdf");
        assert_eq!(attachment.filename, "letter");
    }

    #[test]
    fn test_attachment_from_missing_file_fails() {
        let err = Attachment::from_file(Path::new("/nonexistent/CV.pdf")).unwrap_err();
        assert!(matches!(err, MailError::Attachment(_)));
    }
}
