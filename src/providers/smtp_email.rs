//! SMTP email provider implementation using Lettre.

use crate::error::{Error, Result};
use crate::providers::EmailProvider;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

/// SMTP email provider using Lettre.
///
/// Sends real e-ticket emails via SMTP, suitable for production use.
///
/// # Examples
///
/// ```ignore
/// use ecotrack::providers::SmtpEmailProvider;
///
/// let provider = SmtpEmailProvider::new(
///     "smtp.gmail.com".to_string(),
///     587,
///     "user@gmail.com".to_string(),
///     "app_password".to_string(),
///     "noreply@example.com".to_string(),
///     "Ecotrack".to_string(),
/// );
/// ```
#[derive(Clone)]
pub struct SmtpEmailProvider {
    /// SMTP server address.
    smtp_server: String,

    /// SMTP server port.
    smtp_port: u16,

    /// SMTP credentials.
    credentials: Credentials,

    /// Sender email address.
    from_email: String,

    /// Sender display name.
    from_name: String,
}

impl SmtpEmailProvider {
    /// Create a new SMTP email provider.
    #[must_use]
    pub fn new(
        smtp_server: String,
        smtp_port: u16,
        smtp_username: String,
        smtp_password: String,
        from_email: String,
        from_name: String,
    ) -> Self {
        let credentials = Credentials::new(smtp_username, smtp_password);

        Self {
            smtp_server,
            smtp_port,
            credentials,
            from_email,
            from_name,
        }
    }

    /// Build SMTP transport for sending emails.
    ///
    /// Creates a new transport for each email to avoid connection pooling
    /// issues.
    fn build_transport(&self) -> Result<SmtpTransport> {
        let transport = SmtpTransport::relay(&self.smtp_server)
            .map_err(|e| Error::Email(format!("SMTP relay error: {e}")))?
            .port(self.smtp_port)
            .credentials(self.credentials.clone())
            .build();
        Ok(transport)
    }

    /// Build the "From" header.
    fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }
}

#[async_trait]
impl EmailProvider for SmtpEmailProvider {
    async fn send_eticket(
        &self,
        to: &str,
        subject: &str,
        html: &str,
        qr_png: &[u8],
    ) -> Result<()> {
        let qr_content_type = ContentType::parse("image/png")
            .map_err(|e| Error::Email(format!("Invalid attachment content type: {e}")))?;
        let attachment =
            Attachment::new("qrcode.png".to_string()).body(qr_png.to_vec(), qr_content_type);

        let email = Message::builder()
            .from(
                self.from_header()
                    .parse()
                    .map_err(|e| Error::Email(format!("Invalid from address: {e}")))?,
            )
            .to(to
                .parse()
                .map_err(|e| Error::Email(format!("Invalid to address: {e}")))?)
            .subject(subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::html(html.to_string()))
                    .singlepart(attachment),
            )
            .map_err(|e| Error::Email(format!("Failed to build email: {e}")))?;

        let mailer = self.build_transport()?;

        tokio::task::spawn_blocking(move || {
            mailer
                .send(&email)
                .map_err(|e| Error::Email(format!("Failed to send email: {e}")))
        })
        .await
        .map_err(|e| Error::Email(format!("Email task failed: {e}")))?
        .map(|_| ())
    }
}
