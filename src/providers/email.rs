//! Email provider trait.

use crate::error::Result;
use async_trait::async_trait;

/// Email provider.
///
/// Abstracts over the email relay used to deliver e-tickets. Delivery
/// happens off the request path; a failure after the registration has
/// committed is logged, not rolled back.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Send an e-ticket email.
    ///
    /// # Arguments
    ///
    /// - `to`: Recipient email address
    /// - `subject`: Email subject line
    /// - `html`: Rendered e-ticket HTML body
    /// - `qr_png`: QR code PNG bytes, attached as `qrcode.png`
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - An address fails to parse
    /// - The relay rejects or fails the send
    async fn send_eticket(&self, to: &str, subject: &str, html: &str, qr_png: &[u8])
    -> Result<()>;
}
