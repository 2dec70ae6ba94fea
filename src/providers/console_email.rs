//! Console email provider for development and testing.

use crate::error::Result;
use crate::providers::EmailProvider;
use async_trait::async_trait;
use tracing::info;

/// Console email provider.
///
/// Logs e-tickets instead of sending them. Useful for development where
/// you don't want to hit a real SMTP relay.
#[derive(Clone, Debug, Default)]
pub struct ConsoleEmailProvider;

impl ConsoleEmailProvider {
    /// Create a new console email provider.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EmailProvider for ConsoleEmailProvider {
    async fn send_eticket(
        &self,
        to: &str,
        subject: &str,
        html: &str,
        qr_png: &[u8],
    ) -> Result<()> {
        info!(
            to = %to,
            subject = %subject,
            html_bytes = html.len(),
            qr_png_bytes = qr_png.len(),
            "📧 E-Ticket Email (Development Mode)"
        );
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                     E-TICKET EMAIL                           ║");
        println!("╠══════════════════════════════════════════════════════════════╣");
        println!("║ To: {to:<57}║");
        println!("║ Subject: {subject:<52}║");
        println!("║ Attachment: qrcode.png ({} bytes){:<20}║", qr_png.len(), "");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        Ok(())
    }
}
