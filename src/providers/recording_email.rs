//! Recording email provider for tests.

use crate::error::{Error, Result};
use crate::providers::EmailProvider;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// One email captured by [`RecordingEmailProvider`].
#[derive(Debug, Clone)]
pub struct SentEmail {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Rendered HTML body.
    pub html: String,
    /// Attached QR PNG bytes.
    pub qr_png: Vec<u8>,
}

/// Email provider that records sends in memory instead of delivering them.
///
/// Tests assert against [`RecordingEmailProvider::sent`] to verify what
/// would have gone out.
#[derive(Debug, Clone, Default)]
pub struct RecordingEmailProvider {
    sent: Arc<Mutex<Vec<SentEmail>>>,
}

impl RecordingEmailProvider {
    /// Create a new recording provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All emails recorded so far.
    ///
    /// # Errors
    ///
    /// Returns error if the record lock is poisoned.
    pub fn sent(&self) -> Result<Vec<SentEmail>> {
        Ok(self
            .sent
            .lock()
            .map_err(|_| Error::Internal("email record lock poisoned".to_string()))?
            .clone())
    }
}

#[async_trait]
impl EmailProvider for RecordingEmailProvider {
    async fn send_eticket(
        &self,
        to: &str,
        subject: &str,
        html: &str,
        qr_png: &[u8],
    ) -> Result<()> {
        self.sent
            .lock()
            .map_err(|_| Error::Internal("email record lock poisoned".to_string()))?
            .push(SentEmail {
                to: to.to_string(),
                subject: subject.to_string(),
                html: html.to_string(),
                qr_png: qr_png.to_vec(),
            });
        Ok(())
    }
}
