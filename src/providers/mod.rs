//! Outbound collaborator providers.
//!
//! Email delivery is abstracted behind [`EmailProvider`] so the production
//! SMTP relay, the development console sink, and the recording provider
//! used by tests are interchangeable.

mod console_email;
mod email;
#[cfg(feature = "test-utils")]
mod recording_email;
mod smtp_email;

pub use console_email::ConsoleEmailProvider;
pub use email::EmailProvider;
#[cfg(feature = "test-utils")]
pub use recording_email::{RecordingEmailProvider, SentEmail};
pub use smtp_email::SmtpEmailProvider;
