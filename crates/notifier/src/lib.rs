//! Chat notification delivery.
//!
//! Delivery is best-effort: a single attempt per message, failures are logged
//! and swallowed so they never abort a poll cycle.

pub mod telegram;

use std::future::Future;

pub use telegram::TelegramNotifier;

/// Errors raised while delivering a message. They never leave this crate
/// through [`Notifier::send`].
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Chat API rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Something that can deliver a text message to the configured chat.
pub trait Notifier {
    /// Deliver `message`. Errors are handled internally.
    fn send(&self, message: &str) -> impl Future<Output = ()> + Send;
}
