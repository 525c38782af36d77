//! Notification delivery
//!
//! The [`Notifier`] capability receives the non-empty list of transitions
//! found in one cycle. [`format`] renders them into a message and
//! [`ResendNotifier`] delivers that message by e-mail.

pub mod format;
pub mod resend;

pub use format::{render, test_transition, Notification};
pub use resend::ResendNotifier;

use async_trait::async_trait;
use ytpm_common::{Result, Transition};

/// Sink for detected transitions
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Notifier name for logging
    fn name(&self) -> &'static str;

    /// Deliver one notification covering `transitions`
    async fn notify(&self, transitions: &[Transition]) -> Result<()>;
}
