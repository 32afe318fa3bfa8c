//! Operator notification seam: email-on-error is a side module reached through a narrow
//! interface, never a required collaborator.
//!
//! `As2Fault` outcomes and coordinator give-ups call through this trait rather than assuming an
//! SMTP client is configured; the default implementation just logs, leaving the failure
//! surfaced somewhere even without a mail transport wired in.

use as2_core::prelude::*;

pub trait Notifier: Send + Sync {
    fn notify(&self, subject: &str, body: &str);
}

/// Writes the notification through `as2_core::log` at `warn` level instead of sending it
/// anywhere; the reference implementation for deployments with no mail relay configured.
#[derive(Default)]
pub struct LoggingNotifier;

impl Notifier for LoggingNotifier {
    fn notify(&self, subject: &str, body: &str) {
        warn!("{}: {}", subject, body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_notifier_does_not_panic() {
        let n = LoggingNotifier::default();
        n.notify("test subject", "test body");
    }
}
