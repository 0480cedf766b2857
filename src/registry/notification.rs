//! On-screen notification seam.
//!
//! The registry announces activations through a [`NotificationSink`]. The
//! host swaps in whatever draws text on screen; the default only logs.

use std::time::Duration;
use tracing::info;

/// Screen position of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    UpperLeft,
    UpperCenter,
    UpperRight,
    LowerCenter,
}

/// Fire-and-forget user notification.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationSink {
    /// Shows `message` for `duration`. Failures to display are the sink's
    /// problem and never reach the caller.
    fn post(&self, message: &str, duration: Duration, placement: Placement);
}

/// Sink that writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn post(&self, message: &str, duration: Duration, placement: Placement) {
        info!(
            target: "flybywire::notification",
            ?placement,
            seconds = duration.as_secs_f32(),
            "{}",
            message
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_notifier_does_not_panic() {
        TracingNotifier.post("CONTROLLER: test", Duration::from_secs(1), Placement::UpperCenter);
    }

    #[test]
    fn test_mock_records_arguments() {
        let mut mock = MockNotificationSink::new();
        mock.expect_post()
            .withf(|message, duration, placement| {
                message == "hello" && *duration == Duration::from_millis(500) && *placement == Placement::LowerCenter
            })
            .times(1)
            .return_const(());

        mock.post("hello", Duration::from_millis(500), Placement::LowerCenter);
    }
}
