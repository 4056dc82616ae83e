use std::time::Duration;

use notify_rust::{Notification, Timeout};
use tracing::debug;

use super::Notifier;
use crate::error::EffectError;

const APP_NAME: &str = "pomowall";

/// Desktop toasts through the platform notification service.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    timeout: Duration,
}

impl DesktopNotifier {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, message: &str) -> Result<(), EffectError> {
        debug!(title, "showing notification");
        let millis = u32::try_from(self.timeout.as_millis()).unwrap_or(u32::MAX);
        Notification::new()
            .summary(title)
            .body(message)
            .appname(APP_NAME)
            .timeout(Timeout::Milliseconds(millis))
            .show()?;
        Ok(())
    }
}
