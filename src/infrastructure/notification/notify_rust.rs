//! Desktop notifications through notify-rust

use std::time::Duration;

use async_trait::async_trait;
use notify_rust::{Notification, Timeout};
use tracing::debug;

use crate::application::ports::{NotificationError, NotificationIcon, Notifier};

const APP_NAME: &str = "Pasteback";

/// Informational toasts disappear quickly; warnings and errors linger.
const SHORT_TIMEOUT: Duration = Duration::from_secs(3);
const LONG_TIMEOUT: Duration = Duration::from_secs(10);

pub struct NotifyRustNotifier {
    app_name: String,
}

impl NotifyRustNotifier {
    pub fn new() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
        }
    }

    fn timeout_for(icon: NotificationIcon) -> Duration {
        match icon {
            NotificationIcon::Warning | NotificationIcon::Error => LONG_TIMEOUT,
            NotificationIcon::Info | NotificationIcon::Clipboard => SHORT_TIMEOUT,
        }
    }
}

impl Default for NotifyRustNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for NotifyRustNotifier {
    async fn notify(
        &self,
        title: &str,
        message: &str,
        icon: NotificationIcon,
    ) -> Result<(), NotificationError> {
        let mut notification = Notification::new();
        notification
            .appname(&self.app_name)
            .summary(title)
            .body(message)
            .icon(icon.icon_name())
            .timeout(Timeout::Milliseconds(
                Self::timeout_for(icon).as_millis() as u32
            ));

        debug!(%title, ?icon, "showing notification");

        // Talks to the session bus and can block
        tokio::task::spawn_blocking(move || notification.show().map(|_| ()))
            .await
            .map_err(|e| NotificationError::Unavailable(e.to_string()))?
            .map_err(|e| NotificationError::SendFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_stay_longer_than_info() {
        assert!(
            NotifyRustNotifier::timeout_for(NotificationIcon::Warning)
                > NotifyRustNotifier::timeout_for(NotificationIcon::Clipboard)
        );
        assert_eq!(
            NotifyRustNotifier::timeout_for(NotificationIcon::Error),
            LONG_TIMEOUT
        );
    }

    #[test]
    fn default_uses_product_name() {
        assert_eq!(NotifyRustNotifier::default().app_name, "Pasteback");
    }
}
