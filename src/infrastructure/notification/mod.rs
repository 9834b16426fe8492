//! Notification infrastructure module
//!
//! Desktop notifications through notify-rust, or none at all when
//! notifications are turned off.

mod notify_rust;

use async_trait::async_trait;

pub use self::notify_rust::NotifyRustNotifier;

use crate::application::ports::{NotificationError, NotificationIcon, Notifier};

/// Notifier that drops every message
pub struct SilentNotifier;

#[async_trait]
impl Notifier for SilentNotifier {
    async fn notify(
        &self,
        _title: &str,
        _message: &str,
        _icon: NotificationIcon,
    ) -> Result<(), NotificationError> {
        Ok(())
    }
}

/// Create the notifier for the `notify` setting
pub fn create_notifier(enabled: bool) -> Box<dyn Notifier> {
    if enabled {
        Box::new(NotifyRustNotifier::new())
    } else {
        Box::new(SilentNotifier)
    }
}
