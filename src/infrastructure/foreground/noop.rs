//! Foreground tracker without window control

use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::{AppHandle, ForegroundApp, ForegroundError};

/// Records reported foreground changes but cannot switch windows.
///
/// Used where no window tool is available; the paste lands in whatever
/// window has focus once the picker closes.
pub struct NoOpForeground {
    previous: Mutex<Option<AppHandle>>,
}

impl NoOpForeground {
    pub fn new() -> Self {
        Self {
            previous: Mutex::new(None),
        }
    }
}

impl Default for NoOpForeground {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ForegroundApp for NoOpForeground {
    async fn capture_current(&self) -> Result<Option<AppHandle>, ForegroundError> {
        Ok(None)
    }

    fn remember(&self, app: AppHandle) {
        *self
            .previous
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(app);
    }

    fn previous(&self) -> Option<AppHandle> {
        self.previous
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    async fn activate(&self, app: &AppHandle) -> Result<(), ForegroundError> {
        debug!(window = %app, "window activation unsupported, leaving focus as is");
        Ok(())
    }
}
