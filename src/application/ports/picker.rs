//! History picker port (external UI)

use async_trait::async_trait;
use thiserror::Error;

/// Picker errors
#[derive(Debug, Clone, Error)]
pub enum PickerError {
    #[error("Failed to launch picker: {0}")]
    LaunchFailed(String),

    #[error("Picker I/O failed: {0}")]
    Io(String),
}

/// Port for letting the user choose one history entry
#[async_trait]
pub trait Picker: Send + Sync {
    /// Present `entries` (newest first) and return the chosen index,
    /// or `None` when the user dismissed the picker.
    async fn pick(&self, entries: Vec<String>) -> Result<Option<usize>, PickerError>;
}
