//! No-op key simulator

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::{KeySimulator, KeySimulatorError};
use crate::domain::hotkey::KeyCombo;

/// Key simulator that sends nothing
///
/// Selected with `keystroke_tool = "none"`: chosen items are only placed
/// on the clipboard for the user to paste by hand.
pub struct NoOpKeySimulator;

impl NoOpKeySimulator {
    /// Create a new no-op key simulator
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpKeySimulator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeySimulator for NoOpKeySimulator {
    async fn press_combo(&self, combo: &KeyCombo) -> Result<(), KeySimulatorError> {
        debug!(%combo, "key simulation disabled");
        Ok(())
    }
}
