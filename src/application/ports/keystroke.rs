//! Key simulator port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::hotkey::KeyCombo;

/// Key simulation errors
#[derive(Debug, Clone, Error)]
pub enum KeySimulatorError {
    #[error("{0} not found. Please install it or choose another keystroke_tool.")]
    ToolNotFound(String),

    #[error("Failed to simulate keys: {0}")]
    SimulationFailed(String),
}

/// Port for synthesizing key events into the focused application
#[async_trait]
pub trait KeySimulator: Send + Sync {
    /// Press and release a key combo.
    async fn press_combo(&self, combo: &KeyCombo) -> Result<(), KeySimulatorError>;

    /// Send the platform's standard paste combo.
    async fn simulate_paste(&self) -> Result<(), KeySimulatorError> {
        self.press_combo(&KeyCombo::paste()).await
    }
}

/// Blanket implementation for boxed simulator types
#[async_trait]
impl KeySimulator for Box<dyn KeySimulator> {
    async fn press_combo(&self, combo: &KeyCombo) -> Result<(), KeySimulatorError> {
        self.as_ref().press_combo(combo).await
    }

    async fn simulate_paste(&self) -> Result<(), KeySimulatorError> {
        self.as_ref().simulate_paste().await
    }
}
