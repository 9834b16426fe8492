//! OS global-hotkey port

use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::hotkey::{HotkeyId, KeyCombo};

/// A pressed global shortcut, already mapped to its binding id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotkeyEvent {
    pub id: HotkeyId,
}

/// Hotkey errors
#[derive(Debug, Clone, Error)]
pub enum HotkeyError {
    #[error("Global hotkeys unavailable: {0}")]
    Unavailable(String),

    #[error("Hotkey {combo} was refused: {reason}")]
    Refused { combo: String, reason: String },

    #[error("Hotkey {combo} is not supported by the backend")]
    Unsupported { combo: String },

    #[error("Failed to start hotkey listener: {0}")]
    ListenerFailed(String),
}

/// Port to the OS shortcut facility.
///
/// Not `Send`: some platforms require the grabbing thread to own it.
pub trait HotkeyBackend {
    /// Claim `combo` system-wide for binding `id`.
    fn grab(&mut self, id: HotkeyId, combo: &KeyCombo) -> Result<(), HotkeyError>;

    /// Give up the shortcut held for `id`.
    fn release(&mut self, id: HotkeyId) -> Result<(), HotkeyError>;

    /// Start delivering events for grabbed shortcuts into `events`.
    fn install_listener(
        &mut self,
        events: mpsc::UnboundedSender<HotkeyEvent>,
    ) -> Result<(), HotkeyError>;

    /// Stop delivering events.
    fn remove_listener(&mut self);
}
