//! Domain layer - Core business logic
//!
//! Contains value objects, the bounded history list and domain errors.
//! This layer has no dependencies on external systems.

pub mod clipboard;
pub mod config;
pub mod error;
pub mod history;
pub mod hotkey;

// Re-export common types
pub use clipboard::{ClipboardContent, ClipboardItem, ClipboardKind, PasteboardContents, PasteboardSnapshot};
pub use config::AppConfig;
pub use error::*;
pub use history::{HistoryList, PushOutcome, MAX_HISTORY_SIZE};
pub use hotkey::{HotkeyId, KeyCode, KeyCombo, Modifiers};
