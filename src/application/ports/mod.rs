//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod clipboard;
pub mod config;
pub mod foreground;
pub mod history_store;
pub mod hotkey;
pub mod keystroke;
pub mod notifier;
pub mod permission;
pub mod picker;

// Re-export common types
pub use clipboard::{ClipboardError, ClipboardPort};
pub use config::ConfigStore;
pub use foreground::{AppHandle, ForegroundApp, ForegroundError};
pub use history_store::{HistoryPersistence, PersistenceError};
pub use hotkey::{HotkeyBackend, HotkeyError, HotkeyEvent};
pub use keystroke::{KeySimulator, KeySimulatorError};
pub use notifier::{NotificationError, NotificationIcon, Notifier};
pub use permission::PermissionPort;
pub use picker::{Picker, PickerError};
