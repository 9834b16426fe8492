//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with the OS clipboard, global shortcuts, input
//! simulation tools and the local filesystem.

pub mod clipboard;
pub mod config;
pub mod foreground;
pub mod hotkey;
pub mod keystroke;
pub mod notification;
pub mod permission;
pub mod persistence;
pub mod picker;

// Re-export adapters
pub use clipboard::ArboardClipboard;
pub use config::XdgConfigStore;
pub use foreground::{create_foreground, NoOpForeground, XdotoolForeground};
pub use hotkey::GlobalHotkeyBackend;
pub use keystroke::{create_key_simulator, KeystrokeTool, KeystrokeToolPreference};
pub use notification::{create_notifier, NotifyRustNotifier};
pub use permission::InputPermission;
pub use persistence::JsonFileHistoryStore;
pub use picker::CommandPicker;
