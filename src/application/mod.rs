//! Application layer - Use cases and port interfaces
//!
//! Contains the core business operations and trait definitions
//! for external system interactions.

pub mod history;
pub mod hotkeys;
pub mod monitor;
pub mod paste;
pub mod ports;
pub mod session;

// Re-export use cases
pub use history::{HistoryCallbacks, HistoryStore, SharedHistory};
pub use hotkeys::{HotkeyCallback, HotkeyRegistry};
pub use monitor::{ChangeSuppressor, ClipboardMonitor, TickOutcome};
pub use paste::{CancelToken, PasteConfig, PasteError, PasteOrchestrator, PasteOutcome};
pub use session::{PasteSession, PickResult, SessionState};
