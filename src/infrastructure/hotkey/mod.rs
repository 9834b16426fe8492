//! Global hotkey adapters

mod global;

pub use global::GlobalHotkeyBackend;
