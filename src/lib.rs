//! Pasteback - clipboard history daemon
//!
//! Watches the system clipboard, keeps a bounded history of what was
//! copied, and pastes a chosen entry back into the application that had
//! focus when the history was opened.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Clipboard items, the bounded history list, key combos and config
//! - **Application**: Use cases (history, monitor, hotkeys, paste) and port traits
//! - **Infrastructure**: Adapters (arboard, enigo, global-hotkey, xdotool, JSON file, ...)
//! - **CLI**: Argument parsing, the daemon loop, IPC and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
