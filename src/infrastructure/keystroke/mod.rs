//! Keystroke infrastructure module
//!
//! Provides cross-platform key simulation using enigo (primary)
//! or command-line tools as alternatives on Linux.

mod enigo;
mod factory;
mod noop;
mod wtype;
mod xdotool;

pub use self::enigo::EnigoKeySimulator;
pub use factory::{
    create_key_simulator, detect_keystroke_tool, is_tool_available, KeystrokeTool,
    KeystrokeToolPreference, ParseKeystrokeToolError,
};
pub use noop::NoOpKeySimulator;
pub use wtype::WtypeKeySimulator;
pub use xdotool::XdotoolKeySimulator;
