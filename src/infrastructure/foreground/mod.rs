//! Foreground application tracking adapters

mod noop;
mod xdotool;

use tracing::debug;

pub use noop::NoOpForeground;
pub use xdotool::XdotoolForeground;

use crate::application::ports::ForegroundApp;

use super::keystroke::is_tool_available;

/// Create the foreground tracker for the current session.
///
/// X11 sessions with xdotool installed get real window activation.
pub async fn create_foreground() -> Box<dyn ForegroundApp> {
    let has_x11 = std::env::var_os("DISPLAY").is_some();
    if cfg!(target_os = "linux") && has_x11 && is_tool_available("xdotool").await {
        debug!("using xdotool for foreground tracking");
        return Box::new(XdotoolForeground::new());
    }

    debug!("foreground activation unavailable");
    Box::new(NoOpForeground::new())
}
