//! Key simulator factory with automatic detection

use std::fmt;
use std::str::FromStr;

#[cfg(target_os = "linux")]
use std::env;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::application::ports::{KeySimulator, KeySimulatorError};

use super::enigo::EnigoKeySimulator;
use super::noop::NoOpKeySimulator;
#[cfg(target_os = "linux")]
use super::wtype::WtypeKeySimulator;
#[cfg(target_os = "linux")]
use super::xdotool::XdotoolKeySimulator;

/// Available key simulators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeystrokeTool {
    /// Cross-platform enigo library
    Enigo,
    /// Linux: wtype (Wayland native)
    Wtype,
    /// Linux: xdotool (X11)
    Xdotool,
    /// Key simulation disabled
    None,
}

/// User preference for key simulator selection.
///
/// - All platforms support `Enigo` (the default) and `None`.
/// - Linux additionally supports `Auto`, `Xdotool`, and `Wtype`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeystrokeToolPreference {
    /// Use cross-platform enigo library (default on all platforms)
    #[default]
    Enigo,
    /// Never send keys; items are only copied
    None,
    /// Auto-detect best native tool (Linux only)
    #[cfg(target_os = "linux")]
    Auto,
    /// Use xdotool (Linux only, X11)
    #[cfg(target_os = "linux")]
    Xdotool,
    /// Use wtype (Linux only, Wayland native)
    #[cfg(target_os = "linux")]
    Wtype,
}

impl fmt::Display for KeystrokeToolPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeystrokeToolPreference::Enigo => write!(f, "enigo"),
            KeystrokeToolPreference::None => write!(f, "none"),
            #[cfg(target_os = "linux")]
            KeystrokeToolPreference::Auto => write!(f, "auto"),
            #[cfg(target_os = "linux")]
            KeystrokeToolPreference::Xdotool => write!(f, "xdotool"),
            #[cfg(target_os = "linux")]
            KeystrokeToolPreference::Wtype => write!(f, "wtype"),
        }
    }
}

/// Error type for parsing keystroke tool preference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKeystrokeToolError {
    pub value: String,
    pub valid_options: &'static str,
}

impl fmt::Display for ParseKeystrokeToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid keystroke tool '{}'. Valid options: {}",
            self.value, self.valid_options
        )
    }
}

impl std::error::Error for ParseKeystrokeToolError {}

impl FromStr for KeystrokeToolPreference {
    type Err = ParseKeystrokeToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "enigo" => Ok(KeystrokeToolPreference::Enigo),
            "none" => Ok(KeystrokeToolPreference::None),
            #[cfg(target_os = "linux")]
            "auto" => Ok(KeystrokeToolPreference::Auto),
            #[cfg(target_os = "linux")]
            "xdotool" => Ok(KeystrokeToolPreference::Xdotool),
            #[cfg(target_os = "linux")]
            "wtype" => Ok(KeystrokeToolPreference::Wtype),
            _ => Err(ParseKeystrokeToolError {
                value: s.to_string(),
                #[cfg(target_os = "linux")]
                valid_options: "enigo, auto, xdotool, wtype, none",
                #[cfg(not(target_os = "linux"))]
                valid_options: "enigo, none",
            }),
        }
    }
}

impl fmt::Display for KeystrokeTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeystrokeTool::Enigo => write!(f, "enigo"),
            KeystrokeTool::Wtype => write!(f, "wtype"),
            KeystrokeTool::Xdotool => write!(f, "xdotool"),
            KeystrokeTool::None => write!(f, "none"),
        }
    }
}

/// Check if a tool binary is available using `which`
pub async fn is_tool_available(tool: &str) -> bool {
    Command::new("which")
        .arg(tool)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Detect the best available key simulator
///
/// On Windows/macOS: Always uses Enigo
/// On Linux: wtype under Wayland, then xdotool, then Enigo
pub async fn detect_keystroke_tool() -> KeystrokeTool {
    #[cfg(not(target_os = "linux"))]
    {
        return KeystrokeTool::Enigo;
    }

    #[cfg(target_os = "linux")]
    {
        let wayland = env::var_os("WAYLAND_DISPLAY").is_some();
        if wayland && is_tool_available("wtype").await {
            return KeystrokeTool::Wtype;
        }

        if is_tool_available("xdotool").await {
            return KeystrokeTool::Xdotool;
        }

        KeystrokeTool::Enigo
    }
}

/// Create a key simulator using the specified preference.
///
/// Returns the adapter and the selected tool, or an error if the preferred
/// tool is missing.
pub async fn create_key_simulator(
    preference: KeystrokeToolPreference,
) -> Result<(Box<dyn KeySimulator>, KeystrokeTool), KeySimulatorError> {
    let tool = match preference {
        KeystrokeToolPreference::Enigo => KeystrokeTool::Enigo,
        KeystrokeToolPreference::None => KeystrokeTool::None,
        #[cfg(target_os = "linux")]
        KeystrokeToolPreference::Auto => detect_keystroke_tool().await,
        #[cfg(target_os = "linux")]
        KeystrokeToolPreference::Xdotool => require("xdotool", KeystrokeTool::Xdotool).await?,
        #[cfg(target_os = "linux")]
        KeystrokeToolPreference::Wtype => require("wtype", KeystrokeTool::Wtype).await?,
    };

    debug!(%tool, "selected key simulator");
    Ok((create_specific_tool(tool), tool))
}

#[cfg(target_os = "linux")]
async fn require(binary: &str, tool: KeystrokeTool) -> Result<KeystrokeTool, KeySimulatorError> {
    if is_tool_available(binary).await {
        Ok(tool)
    } else {
        Err(KeySimulatorError::ToolNotFound(binary.to_string()))
    }
}

/// Create a specific key simulator
fn create_specific_tool(tool: KeystrokeTool) -> Box<dyn KeySimulator> {
    match tool {
        KeystrokeTool::Enigo => Box::new(EnigoKeySimulator::new()),
        KeystrokeTool::None => Box::new(NoOpKeySimulator::new()),
        #[cfg(target_os = "linux")]
        KeystrokeTool::Wtype => Box::new(WtypeKeySimulator::new()),
        #[cfg(target_os = "linux")]
        KeystrokeTool::Xdotool => Box::new(XdotoolKeySimulator::new()),
        #[cfg(not(target_os = "linux"))]
        KeystrokeTool::Wtype | KeystrokeTool::Xdotool => Box::new(EnigoKeySimulator::new()),
    }
}
