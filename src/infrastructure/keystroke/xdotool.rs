//! Xdotool key simulator for X11

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{KeySimulator, KeySimulatorError};
use crate::domain::hotkey::{KeyCode, KeyCombo};

/// Xdotool key simulator
///
/// Uses `xdotool key`, which works on X11 systems.
pub struct XdotoolKeySimulator;

impl XdotoolKeySimulator {
    /// Create a new xdotool key simulator
    pub fn new() -> Self {
        Self
    }
}

impl Default for XdotoolKeySimulator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeySimulator for XdotoolKeySimulator {
    async fn press_combo(&self, combo: &KeyCombo) -> Result<(), KeySimulatorError> {
        let status = Command::new("xdotool")
            .args(["key", "--clearmodifiers", &key_spec(combo)])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    KeySimulatorError::ToolNotFound("xdotool".to_string())
                } else {
                    KeySimulatorError::SimulationFailed(e.to_string())
                }
            })?;

        if !status.success() {
            return Err(KeySimulatorError::SimulationFailed(format!(
                "xdotool exited with status: {}",
                status
            )));
        }

        Ok(())
    }
}

/// X keysym name of a key
pub(super) fn keysym(key: KeyCode) -> String {
    match key {
        KeyCode::Letter(c) => c.to_ascii_lowercase().to_string(),
        KeyCode::Digit(d) => d.to_string(),
        KeyCode::Space => "space".to_string(),
        KeyCode::Enter => "Return".to_string(),
        KeyCode::Escape => "Escape".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Function(n) => format!("F{}", n),
    }
}

/// `ctrl+alt+v` style argument for `xdotool key`
fn key_spec(combo: &KeyCombo) -> String {
    let m = &combo.modifiers;
    let mut parts: Vec<String> = [
        (m.ctrl, "ctrl"),
        (m.alt, "alt"),
        (m.shift, "shift"),
        (m.meta, "super"),
    ]
    .into_iter()
    .filter_map(|(on, name)| on.then(|| name.to_string()))
    .collect();
    parts.push(keysym(combo.key));
    parts.join("+")
}
