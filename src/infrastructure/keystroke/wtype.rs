//! Wtype key simulator for Wayland

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{KeySimulator, KeySimulatorError};
use crate::domain::hotkey::KeyCombo;

use super::xdotool::keysym;

/// Wtype key simulator
///
/// Uses wtype, which talks to the compositor's virtual keyboard protocol.
pub struct WtypeKeySimulator;

impl WtypeKeySimulator {
    /// Create a new wtype key simulator
    pub fn new() -> Self {
        Self
    }
}

impl Default for WtypeKeySimulator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeySimulator for WtypeKeySimulator {
    async fn press_combo(&self, combo: &KeyCombo) -> Result<(), KeySimulatorError> {
        let status = Command::new("wtype")
            .args(combo_args(combo))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    KeySimulatorError::ToolNotFound("wtype".to_string())
                } else {
                    KeySimulatorError::SimulationFailed(e.to_string())
                }
            })?;

        if !status.success() {
            return Err(KeySimulatorError::SimulationFailed(format!(
                "wtype exited with status: {}",
                status
            )));
        }

        Ok(())
    }
}

/// `-M mod ... -k key -m mod ...`: press modifiers, tap key, release in reverse
fn combo_args(combo: &KeyCombo) -> Vec<String> {
    let m = &combo.modifiers;
    let modifiers: Vec<&str> = [
        (m.ctrl, "ctrl"),
        (m.alt, "alt"),
        (m.shift, "shift"),
        (m.meta, "logo"),
    ]
    .into_iter()
    .filter_map(|(on, name)| on.then_some(name))
    .collect();

    let mut args = Vec::new();
    for name in &modifiers {
        args.push("-M".to_string());
        args.push(name.to_string());
    }
    args.push("-k".to_string());
    args.push(keysym(combo.key));
    for name in modifiers.iter().rev() {
        args.push("-m".to_string());
        args.push(name.to_string());
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paste_combo_args() {
        let args = combo_args(&"Ctrl+V".parse().unwrap());
        assert_eq!(args, vec!["-M", "ctrl", "-k", "v", "-m", "ctrl"]);
    }

    #[test]
    fn modifiers_released_in_reverse() {
        let args = combo_args(&"Ctrl+Super+4".parse().unwrap());
        assert_eq!(
            args,
            vec!["-M", "ctrl", "-M", "logo", "-k", "4", "-m", "logo", "-m", "ctrl"]
        );
    }
}
