//! Cross-platform key simulator using enigo
//!
//! Works on Windows, macOS, and Linux (X11/Wayland).

use async_trait::async_trait;
use enigo::{Direction, Enigo, Key, Keyboard, Settings};

use crate::application::ports::{KeySimulator, KeySimulatorError};
use crate::domain::hotkey::{KeyCode, KeyCombo};

/// Cross-platform key simulator using enigo
pub struct EnigoKeySimulator;

impl EnigoKeySimulator {
    /// Create a new enigo key simulator
    pub fn new() -> Self {
        Self
    }

    /// Whether the input backend can be opened at all
    pub fn probe() -> bool {
        Enigo::new(&Settings::default()).is_ok()
    }
}

impl Default for EnigoKeySimulator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeySimulator for EnigoKeySimulator {
    async fn press_combo(&self, combo: &KeyCombo) -> Result<(), KeySimulatorError> {
        let combo = *combo;

        // enigo operations are blocking, so run in spawn_blocking
        tokio::task::spawn_blocking(move || {
            let mut enigo = Enigo::new(&Settings::default()).map_err(|e| {
                KeySimulatorError::SimulationFailed(format!("Failed to create enigo: {}", e))
            })?;

            let modifiers = modifier_keys(&combo);
            let mut pressed = Vec::with_capacity(modifiers.len());
            let mut result = Ok(());
            for key in modifiers {
                if let Err(e) = enigo.key(key, Direction::Press) {
                    result = Err(e);
                    break;
                }
                pressed.push(key);
            }
            if result.is_ok() {
                result = enigo.key(enigo_key(combo.key), Direction::Click);
            }

            // Release whatever was pressed even if the click failed
            for key in pressed.into_iter().rev() {
                let _ = enigo.key(key, Direction::Release);
            }

            result.map_err(|e| {
                KeySimulatorError::SimulationFailed(format!("Failed to press {}: {}", combo, e))
            })
        })
        .await
        .map_err(|e| KeySimulatorError::SimulationFailed(format!("Task join error: {}", e)))?
    }
}

fn modifier_keys(combo: &KeyCombo) -> Vec<Key> {
    let m = &combo.modifiers;
    [
        (m.ctrl, Key::Control),
        (m.alt, Key::Alt),
        (m.shift, Key::Shift),
        (m.meta, Key::Meta),
    ]
    .into_iter()
    .filter_map(|(on, key)| on.then_some(key))
    .collect()
}

fn enigo_key(code: KeyCode) -> Key {
    match code {
        KeyCode::Letter(c) => Key::Unicode(c.to_ascii_lowercase()),
        KeyCode::Digit(d) => Key::Unicode(char::from(b'0' + d)),
        KeyCode::Space => Key::Space,
        KeyCode::Enter => Key::Return,
        KeyCode::Escape => Key::Escape,
        KeyCode::Tab => Key::Tab,
        KeyCode::Function(n) => match n {
            1 => Key::F1,
            2 => Key::F2,
            3 => Key::F3,
            4 => Key::F4,
            5 => Key::F5,
            6 => Key::F6,
            7 => Key::F7,
            8 => Key::F8,
            9 => Key::F9,
            10 => Key::F10,
            11 => Key::F11,
            _ => Key::F12,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulator_creates_successfully() {
        let _simulator = EnigoKeySimulator::new();
    }

    #[test]
    fn modifiers_map_in_press_order() {
        let combo: KeyCombo = "Super+Shift+Ctrl+V".parse().unwrap();
        assert_eq!(
            modifier_keys(&combo),
            vec![Key::Control, Key::Shift, Key::Meta]
        );
    }

    #[test]
    fn keys_map_to_enigo() {
        assert_eq!(enigo_key(KeyCode::Letter('V')), Key::Unicode('v'));
        assert_eq!(enigo_key(KeyCode::Digit(4)), Key::Unicode('4'));
        assert_eq!(enigo_key(KeyCode::Function(5)), Key::F5);
        assert_eq!(enigo_key(KeyCode::Space), Key::Space);
    }
}
