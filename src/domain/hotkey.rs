//! Hotkey value objects: binding ids, modifiers, keys and key combos

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::KeyComboParseError;

/// Identifier of a hotkey binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HotkeyId(u32);

impl HotkeyId {
    /// Always-on shortcut that toggles the history picker
    pub const SHOW_HISTORY: HotkeyId = HotkeyId(1);
    /// Optional secondary shortcut enabled from configuration
    pub const SECONDARY: HotkeyId = HotkeyId(2);

    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for HotkeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Modifier set of a key combo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    /// Command on macOS, Windows/Super key elsewhere
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub fn is_empty(&self) -> bool {
        !(self.ctrl || self.alt || self.shift || self.meta)
    }
}

/// Non-modifier key of a combo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// ASCII letter, stored upper-case
    Letter(char),
    /// Top-row digit 0-9
    Digit(u8),
    Space,
    Enter,
    Escape,
    Tab,
    /// Function key F1-F12
    Function(u8),
}

impl KeyCode {
    fn parse(token: &str) -> Option<Self> {
        let upper = token.to_ascii_uppercase();
        let mut chars = upper.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_alphabetic() {
                return Some(Self::Letter(c));
            }
            if let Some(d) = c.to_digit(10) {
                return Some(Self::Digit(d as u8));
            }
            return None;
        }

        match upper.as_str() {
            "SPACE" => Some(Self::Space),
            "ENTER" | "RETURN" => Some(Self::Enter),
            "ESC" | "ESCAPE" => Some(Self::Escape),
            "TAB" => Some(Self::Tab),
            _ => upper
                .strip_prefix('F')
                .and_then(|n| n.parse::<u8>().ok())
                .filter(|n| (1..=12).contains(n))
                .map(Self::Function),
        }
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Letter(c) => write!(f, "{}", c),
            Self::Digit(d) => write!(f, "{}", d),
            Self::Space => write!(f, "Space"),
            Self::Enter => write!(f, "Enter"),
            Self::Escape => write!(f, "Escape"),
            Self::Tab => write!(f, "Tab"),
            Self::Function(n) => write!(f, "F{}", n),
        }
    }
}

/// A key plus its modifiers, e.g. `Super+Alt+V`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub modifiers: Modifiers,
    pub key: KeyCode,
}

impl KeyCombo {
    pub const fn new(modifiers: Modifiers, key: KeyCode) -> Self {
        Self { modifiers, key }
    }

    /// Default combo for the show-history shortcut
    pub const fn default_show_history() -> Self {
        Self::new(
            Modifiers {
                ctrl: false,
                alt: true,
                shift: false,
                meta: true,
            },
            KeyCode::Letter('V'),
        )
    }

    /// Default combo for the secondary shortcut
    pub const fn default_secondary() -> Self {
        Self::new(
            Modifiers {
                ctrl: false,
                alt: true,
                shift: false,
                meta: false,
            },
            KeyCode::Letter('V'),
        )
    }

    /// The platform's standard paste combo
    pub const fn paste() -> Self {
        let modifiers = if cfg!(target_os = "macos") {
            Modifiers {
                ctrl: false,
                alt: false,
                shift: false,
                meta: true,
            }
        } else {
            Modifiers {
                ctrl: true,
                alt: false,
                shift: false,
                meta: false,
            }
        };
        Self::new(modifiers, KeyCode::Letter('V'))
    }
}

impl FromStr for KeyCombo {
    type Err = KeyComboParseError;

    /// Parse `Modifier+...+Key`. Modifiers: ctrl/control, alt/option,
    /// shift, super/cmd/command/meta/win. Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || KeyComboParseError {
            input: s.to_string(),
        };

        let tokens: Vec<&str> = s.split('+').map(str::trim).collect();
        let (key_token, modifier_tokens) = tokens.split_last().ok_or_else(err)?;

        let mut modifiers = Modifiers::NONE;
        for token in modifier_tokens {
            match token.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers.ctrl = true,
                "alt" | "option" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                "super" | "cmd" | "command" | "meta" | "win" => modifiers.meta = true,
                _ => return Err(err()),
            }
        }

        let key = KeyCode::parse(key_token).ok_or_else(err)?;
        Ok(Self { modifiers, key })
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.modifiers;
        if m.ctrl {
            write!(f, "Ctrl+")?;
        }
        if m.alt {
            write!(f, "Alt+")?;
        }
        if m.shift {
            write!(f, "Shift+")?;
        }
        if m.meta {
            write!(f, "Super+")?;
        }
        write!(f, "{}", self.key)
    }
}
