//! Application configuration value object

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::hotkey::KeyCombo;

/// Default clipboard polling period
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
/// Default wait between focus restore and the paste keystroke
pub const DEFAULT_ACTIVATION_DELAY_MS: u64 = 100;
/// Default wait between the paste keystroke and clipboard restore
pub const DEFAULT_RESTORE_DELAY_MS: u64 = 300;
/// Default wait between the combos of the secondary shortcut
pub const DEFAULT_SECONDARY_DELAY_MS: u64 = 200;
/// Default key simulator
pub const DEFAULT_KEYSTROKE_TOOL: &str = "enigo";

/// Secondary shortcut configuration (hotkey id 2).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecondaryConfig {
    pub enabled: Option<bool>,
    pub hotkey: Option<String>,
    pub keys: Option<Vec<String>>,
    pub delay_ms: Option<u64>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub poll_interval_ms: Option<u64>,
    pub preserve_clipboard: Option<bool>,
    pub activation_delay_ms: Option<u64>,
    pub restore_delay_ms: Option<u64>,
    pub show_history_hotkey: Option<String>,
    pub keystroke_tool: Option<String>,
    pub picker_command: Option<String>,
    pub notify: Option<bool>,
    pub secondary: Option<SecondaryConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            poll_interval_ms: Some(DEFAULT_POLL_INTERVAL_MS),
            preserve_clipboard: Some(false),
            activation_delay_ms: Some(DEFAULT_ACTIVATION_DELAY_MS),
            restore_delay_ms: Some(DEFAULT_RESTORE_DELAY_MS),
            show_history_hotkey: Some(KeyCombo::default_show_history().to_string()),
            keystroke_tool: Some(DEFAULT_KEYSTROKE_TOOL.to_string()),
            picker_command: None,
            notify: Some(true),
            secondary: Some(SecondaryConfig {
                enabled: Some(false),
                hotkey: Some(KeyCombo::default_secondary().to_string()),
                keys: Some(default_secondary_keys()),
                delay_ms: Some(DEFAULT_SECONDARY_DELAY_MS),
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            poll_interval_ms: other.poll_interval_ms.or(self.poll_interval_ms),
            preserve_clipboard: other.preserve_clipboard.or(self.preserve_clipboard),
            activation_delay_ms: other.activation_delay_ms.or(self.activation_delay_ms),
            restore_delay_ms: other.restore_delay_ms.or(self.restore_delay_ms),
            show_history_hotkey: other.show_history_hotkey.or(self.show_history_hotkey),
            keystroke_tool: other.keystroke_tool.or(self.keystroke_tool),
            picker_command: other.picker_command.or(self.picker_command),
            notify: other.notify.or(self.notify),
            secondary: Self::merge_secondary(self.secondary, other.secondary),
        }
    }

    fn merge_secondary(
        base: Option<SecondaryConfig>,
        other: Option<SecondaryConfig>,
    ) -> Option<SecondaryConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(SecondaryConfig {
                enabled: o.enabled.or(b.enabled),
                hotkey: o.hotkey.or(b.hotkey),
                keys: o.keys.or(b.keys),
                delay_ms: o.delay_ms.or(b.delay_ms),
            }),
        }
    }

    /// Polling period; zero is treated as unset
    pub fn poll_interval_or_default(&self) -> Duration {
        Duration::from_millis(
            self.poll_interval_ms
                .filter(|ms| *ms > 0)
                .unwrap_or(DEFAULT_POLL_INTERVAL_MS),
        )
    }

    pub fn preserve_clipboard_or_default(&self) -> bool {
        self.preserve_clipboard.unwrap_or(false)
    }

    pub fn activation_delay_or_default(&self) -> Duration {
        Duration::from_millis(self.activation_delay_ms.unwrap_or(DEFAULT_ACTIVATION_DELAY_MS))
    }

    pub fn restore_delay_or_default(&self) -> Duration {
        Duration::from_millis(self.restore_delay_ms.unwrap_or(DEFAULT_RESTORE_DELAY_MS))
    }

    /// Show-history combo, or the default if not set/invalid
    pub fn show_history_hotkey_or_default(&self) -> KeyCombo {
        self.show_history_hotkey
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(KeyCombo::default_show_history)
    }

    pub fn keystroke_tool_or_default(&self) -> &str {
        self.keystroke_tool
            .as_deref()
            .unwrap_or(DEFAULT_KEYSTROKE_TOOL)
    }

    /// Picker command, if a non-blank one is configured
    pub fn picker_command(&self) -> Option<&str> {
        self.picker_command
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn notify_or_default(&self) -> bool {
        self.notify.unwrap_or(true)
    }

    pub fn secondary_enabled_or_default(&self) -> bool {
        self.secondary
            .as_ref()
            .and_then(|s| s.enabled)
            .unwrap_or(false)
    }

    pub fn secondary_hotkey_or_default(&self) -> KeyCombo {
        self.secondary
            .as_ref()
            .and_then(|s| s.hotkey.as_ref())
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(KeyCombo::default_secondary)
    }

    /// Combos sent by the secondary shortcut. Unparseable entries are dropped.
    pub fn secondary_keys_or_default(&self) -> Vec<KeyCombo> {
        let raw = self
            .secondary
            .as_ref()
            .and_then(|s| s.keys.clone())
            .unwrap_or_else(default_secondary_keys);
        raw.iter().filter_map(|s| s.parse().ok()).collect()
    }

    pub fn secondary_delay_or_default(&self) -> Duration {
        Duration::from_millis(
            self.secondary
                .as_ref()
                .and_then(|s| s.delay_ms)
                .unwrap_or(DEFAULT_SECONDARY_DELAY_MS),
        )
    }
}

fn default_secondary_keys() -> Vec<String> {
    vec!["Super+Space".to_string(), "Super+4".to_string()]
}
