//! CLI argument definitions using Clap

use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::application::PasteConfig;
use crate::domain::hotkey::KeyCombo;
use crate::infrastructure::KeystrokeToolPreference;

/// Pasteback - clipboard history with a global hotkey and paste-back
#[derive(Parser, Debug)]
#[command(name = "pasteback")]
#[command(version)]
#[command(about = "Clipboard history daemon with global hotkeys and paste-back")]
#[command(long_about = None)]
pub struct Cli {
    /// Run the clipboard history daemon (same as `pasteback daemon`)
    #[arg(long)]
    pub daemon: bool,

    /// Clipboard polling interval in milliseconds
    #[arg(long, value_name = "MS")]
    pub poll_interval: Option<u64>,

    /// Restore the previous clipboard content after pasting
    #[arg(short = 'p', long)]
    pub preserve_clipboard: bool,

    /// Shortcut that toggles the history picker (e.g., Super+Alt+V)
    #[arg(long, value_name = "COMBO")]
    pub hotkey: Option<String>,

    /// Key simulator (enigo, none; Linux also: auto, xdotool, wtype)
    #[arg(long, value_name = "TOOL")]
    pub keystroke_tool: Option<String>,

    /// Picker command reading entries on stdin (e.g., "rofi -dmenu")
    #[arg(long, value_name = "CMD")]
    pub picker: Option<String>,

    /// Disable desktop notifications
    #[arg(long)]
    pub no_notify: bool,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Run the daemon, or send a command to a running one
    Daemon {
        #[command(subcommand)]
        action: Option<DaemonAction>,
    },
    /// List history entries, newest first
    List {
        /// Print the raw JSON summaries
        #[arg(long)]
        json: bool,
    },
    /// Paste the entry at INDEX into the previously focused application
    Paste {
        /// 0-based position in the history
        index: usize,
    },
    /// Delete the entry with the given id
    Delete {
        /// Entry id as shown by `pasteback list`
        id: String,
    },
    /// Remove every history entry
    Clear,
}

/// Daemon control actions
#[derive(Subcommand, Debug, Clone, Copy)]
pub enum DaemonAction {
    /// Show daemon status
    Status,
    /// Toggle the history picker
    Toggle,
    /// Close the picker and cancel an in-flight paste
    Dismiss,
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Optional shortcut that sends a fixed sequence of key combos
#[derive(Debug, Clone)]
pub struct SecondaryShortcut {
    pub combo: KeyCombo,
    pub keys: Vec<KeyCombo>,
    pub delay: Duration,
}

/// Parsed daemon options
#[derive(Debug, Clone)]
pub struct DaemonOptions {
    pub poll_interval: Duration,
    pub paste: PasteConfig,
    pub show_history: KeyCombo,
    pub keystroke_tool: KeystrokeToolPreference,
    pub picker_command: Option<String>,
    pub notify: bool,
    pub secondary: Option<SecondaryShortcut>,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "poll_interval_ms",
    "preserve_clipboard",
    "activation_delay_ms",
    "restore_delay_ms",
    "show_history_hotkey",
    "keystroke_tool",
    "picker_command",
    "notify",
    "secondary.enabled",
    "secondary.hotkey",
    "secondary.keys",
    "secondary.delay_ms",
];

/// Valid keystroke tool values (platform-aware)
#[cfg(target_os = "linux")]
pub const VALID_KEYSTROKE_TOOLS: &[&str] = &["enigo", "auto", "xdotool", "wtype", "none"];

#[cfg(not(target_os = "linux"))]
pub const VALID_KEYSTROKE_TOOLS: &[&str] = &["enigo", "none"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::parse_from(["pasteback"]);
        assert!(!cli.daemon);
        assert!(cli.poll_interval.is_none());
        assert!(!cli.preserve_clipboard);
        assert!(cli.hotkey.is_none());
        assert!(cli.keystroke_tool.is_none());
        assert!(cli.picker.is_none());
        assert!(!cli.no_notify);
        assert!(!cli.verbose);
        assert!(cli.command.is_none());
    }

    #[test]
    fn cli_parses_daemon_flags() {
        let cli = Cli::parse_from([
            "pasteback",
            "--daemon",
            "-p",
            "--poll-interval",
            "250",
            "--picker",
            "rofi -dmenu",
        ]);
        assert!(cli.daemon);
        assert!(cli.preserve_clipboard);
        assert_eq!(cli.poll_interval, Some(250));
        assert_eq!(cli.picker.as_deref(), Some("rofi -dmenu"));
    }

    #[test]
    fn cli_parses_bare_daemon_subcommand() {
        let cli = Cli::parse_from(["pasteback", "daemon"]);
        assert!(matches!(cli.command, Some(Commands::Daemon { action: None })));
    }

    #[test]
    fn cli_parses_daemon_toggle() {
        let cli = Cli::parse_from(["pasteback", "daemon", "toggle"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Daemon {
                action: Some(DaemonAction::Toggle)
            })
        ));
    }

    #[test]
    fn cli_parses_paste_index() {
        let cli = Cli::parse_from(["pasteback", "paste", "3"]);
        assert!(matches!(cli.command, Some(Commands::Paste { index: 3 })));
    }

    #[test]
    fn cli_rejects_negative_paste_index() {
        assert!(Cli::try_parse_from(["pasteback", "paste", "-1"]).is_err());
    }

    #[test]
    fn cli_parses_verbose_after_subcommand() {
        let cli = Cli::parse_from(["pasteback", "list", "--json", "-v"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::List { json: true })));
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["pasteback", "config", "set", "preserve_clipboard", "true"]);
        if let Some(Commands::Config {
            action: ConfigAction::Set { key, value },
        }) = cli.command
        {
            assert_eq!(key, "preserve_clipboard");
            assert_eq!(value, "true");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("poll_interval_ms"));
        assert!(is_valid_config_key("secondary.keys"));
        assert!(!is_valid_config_key("secondary"));
        assert!(!is_valid_config_key("invalid_key"));
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}
