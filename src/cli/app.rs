//! Shared runner plumbing: exit codes, logging and config resolution

use tracing_subscriber::EnvFilter;

use crate::application::ports::ConfigStore;
use crate::application::PasteConfig;
use crate::domain::config::AppConfig;
use crate::infrastructure::{KeystrokeToolPreference, XdgConfigStore};

use super::args::{Cli, DaemonOptions, SecondaryShortcut};

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

const DEFAULT_LOG_FILTER: &str = "pasteback=info";
const VERBOSE_LOG_FILTER: &str = "pasteback=debug";

/// Install the global tracing subscriber (stderr).
///
/// `RUST_LOG` wins unless `--verbose` was given.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_LOG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Config fragment holding only what was given on the command line
pub fn cli_overrides(cli: &Cli) -> AppConfig {
    AppConfig {
        poll_interval_ms: cli.poll_interval,
        preserve_clipboard: cli.preserve_clipboard.then_some(true),
        show_history_hotkey: cli.hotkey.clone(),
        keystroke_tool: cli.keystroke_tool.clone(),
        picker_command: cli.picker.clone(),
        notify: cli.no_notify.then_some(false),
        ..Default::default()
    }
}

/// Load and merge configuration: defaults < file < CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    store.load_merged().await.merge(cli_config)
}

/// Validate the merged config and resolve it into daemon options
pub fn daemon_options(config: &AppConfig) -> Result<DaemonOptions, String> {
    if let Some(combo) = config.show_history_hotkey.as_deref() {
        combo.parse::<crate::domain::hotkey::KeyCombo>().map_err(|e| e.to_string())?;
    }

    let keystroke_tool = config
        .keystroke_tool_or_default()
        .parse::<KeystrokeToolPreference>()
        .map_err(|e| e.to_string())?;

    let secondary = config.secondary_enabled_or_default().then(|| SecondaryShortcut {
        combo: config.secondary_hotkey_or_default(),
        keys: config.secondary_keys_or_default(),
        delay: config.secondary_delay_or_default(),
    });

    Ok(DaemonOptions {
        poll_interval: config.poll_interval_or_default(),
        paste: PasteConfig::from(config),
        show_history: config.show_history_hotkey_or_default(),
        keystroke_tool,
        picker_command: config.picker_command().map(str::to_string),
        notify: config.notify_or_default(),
        secondary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::time::Duration;

    #[test]
    fn overrides_only_carry_given_flags() {
        let cli = Cli::parse_from(["pasteback", "--daemon"]);
        let overrides = cli_overrides(&cli);

        assert!(overrides.preserve_clipboard.is_none());
        assert!(overrides.notify.is_none());
        assert!(overrides.poll_interval_ms.is_none());
    }

    #[test]
    fn cli_flags_win_over_file() {
        let file = AppConfig {
            preserve_clipboard: Some(false),
            notify: Some(true),
            poll_interval_ms: Some(1000),
            ..Default::default()
        };
        let cli = Cli::parse_from(["pasteback", "-p", "--no-notify", "--poll-interval", "200"]);

        let merged = AppConfig::defaults().merge(file).merge(cli_overrides(&cli));

        assert!(merged.preserve_clipboard_or_default());
        assert!(!merged.notify_or_default());
        assert_eq!(merged.poll_interval_or_default(), Duration::from_millis(200));
    }

    #[test]
    fn default_options() {
        let options = daemon_options(&AppConfig::defaults()).unwrap();

        assert_eq!(options.poll_interval, Duration::from_millis(500));
        assert_eq!(options.show_history.to_string(), "Alt+Super+V");
        assert_eq!(options.keystroke_tool, KeystrokeToolPreference::Enigo);
        assert!(options.picker_command.is_none());
        assert!(options.secondary.is_none());
        assert!(!options.paste.preserve_clipboard);
    }

    #[test]
    fn invalid_hotkey_is_rejected() {
        let config = AppConfig {
            show_history_hotkey: Some("Hyper+V".into()),
            ..AppConfig::defaults()
        };
        assert!(daemon_options(&config).is_err());
    }

    #[test]
    fn invalid_keystroke_tool_is_rejected() {
        let config = AppConfig {
            keystroke_tool: Some("ydotool".into()),
            ..AppConfig::defaults()
        };
        assert!(daemon_options(&config).is_err());
    }

    #[test]
    fn enabled_secondary_shortcut_is_resolved() {
        let mut config = AppConfig::defaults();
        if let Some(secondary) = config.secondary.as_mut() {
            secondary.enabled = Some(true);
        }

        let secondary = daemon_options(&config).unwrap().secondary.unwrap();

        assert_eq!(secondary.combo.to_string(), "Alt+V");
        assert_eq!(secondary.keys.len(), 2);
        assert_eq!(secondary.delay, Duration::from_millis(200));
    }
}
