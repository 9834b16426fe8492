//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, SecondaryConfig};
use crate::domain::error::ConfigError;
use crate::domain::hotkey::KeyCombo;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS, VALID_KEYSTROKE_TOOLS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    ensure_valid_key(key)?;

    let mut config = store.load().await?;
    apply_value(&mut config, key, value)?;

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    ensure_valid_key(key)?;

    let config = store.load().await?;
    presenter.output(&read_value(&config, key).unwrap_or_else(|| NOT_SET.to_string()));

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        let value = read_value(&config, key).unwrap_or_else(|| NOT_SET.to_string());
        presenter.key_value(key, &value);
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn ensure_valid_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

/// Validate `value` for `key` and store it in `config`
fn apply_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "poll_interval_ms" => {
            let ms = parse_millis(key, value)?;
            if ms == 0 {
                return Err(invalid(key, "Value must be greater than 0"));
            }
            config.poll_interval_ms = Some(ms);
        }
        "activation_delay_ms" => config.activation_delay_ms = Some(parse_millis(key, value)?),
        "restore_delay_ms" => config.restore_delay_ms = Some(parse_millis(key, value)?),
        "preserve_clipboard" => config.preserve_clipboard = Some(parse_bool(key, value)?),
        "notify" => config.notify = Some(parse_bool(key, value)?),
        "show_history_hotkey" => {
            config.show_history_hotkey = Some(parse_combo(key, value)?.to_string())
        }
        "keystroke_tool" => {
            let lower = value.to_lowercase();
            if !VALID_KEYSTROKE_TOOLS.contains(&lower.as_str()) {
                return Err(invalid(
                    key,
                    &format!(
                        "Invalid value '{}'. Valid options: {}",
                        value,
                        VALID_KEYSTROKE_TOOLS.join(", ")
                    ),
                ));
            }
            config.keystroke_tool = Some(lower);
        }
        "picker_command" => {
            config.picker_command = Some(value.trim().to_string()).filter(|s| !s.is_empty())
        }
        "secondary.enabled" => secondary(config).enabled = Some(parse_bool(key, value)?),
        "secondary.hotkey" => {
            secondary(config).hotkey = Some(parse_combo(key, value)?.to_string())
        }
        "secondary.keys" => {
            let combos = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| parse_combo(key, s).map(|c| c.to_string()))
                .collect::<Result<Vec<_>, _>>()?;
            if combos.is_empty() {
                return Err(invalid(key, "Expected a comma-separated list of hotkeys"));
            }
            secondary(config).keys = Some(combos);
        }
        "secondary.delay_ms" => secondary(config).delay_ms = Some(parse_millis(key, value)?),
        _ => return Err(invalid(key, "Unknown key")),
    }
    Ok(())
}

fn read_value(config: &AppConfig, key: &str) -> Option<String> {
    let secondary = config.secondary.as_ref();
    match key {
        "poll_interval_ms" => config.poll_interval_ms.map(|v| v.to_string()),
        "activation_delay_ms" => config.activation_delay_ms.map(|v| v.to_string()),
        "restore_delay_ms" => config.restore_delay_ms.map(|v| v.to_string()),
        "preserve_clipboard" => config.preserve_clipboard.map(|v| v.to_string()),
        "notify" => config.notify.map(|v| v.to_string()),
        "show_history_hotkey" => config.show_history_hotkey.clone(),
        "keystroke_tool" => config.keystroke_tool.clone(),
        "picker_command" => config.picker_command.clone(),
        "secondary.enabled" => secondary.and_then(|s| s.enabled).map(|v| v.to_string()),
        "secondary.hotkey" => secondary.and_then(|s| s.hotkey.clone()),
        "secondary.keys" => secondary.and_then(|s| s.keys.as_ref()).map(|k| k.join(", ")),
        "secondary.delay_ms" => secondary.and_then(|s| s.delay_ms).map(|v| v.to_string()),
        _ => None,
    }
}

fn secondary(config: &mut AppConfig) -> &mut SecondaryConfig {
    config.secondary.get_or_insert_with(SecondaryConfig::default)
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: message.to_string(),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(invalid(key, "Value must be 'true' or 'false'")),
    }
}

fn parse_millis(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .parse()
        .map_err(|_| invalid(key, "Value must be a whole number of milliseconds"))
}

fn parse_combo(key: &str, value: &str) -> Result<KeyCombo, ConfigError> {
    value.parse().map_err(|e: crate::domain::error::KeyComboParseError| {
        invalid(key, &e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans_are_strict() {
        assert!(parse_bool("k", "true").unwrap());
        assert!(!parse_bool("k", "false").unwrap());
        assert!(parse_bool("k", "yes").is_err());
        assert!(parse_bool("k", "1").is_err());
    }

    #[test]
    fn durations_must_be_integers() {
        let mut config = AppConfig::empty();
        assert!(apply_value(&mut config, "restore_delay_ms", "250").is_ok());
        assert_eq!(config.restore_delay_ms, Some(250));

        assert!(apply_value(&mut config, "restore_delay_ms", "0.5").is_err());
        assert!(apply_value(&mut config, "restore_delay_ms", "300ms").is_err());
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let mut config = AppConfig::empty();
        assert!(apply_value(&mut config, "poll_interval_ms", "0").is_err());
        assert!(config.poll_interval_ms.is_none());
    }

    #[test]
    fn hotkeys_are_normalized() {
        let mut config = AppConfig::empty();
        apply_value(&mut config, "show_history_hotkey", "super+ctrl+h").unwrap();
        assert_eq!(config.show_history_hotkey.as_deref(), Some("Ctrl+Super+H"));

        assert!(apply_value(&mut config, "show_history_hotkey", "Hyper+H").is_err());
    }

    #[test]
    fn secondary_keys_parse_as_list() {
        let mut config = AppConfig::empty();
        apply_value(&mut config, "secondary.keys", "Super+Space, Super+4").unwrap();

        assert_eq!(
            read_value(&config, "secondary.keys").as_deref(),
            Some("Super+Space, Super+4")
        );
        assert!(apply_value(&mut config, "secondary.keys", "Super+Space, nope").is_err());
        assert!(apply_value(&mut config, "secondary.keys", " , ").is_err());
    }

    #[test]
    fn secondary_values_create_section() {
        let mut config = AppConfig::empty();
        apply_value(&mut config, "secondary.enabled", "true").unwrap();

        assert_eq!(config.secondary.as_ref().and_then(|s| s.enabled), Some(true));
        assert_eq!(read_value(&config, "secondary.delay_ms"), None);
    }

    #[test]
    fn keystroke_tool_is_validated() {
        let mut config = AppConfig::empty();
        assert!(apply_value(&mut config, "keystroke_tool", "ENIGO").is_ok());
        assert_eq!(config.keystroke_tool.as_deref(), Some("enigo"));
        assert!(apply_value(&mut config, "keystroke_tool", "none").is_ok());
        assert!(apply_value(&mut config, "keystroke_tool", "ydotool").is_err());
        #[cfg(target_os = "linux")]
        assert!(apply_value(&mut config, "keystroke_tool", "wtype").is_ok());
    }

    #[test]
    fn blank_picker_command_unsets() {
        let mut config = AppConfig::empty();
        apply_value(&mut config, "picker_command", "rofi -dmenu").unwrap();
        assert_eq!(read_value(&config, "picker_command").as_deref(), Some("rofi -dmenu"));

        apply_value(&mut config, "picker_command", "  ").unwrap();
        assert_eq!(read_value(&config, "picker_command"), None);
    }

    #[test]
    fn every_valid_key_is_readable_after_defaults() {
        let config = AppConfig::defaults();
        for key in VALID_CONFIG_KEYS {
            if *key == "picker_command" {
                continue;
            }
            assert!(read_value(&config, key).is_some(), "{} has no default", key);
        }
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(ensure_valid_key("api_key").is_err());
        assert!(ensure_valid_key("notify").is_ok());
    }
}
