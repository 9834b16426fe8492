//! Foreground window tracking through xdotool (X11)

use std::process::Stdio;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::application::ports::{AppHandle, ForegroundApp, ForegroundError};

/// Remembers X11 window ids and re-activates them with `xdotool`
pub struct XdotoolForeground {
    previous: Mutex<Option<AppHandle>>,
}

impl XdotoolForeground {
    pub fn new() -> Self {
        Self {
            previous: Mutex::new(None),
        }
    }

    fn set_previous(&self, app: Option<AppHandle>) {
        *self
            .previous
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = app;
    }
}

impl Default for XdotoolForeground {
    fn default() -> Self {
        Self::new()
    }
}

fn map_spawn_error(e: std::io::Error) -> ForegroundError {
    if e.kind() == std::io::ErrorKind::NotFound {
        ForegroundError::ToolNotFound("xdotool".to_string())
    } else {
        ForegroundError::QueryFailed(e.to_string())
    }
}

#[async_trait]
impl ForegroundApp for XdotoolForeground {
    async fn capture_current(&self) -> Result<Option<AppHandle>, ForegroundError> {
        let output = Command::new("xdotool")
            .arg("getactivewindow")
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(map_spawn_error)?;

        if !output.status.success() {
            return Err(ForegroundError::QueryFailed(format!(
                "xdotool exited with status: {}",
                output.status
            )));
        }

        let app = parse_window_id(&String::from_utf8_lossy(&output.stdout));
        if let Some(app) = &app {
            debug!(window = %app, "captured foreground window");
            self.set_previous(Some(app.clone()));
        }
        Ok(app)
    }

    fn remember(&self, app: AppHandle) {
        debug!(window = %app, "foreground window reported");
        self.set_previous(Some(app));
    }

    fn previous(&self) -> Option<AppHandle> {
        self.previous
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    async fn activate(&self, app: &AppHandle) -> Result<(), ForegroundError> {
        let status = Command::new("xdotool")
            .args(["windowactivate", "--sync", app.as_str()])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(map_spawn_error)?;

        if !status.success() {
            return Err(ForegroundError::ActivationFailed {
                handle: app.to_string(),
                message: format!("xdotool exited with status: {}", status),
            });
        }

        Ok(())
    }
}

/// Window ids are decimal numbers on a single line
fn parse_window_id(stdout: &str) -> Option<AppHandle> {
    let id = stdout.trim();
    (!id.is_empty() && id.chars().all(|c| c.is_ascii_digit())).then(|| AppHandle::new(id))
}
