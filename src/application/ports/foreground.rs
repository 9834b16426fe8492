//! Foreground application port

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

/// Opaque handle of an application window that held input focus
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppHandle(String);

impl AppHandle {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Foreground tracking errors
#[derive(Debug, Clone, Error)]
pub enum ForegroundError {
    #[error("{0} not found. Please install it to restore focus before pasting.")]
    ToolNotFound(String),

    #[error("Failed to query the active window: {0}")]
    QueryFailed(String),

    #[error("Failed to activate window {handle}: {message}")]
    ActivationFailed { handle: String, message: String },
}

/// Port for remembering and re-activating the last non-self foreground app
#[async_trait]
pub trait ForegroundApp: Send + Sync {
    /// Query the currently focused application and remember it.
    async fn capture_current(&self) -> Result<Option<AppHandle>, ForegroundError>;

    /// Record an externally reported foreground change.
    fn remember(&self, app: AppHandle);

    /// The last remembered application, if any.
    fn previous(&self) -> Option<AppHandle>;

    /// Give input focus back to `app`.
    async fn activate(&self, app: &AppHandle) -> Result<(), ForegroundError>;
}

/// Blanket implementation for boxed trackers
#[async_trait]
impl ForegroundApp for Box<dyn ForegroundApp> {
    async fn capture_current(&self) -> Result<Option<AppHandle>, ForegroundError> {
        self.as_ref().capture_current().await
    }

    fn remember(&self, app: AppHandle) {
        self.as_ref().remember(app)
    }

    fn previous(&self) -> Option<AppHandle> {
        self.as_ref().previous()
    }

    async fn activate(&self, app: &AppHandle) -> Result<(), ForegroundError> {
        self.as_ref().activate(app).await
    }
}
