//! Paste orchestration use case

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::domain::clipboard::{ClipboardItem, PasteboardSnapshot};
use crate::domain::config::{
    AppConfig, DEFAULT_ACTIVATION_DELAY_MS, DEFAULT_RESTORE_DELAY_MS,
};
use crate::domain::hotkey::KeyCombo;

use super::monitor::ChangeSuppressor;
use super::ports::{
    ClipboardError, ClipboardPort, ForegroundApp, KeySimulator, KeySimulatorError, PermissionPort,
};

/// Errors from the paste use case
#[derive(Debug, Error)]
pub enum PasteError {
    #[error("Input simulation is not permitted. Grant access at: {guidance}")]
    PermissionDenied { guidance: String },

    #[error("Failed to put item on clipboard: {0}")]
    Clipboard(#[from] ClipboardError),
}

/// Cancellation handle shared between a paste sequence and its owner.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once [`cancel`](Self::cancel) has been called.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Timing and behaviour of a paste sequence
#[derive(Debug, Clone)]
pub struct PasteConfig {
    /// Restore the pre-paste clipboard afterwards
    pub preserve_clipboard: bool,
    /// Wait between focus restore and the paste keystroke
    pub activation_delay: Duration,
    /// Wait between the paste keystroke and clipboard restore
    pub restore_delay: Duration,
}

impl Default for PasteConfig {
    fn default() -> Self {
        Self {
            preserve_clipboard: false,
            activation_delay: Duration::from_millis(DEFAULT_ACTIVATION_DELAY_MS),
            restore_delay: Duration::from_millis(DEFAULT_RESTORE_DELAY_MS),
        }
    }
}

impl From<&AppConfig> for PasteConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            preserve_clipboard: config.preserve_clipboard_or_default(),
            activation_delay: config.activation_delay_or_default(),
            restore_delay: config.restore_delay_or_default(),
        }
    }
}

/// What a completed paste sequence did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasteOutcome {
    /// Focus was handed back to the previous application
    pub focus_restored: bool,
    /// The paste keystroke was delivered
    pub paste_sent: bool,
    /// The pre-paste clipboard was written back
    pub clipboard_restored: bool,
    /// The sequence was cancelled before finishing
    pub cancelled: bool,
}

/// Re-injects a history item into the previously focused application.
pub struct PasteOrchestrator<C, K, P, F, S>
where
    C: ClipboardPort,
    K: KeySimulator,
    P: PermissionPort,
    F: ForegroundApp,
    S: ChangeSuppressor,
{
    clipboard: C,
    keys: K,
    permission: P,
    foreground: F,
    suppressor: S,
    config: PasteConfig,
}

impl<C, K, P, F, S> PasteOrchestrator<C, K, P, F, S>
where
    C: ClipboardPort,
    K: KeySimulator,
    P: PermissionPort,
    F: ForegroundApp,
    S: ChangeSuppressor,
{
    pub fn new(
        clipboard: C,
        keys: K,
        permission: P,
        foreground: F,
        suppressor: S,
        config: PasteConfig,
    ) -> Self {
        Self {
            clipboard,
            keys,
            permission,
            foreground,
            suppressor,
            config,
        }
    }

    pub fn config(&self) -> &PasteConfig {
        &self.config
    }

    /// Foreground tracker used by the sequence
    pub fn foreground(&self) -> &F {
        &self.foreground
    }

    /// Run the paste sequence for `item`.
    ///
    /// Permission failure aborts before the clipboard is touched. After the
    /// clipboard write, focus and keystroke failures are logged and the
    /// write stands. Cancellation skips the remaining focus and keystroke
    /// steps and restores a taken snapshot at once.
    pub async fn paste(
        &self,
        item: &ClipboardItem,
        cancel: &CancelToken,
    ) -> Result<PasteOutcome, PasteError> {
        self.ensure_permission().await?;

        let mut outcome = PasteOutcome::default();
        if cancel.is_cancelled() {
            debug!("paste cancelled before start");
            outcome.cancelled = true;
            return Ok(outcome);
        }

        let snapshot = if self.config.preserve_clipboard {
            match self.clipboard.snapshot().await {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    warn!(error = %e, "failed to snapshot clipboard, it will not be restored");
                    None
                }
            }
        } else {
            None
        };

        self.suppressor.suppress(1);
        if let Err(e) = self.clipboard.write(item).await {
            self.suppressor.unsuppress(1);
            error!(id = %item.id(), error = %e, "failed to write item to clipboard");
            return Err(e.into());
        }
        debug!(id = %item.id(), kind = %item.kind(), "item written to clipboard");

        outcome.focus_restored = self.activate_previous().await;

        if !wait_or_cancel(self.config.activation_delay, cancel).await {
            info!("paste cancelled before keystroke");
            outcome.cancelled = true;
            outcome.clipboard_restored = self.restore(snapshot.as_ref()).await;
            return Ok(outcome);
        }

        match self.keys.simulate_paste().await {
            Ok(()) => outcome.paste_sent = true,
            Err(e) => error!(error = %e, "failed to simulate paste, item left on clipboard"),
        }

        if snapshot.is_some() {
            if !wait_or_cancel(self.config.restore_delay, cancel).await {
                debug!("restore delay cut short by cancellation");
                outcome.cancelled = true;
            }
            outcome.clipboard_restored = self.restore(snapshot.as_ref()).await;
        }

        info!(
            id = %item.id(),
            paste_sent = outcome.paste_sent,
            focus_restored = outcome.focus_restored,
            "paste sequence finished"
        );
        Ok(outcome)
    }

    /// Press `combos` in order with `delay` between them.
    pub async fn send_combos(
        &self,
        combos: &[KeyCombo],
        delay: Duration,
    ) -> Result<(), KeySimulatorError> {
        for (i, combo) in combos.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(delay).await;
            }
            debug!(%combo, "sending key combo");
            self.keys.press_combo(combo).await?;
        }
        Ok(())
    }

    async fn ensure_permission(&self) -> Result<(), PasteError> {
        if self.permission.is_granted().await {
            return Ok(());
        }

        // The prompt result is not trusted within this sequence.
        let _ = self.permission.request_prompt().await;
        let guidance = self.permission.guidance_link().to_string();
        warn!(%guidance, "input simulation not permitted, paste aborted");
        Err(PasteError::PermissionDenied { guidance })
    }

    async fn activate_previous(&self) -> bool {
        let Some(app) = self.foreground.previous() else {
            debug!("no previous foreground application recorded");
            return false;
        };

        match self.foreground.activate(&app).await {
            Ok(()) => true,
            Err(e) => {
                warn!(app = %app, error = %e, "failed to restore focus");
                false
            }
        }
    }

    async fn restore(&self, snapshot: Option<&PasteboardSnapshot>) -> bool {
        let Some(snapshot) = snapshot else {
            return false;
        };

        self.suppressor.suppress(1);
        match self.clipboard.restore(snapshot).await {
            Ok(()) => {
                debug!(change_count = snapshot.change_count, "clipboard restored");
                true
            }
            Err(e) => {
                self.suppressor.unsuppress(1);
                warn!(error = %e, "failed to restore clipboard");
                false
            }
        }
    }
}

/// Sleep for `delay`; returns false if cancelled first.
async fn wait_or_cancel(delay: Duration, cancel: &CancelToken) -> bool {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(delay) => true,
    }
}
