//! Picker and paste-sequence lifecycle of the running daemon

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::{JoinError, JoinHandle};
use tokio::time::timeout;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::clipboard::ClipboardItem;

use super::history::SharedHistory;
use super::monitor::ChangeSuppressor;
use super::paste::{CancelToken, PasteError, PasteOrchestrator};
use super::ports::{
    ClipboardPort, ForegroundApp, HistoryPersistence, KeySimulator, NotificationIcon, Notifier,
    PermissionPort, Picker, PickerError,
};

/// What a picker run produced
pub type PickResult = Result<Option<usize>, PickerError>;

/// What the daemon is busy with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Picking,
    Pasting,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Picking => write!(f, "picking"),
            Self::Pasting => write!(f, "pasting"),
        }
    }
}

/// An open picker. Entries are pinned by id so items captured while the
/// picker is open do not shift the selection.
struct OpenPicker {
    ids: Vec<Uuid>,
    handle: JoinHandle<PickResult>,
}

struct PasteTask {
    cancel: CancelToken,
    handle: JoinHandle<()>,
}

/// Owns the open picker and the in-flight paste sequence; at most one of each.
pub struct PasteSession<C, K, P, F, S, H>
where
    C: ClipboardPort + 'static,
    K: KeySimulator + 'static,
    P: PermissionPort + 'static,
    F: ForegroundApp + 'static,
    S: ChangeSuppressor + 'static,
    H: HistoryPersistence,
{
    history: SharedHistory<H>,
    orchestrator: Arc<PasteOrchestrator<C, K, P, F, S>>,
    notifier: Arc<dyn Notifier>,
    picker: Option<Arc<dyn Picker>>,
    open_picker: Option<OpenPicker>,
    paste_task: Option<PasteTask>,
}

impl<C, K, P, F, S, H> PasteSession<C, K, P, F, S, H>
where
    C: ClipboardPort + 'static,
    K: KeySimulator + 'static,
    P: PermissionPort + 'static,
    F: ForegroundApp + 'static,
    S: ChangeSuppressor + 'static,
    H: HistoryPersistence,
{
    pub fn new(
        history: SharedHistory<H>,
        orchestrator: Arc<PasteOrchestrator<C, K, P, F, S>>,
        notifier: Arc<dyn Notifier>,
        picker: Option<Arc<dyn Picker>>,
    ) -> Self {
        Self {
            history,
            orchestrator,
            notifier,
            picker,
            open_picker: None,
            paste_task: None,
        }
    }

    pub fn orchestrator(&self) -> &Arc<PasteOrchestrator<C, K, P, F, S>> {
        &self.orchestrator
    }

    pub fn state(&self) -> SessionState {
        if self.open_picker.is_some() {
            SessionState::Picking
        } else if self
            .paste_task
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
        {
            SessionState::Pasting
        } else {
            SessionState::Idle
        }
    }

    pub fn is_picking(&self) -> bool {
        self.open_picker.is_some()
    }

    /// Open the picker, or close it when already open.
    pub async fn toggle_picker(&mut self) {
        if self.open_picker.is_some() {
            self.close_picker();
            return;
        }

        // The app to paste into is the one focused right now
        if let Err(e) = self.orchestrator.foreground().capture_current().await {
            debug!(error = %e, "could not capture foreground application");
        }

        let Some(picker) = self.picker.clone() else {
            info!("show-history requested but no picker command is configured");
            return;
        };

        let (ids, entries): (Vec<Uuid>, Vec<String>) = {
            let history = self.history.lock().await;
            history
                .list()
                .iter()
                .map(|item| (item.id(), item.display_text()))
                .unzip()
        };
        if entries.is_empty() {
            info!("history is empty, nothing to pick");
            return;
        }

        debug!(entries = entries.len(), "opening picker");
        let handle = tokio::spawn(async move { picker.pick(entries).await });
        self.open_picker = Some(OpenPicker { ids, handle });
    }

    /// Resolves when the open picker finishes. Never resolves while no
    /// picker is open.
    pub async fn picker_closed(&mut self) -> Result<PickResult, JoinError> {
        match &mut self.open_picker {
            Some(open) => (&mut open.handle).await,
            None => std::future::pending().await,
        }
    }

    /// Paste the entry chosen in the picker that just finished.
    pub async fn on_picker_done(&mut self, result: Result<PickResult, JoinError>) {
        let Some(open) = self.open_picker.take() else {
            return;
        };

        let index = match result {
            Ok(Ok(Some(index))) => index,
            Ok(Ok(None)) => {
                debug!("picker dismissed");
                return;
            }
            Ok(Err(e)) => {
                warn!(error = %e, "picker failed");
                return;
            }
            Err(e) if e.is_cancelled() => return,
            Err(e) => {
                error!(error = %e, "picker task failed");
                return;
            }
        };

        let Some(id) = open.ids.get(index).copied() else {
            warn!(index, "picker returned an out-of-range index");
            return;
        };

        let item = self.history.lock().await.find(id).cloned();
        match item {
            Some(item) => self.start_paste(item),
            None => info!(%id, "picked entry was removed meanwhile"),
        }
    }

    pub fn close_picker(&mut self) {
        if let Some(open) = self.open_picker.take() {
            // Dropping the pick future kills the picker process
            open.handle.abort();
            debug!("picker closed");
        }
    }

    /// Close the picker and cancel an in-flight paste.
    pub fn dismiss(&mut self) {
        self.close_picker();
        if let Some(task) = &self.paste_task {
            task.cancel.cancel();
        }
    }

    /// Paste the entry at `index`; false if there is none.
    pub async fn paste_index(&mut self, index: usize) -> bool {
        let item = self.history.lock().await.get(index).cloned();
        match item {
            Some(item) => {
                self.start_paste(item);
                true
            }
            None => false,
        }
    }

    /// Start a paste sequence, cancelling one still in flight.
    pub fn start_paste(&mut self, item: ClipboardItem) {
        let previous = self.paste_task.take().map(|task| {
            task.cancel.cancel();
            task.handle
        });

        let cancel = CancelToken::new();
        let token = cancel.clone();
        let orchestrator = Arc::clone(&self.orchestrator);
        let notifier = Arc::clone(&self.notifier);

        let handle = tokio::spawn(async move {
            // Let a cancelled sequence restore its snapshot first
            if let Some(previous) = previous {
                let _ = previous.await;
            }

            match orchestrator.paste(&item, &token).await {
                Ok(outcome) => debug!(?outcome, "paste sequence done"),
                Err(PasteError::PermissionDenied { guidance }) => {
                    let message = format!("Allow key simulation to paste items. See {}", guidance);
                    if let Err(e) = notifier
                        .notify("Pasteback needs permission", &message, NotificationIcon::Warning)
                        .await
                    {
                        debug!(error = %e, "failed to show permission notification");
                    }
                }
                Err(e) => error!(error = %e, "paste failed"),
            }
        });

        self.paste_task = Some(PasteTask { cancel, handle });
    }

    /// Wait for the current paste sequence, if any, to finish.
    pub async fn join_paste(&mut self) {
        if let Some(task) = self.paste_task.take() {
            if let Err(e) = task.handle.await {
                if !e.is_cancelled() {
                    error!(error = %e, "paste task failed");
                }
            }
        }
    }

    /// Close everything, giving an in-flight paste `grace` to wind down.
    pub async fn shutdown(&mut self, grace: Duration) {
        self.dismiss();
        if timeout(grace, self.join_paste()).await.is_err() {
            warn!("paste sequence did not finish before shutdown");
        }
    }
}
