//! Global hotkey registry use case

use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::domain::hotkey::{HotkeyId, KeyCombo};

use super::ports::{HotkeyBackend, HotkeyError, HotkeyEvent};

/// Callback run when a binding fires
pub type HotkeyCallback = Box<dyn Fn(HotkeyId) + Send + Sync>;

struct Binding {
    combo: KeyCombo,
    callback: HotkeyCallback,
}

/// Id-keyed table of global shortcuts sharing one OS listener.
///
/// The listener is installed with the first binding and removed with the
/// last one. Events arrive over a single typed channel and are dispatched
/// by id.
pub struct HotkeyRegistry<B: HotkeyBackend> {
    backend: B,
    bindings: HashMap<HotkeyId, Binding>,
    listener_installed: bool,
    events_tx: mpsc::UnboundedSender<HotkeyEvent>,
    events_rx: mpsc::UnboundedReceiver<HotkeyEvent>,
}

impl<B: HotkeyBackend> HotkeyRegistry<B> {
    pub fn new(backend: B) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            backend,
            bindings: HashMap::new(),
            listener_installed: false,
            events_tx,
            events_rx,
        }
    }

    /// Bind `combo` to `id`, replacing any previous binding for `id`.
    ///
    /// On failure nothing is bound for `id`.
    pub fn register(
        &mut self,
        id: HotkeyId,
        combo: KeyCombo,
        callback: HotkeyCallback,
    ) -> Result<(), HotkeyError> {
        if self.bindings.contains_key(&id) {
            self.unregister(id);
        }

        if let Err(e) = self.backend.grab(id, &combo) {
            error!(%id, %combo, error = %e, "failed to register hotkey");
            return Err(e);
        }

        if !self.listener_installed {
            if let Err(e) = self.backend.install_listener(self.events_tx.clone()) {
                error!(error = %e, "failed to install hotkey listener");
                if let Err(release_err) = self.backend.release(id) {
                    warn!(%id, error = %release_err, "failed to release hotkey");
                }
                return Err(e);
            }
            self.listener_installed = true;
            debug!("hotkey listener installed");
        }

        self.bindings.insert(id, Binding { combo, callback });
        info!(%id, %combo, "registered hotkey");
        Ok(())
    }

    /// Remove the binding for `id`. Returns whether one existed.
    pub fn unregister(&mut self, id: HotkeyId) -> bool {
        let Some(binding) = self.bindings.remove(&id) else {
            return false;
        };

        if let Err(e) = self.backend.release(id) {
            warn!(%id, error = %e, "failed to release hotkey");
        }
        debug!(%id, combo = %binding.combo, "unregistered hotkey");

        if self.bindings.is_empty() {
            self.teardown_listener();
        }
        true
    }

    /// Remove every binding and the listener.
    pub fn unregister_all(&mut self) {
        let ids: Vec<HotkeyId> = self.bindings.keys().copied().collect();
        for id in ids {
            self.unregister(id);
        }
        self.teardown_listener();
    }

    pub fn is_registered(&self, id: HotkeyId) -> bool {
        self.bindings.contains_key(&id)
    }

    pub fn combo(&self, id: HotkeyId) -> Option<KeyCombo> {
        self.bindings.get(&id).map(|b| b.combo)
    }

    pub fn listener_installed(&self) -> bool {
        self.listener_installed
    }

    /// Run the callback bound to the event's id. Returns whether one ran.
    pub fn dispatch(&self, event: HotkeyEvent) -> bool {
        match self.bindings.get(&event.id) {
            Some(binding) => {
                debug!(id = %event.id, "hotkey fired");
                (binding.callback)(event.id);
                true
            }
            None => {
                debug!(id = %event.id, "ignoring event for unbound hotkey");
                false
            }
        }
    }

    /// Wait for the next event from the OS listener.
    pub async fn next_event(&mut self) -> Option<HotkeyEvent> {
        self.events_rx.recv().await
    }

    fn teardown_listener(&mut self) {
        if self.listener_installed {
            self.backend.remove_listener();
            self.listener_installed = false;
            debug!("hotkey listener removed");
        }
    }
}

impl<B: HotkeyBackend> Drop for HotkeyRegistry<B> {
    fn drop(&mut self) {
        self.unregister_all();
    }
}
