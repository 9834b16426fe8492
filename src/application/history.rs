//! History store use case

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::domain::clipboard::ClipboardItem;
use crate::domain::history::{HistoryList, PushOutcome};

use super::ports::HistoryPersistence;

/// History shared between the monitor, the paste flow and the control surface
pub type SharedHistory<P> = Arc<Mutex<HistoryStore<P>>>;

/// Outward notifications for UIs that mirror the history
#[derive(Default)]
#[allow(clippy::type_complexity)]
pub struct HistoryCallbacks {
    /// Called with each newly inserted item
    pub on_item_added: Option<Box<dyn Fn(&ClipboardItem) + Send + Sync>>,
    /// Called with the full sequence after any change
    pub on_history_changed: Option<Box<dyn Fn(&[ClipboardItem]) + Send + Sync>>,
}

/// Bounded, adjacent-deduplicated history persisted on every mutation.
///
/// Persistence failures are logged and never surfaced; the in-memory list
/// stays authoritative for the session.
pub struct HistoryStore<P: HistoryPersistence> {
    list: HistoryList,
    persistence: P,
    callbacks: HistoryCallbacks,
}

impl<P: HistoryPersistence> HistoryStore<P> {
    /// Create an empty store
    pub fn new(persistence: P) -> Self {
        Self {
            list: HistoryList::new(),
            persistence,
            callbacks: HistoryCallbacks::default(),
        }
    }

    /// Create a store seeded from persistence. A load failure starts empty.
    pub async fn load(persistence: P) -> Self {
        let list = match persistence.load().await {
            Ok(items) => {
                info!(count = items.len(), "loaded clipboard history");
                HistoryList::from_items(items)
            }
            Err(e) => {
                error!(error = %e, "failed to load clipboard history, starting empty");
                HistoryList::new()
            }
        };

        Self {
            list,
            persistence,
            callbacks: HistoryCallbacks::default(),
        }
    }

    pub fn with_callbacks(mut self, callbacks: HistoryCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Wrap the store for sharing
    pub fn shared(self) -> SharedHistory<P> {
        Arc::new(Mutex::new(self))
    }

    /// Insert at the head unless content-equal to the current head.
    pub async fn add(&mut self, item: ClipboardItem) {
        let kind = item.kind();
        match self.list.push(item) {
            PushOutcome::Duplicate => {
                debug!(%kind, "skipping item equal to history head");
            }
            PushOutcome::Added { evicted } => {
                if let Some(old) = evicted {
                    debug!(id = %old.id(), "evicted oldest history item");
                }
                self.persist().await;
                if let (Some(cb), Some(head)) = (&self.callbacks.on_item_added, self.list.head()) {
                    cb(head);
                }
                self.notify_changed();
            }
        }
    }

    /// Remove the item with `id` if present.
    pub async fn delete(&mut self, id: Uuid) {
        let removed = self.list.remove(id);
        self.persist().await;
        if removed {
            debug!(%id, "deleted history item");
            self.notify_changed();
        }
    }

    /// Remove every item.
    pub async fn clear(&mut self) {
        let removed = self.list.clear();
        self.persist().await;
        info!(count = removed, "cleared clipboard history");
        if removed > 0 {
            self.notify_changed();
        }
    }

    /// Items, newest first
    pub fn list(&self) -> &[ClipboardItem] {
        self.list.items()
    }

    pub fn get(&self, index: usize) -> Option<&ClipboardItem> {
        self.list.get(index)
    }

    pub fn find(&self, id: Uuid) -> Option<&ClipboardItem> {
        self.list.find(id)
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    async fn persist(&self) {
        if let Err(e) = self.persistence.save(self.list.items()).await {
            error!(error = %e, "failed to persist clipboard history");
        }
    }

    fn notify_changed(&self) {
        if let Some(cb) = &self.callbacks.on_history_changed {
            cb(self.list.items());
        }
    }
}
