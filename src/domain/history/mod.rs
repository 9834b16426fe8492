//! Bounded clipboard history list
//!
//! Ordered newest first. A new item that is content-equal to the current
//! head is dropped; anything else is prepended and the tail is cut back to
//! capacity.

use uuid::Uuid;

use crate::domain::clipboard::ClipboardItem;

/// Maximum number of retained history items
pub const MAX_HISTORY_SIZE: usize = 200;

/// Result of pushing an item onto the history
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// Item equals the current head and was not inserted
    Duplicate,
    /// Item inserted at the head; holds the evicted oldest item, if any
    Added { evicted: Option<ClipboardItem> },
}

impl PushOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added { .. })
    }
}

/// Ordered, capacity-capped history with adjacent-duplicate suppression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryList {
    items: Vec<ClipboardItem>,
    capacity: usize,
}

impl HistoryList {
    /// Create an empty history with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY_SIZE)
    }

    /// Create an empty history with a custom capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Rebuild a history from persisted items (newest first), cut to capacity
    pub fn from_items(mut items: Vec<ClipboardItem>) -> Self {
        items.truncate(MAX_HISTORY_SIZE);
        Self {
            items,
            capacity: MAX_HISTORY_SIZE,
        }
    }

    /// Insert an item at the head unless it duplicates the current head
    pub fn push(&mut self, item: ClipboardItem) -> PushOutcome {
        if let Some(head) = self.items.first() {
            if head.same_content(&item) {
                return PushOutcome::Duplicate;
            }
        }

        self.items.insert(0, item);

        let evicted = if self.items.len() > self.capacity {
            self.items.pop()
        } else {
            None
        };

        PushOutcome::Added { evicted }
    }

    /// Remove the item with the given id. Returns whether anything was removed.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        self.items.len() != before
    }

    /// Remove every item, returning how many were dropped
    pub fn clear(&mut self) -> usize {
        let count = self.items.len();
        self.items.clear();
        count
    }

    pub fn items(&self) -> &[ClipboardItem] {
        &self.items
    }

    pub fn head(&self) -> Option<&ClipboardItem> {
        self.items.first()
    }

    pub fn get(&self, index: usize) -> Option<&ClipboardItem> {
        self.items.get(index)
    }

    pub fn find(&self, id: Uuid) -> Option<&ClipboardItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryList {
    fn default() -> Self {
        Self::new()
    }
}
