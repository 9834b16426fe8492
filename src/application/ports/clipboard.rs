//! Clipboard port interface

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::clipboard::{ClipboardItem, PasteboardContents, PasteboardSnapshot};

/// Clipboard errors
#[derive(Debug, Clone, Error)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to read clipboard: {0}")]
    ReadFailed(String),

    #[error("Failed to write clipboard: {0}")]
    WriteFailed(String),
}

/// Port for the shared OS clipboard
#[async_trait]
pub trait ClipboardPort: Send + Sync {
    /// Monotonic counter that changes on every clipboard write.
    async fn change_count(&self) -> Result<u64, ClipboardError>;

    /// Read the types and payloads currently on the clipboard.
    ///
    /// A type may be listed with its payload missing when it could not be read.
    async fn read(&self) -> Result<PasteboardContents, ClipboardError>;

    /// Put a history item on the clipboard, replacing its contents.
    async fn write(&self, item: &ClipboardItem) -> Result<(), ClipboardError>;

    /// Capture everything on the clipboard along with the change counter.
    async fn snapshot(&self) -> Result<PasteboardSnapshot, ClipboardError> {
        let change_count = self.change_count().await?;
        let contents = self.read().await?;
        Ok(PasteboardSnapshot::new(contents, change_count))
    }

    /// Write a snapshot back to the clipboard.
    async fn restore(&self, snapshot: &PasteboardSnapshot) -> Result<(), ClipboardError>;
}

#[async_trait]
impl<T: ClipboardPort + ?Sized> ClipboardPort for Arc<T> {
    async fn change_count(&self) -> Result<u64, ClipboardError> {
        self.as_ref().change_count().await
    }

    async fn read(&self) -> Result<PasteboardContents, ClipboardError> {
        self.as_ref().read().await
    }

    async fn write(&self, item: &ClipboardItem) -> Result<(), ClipboardError> {
        self.as_ref().write(item).await
    }

    async fn snapshot(&self) -> Result<PasteboardSnapshot, ClipboardError> {
        self.as_ref().snapshot().await
    }

    async fn restore(&self, snapshot: &PasteboardSnapshot) -> Result<(), ClipboardError> {
        self.as_ref().restore(snapshot).await
    }
}
