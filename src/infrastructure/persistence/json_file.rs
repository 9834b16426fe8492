//! JSON key-value file holding the clipboard history

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::fs;
use tracing::{debug, warn};

use crate::application::ports::{HistoryPersistence, PersistenceError};
use crate::domain::clipboard::ClipboardItem;

/// Key under which the history sequence is stored
pub const HISTORY_KEY: &str = "clipboard_history";

/// History store backed by a JSON document in the XDG data directory.
///
/// Other keys in the document are preserved. Writes go to a temporary file
/// that is renamed over the original, so a crash never leaves a torn file.
pub struct JsonFileHistoryStore {
    path: PathBuf,
}

impl JsonFileHistoryStore {
    /// Create a store at the default data path
    pub fn new() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("pasteback");

        Self {
            path: data_dir.join("store.json"),
        }
    }

    /// Create with custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<Map<String, Value>, PersistenceError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(PersistenceError::ReadFailed(e.to_string())),
        };

        serde_json::from_slice(&bytes).map_err(|e| PersistenceError::DecodeFailed(e.to_string()))
    }

    async fn write_atomic(&self, bytes: Vec<u8>) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| PersistenceError::WriteFailed(e.to_string()))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes)
            .await
            .map_err(|e| PersistenceError::WriteFailed(e.to_string()))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| PersistenceError::WriteFailed(e.to_string()))
    }
}

impl Default for JsonFileHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryPersistence for JsonFileHistoryStore {
    async fn load(&self) -> Result<Vec<ClipboardItem>, PersistenceError> {
        let mut document = self.read_document().await?;
        let Some(value) = document.remove(HISTORY_KEY) else {
            return Ok(Vec::new());
        };

        serde_json::from_value(value).map_err(|e| PersistenceError::DecodeFailed(e.to_string()))
    }

    async fn save(&self, items: &[ClipboardItem]) -> Result<(), PersistenceError> {
        let mut document = match self.read_document().await {
            Ok(document) => document,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "replacing unreadable store");
                Map::new()
            }
        };

        let history =
            serde_json::to_value(items).map_err(|e| PersistenceError::EncodeFailed(e.to_string()))?;
        document.insert(HISTORY_KEY.to_string(), history);

        let bytes = serde_json::to_vec(&document)
            .map_err(|e| PersistenceError::EncodeFailed(e.to_string()))?;
        let size = bytes.len();
        self.write_atomic(bytes).await?;
        debug!(count = items.len(), bytes = size, "history saved");
        Ok(())
    }
}
