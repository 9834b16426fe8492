//! IPC (Inter-Process Communication) module for daemon control
//!
//! One request line per connection; the daemon answers and closes the
//! stream. Replies are `ok`, `error: <message>`, or a JSON payload for
//! `list`.

mod unix_socket;

pub use unix_socket::{SocketPath, UnixSocketClient, UnixSocketServer};

use std::fmt;
use std::io;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::domain::clipboard::{ClipboardItem, ClipboardKind};

/// A parsed control request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IpcRequest {
    Status,
    Toggle,
    List,
    Paste(usize),
    Delete(Uuid),
    Clear,
    Dismiss,
    /// An external watcher reports the newly focused window
    Foreground(String),
}

impl FromStr for IpcRequest {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (cmd, arg) = match line.split_once(char::is_whitespace) {
            Some((cmd, arg)) => (cmd, Some(arg.trim()).filter(|a| !a.is_empty())),
            None => (line, None),
        };

        match (cmd, arg) {
            ("status", None) => Ok(Self::Status),
            ("toggle", None) => Ok(Self::Toggle),
            ("list", None) => Ok(Self::List),
            ("clear", None) => Ok(Self::Clear),
            ("dismiss", None) => Ok(Self::Dismiss),
            ("paste", Some(arg)) => arg
                .parse()
                .map(Self::Paste)
                .map_err(|_| format!("invalid index: {}", arg)),
            ("delete", Some(arg)) => arg
                .parse()
                .map(Self::Delete)
                .map_err(|_| format!("invalid id: {}", arg)),
            ("foreground", Some(arg)) => Ok(Self::Foreground(arg.to_string())),
            ("paste" | "delete" | "foreground", None) => {
                Err(format!("missing argument for {}", cmd))
            }
            _ => Err("unknown command".to_string()),
        }
    }
}

impl fmt::Display for IpcRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status => write!(f, "status"),
            Self::Toggle => write!(f, "toggle"),
            Self::List => write!(f, "list"),
            Self::Paste(index) => write!(f, "paste {}", index),
            Self::Delete(id) => write!(f, "delete {}", id),
            Self::Clear => write!(f, "clear"),
            Self::Dismiss => write!(f, "dismiss"),
            Self::Foreground(window) => write!(f, "foreground {}", window),
        }
    }
}

/// Request forwarded to the daemon loop together with its reply slot
#[derive(Debug)]
pub struct IpcCommand {
    pub request: IpcRequest,
    pub reply: oneshot::Sender<String>,
}

/// One history entry as reported by `list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySummary {
    pub index: usize,
    pub id: Uuid,
    pub kind: ClipboardKind,
    pub timestamp: DateTime<Utc>,
    pub preview: String,
}

impl EntrySummary {
    pub fn from_item(index: usize, item: &ClipboardItem) -> Self {
        Self {
            index,
            id: item.id(),
            kind: item.kind(),
            timestamp: item.timestamp(),
            preview: item.display_text(),
        }
    }
}

/// Format an error reply
pub fn error_reply(message: impl fmt::Display) -> String {
    format!("error: {}", message)
}

/// Trait for IPC servers that listen for daemon commands
#[async_trait::async_trait]
pub trait IpcServer: Send + Sync {
    /// Bind to the IPC endpoint
    fn bind(&mut self) -> io::Result<()>;

    /// Get the path/name of the IPC endpoint
    fn path(&self) -> String;

    /// Accept connections and forward each parsed request to `tx`.
    /// Malformed requests are answered directly.
    async fn run(&self, tx: mpsc::Sender<IpcCommand>) -> io::Result<()>;

    /// Cleanup IPC resources
    fn cleanup(&self);
}

/// Trait for IPC clients that send commands to the daemon
#[async_trait::async_trait]
pub trait IpcClient: Send + Sync {
    /// Check if daemon appears to be running (endpoint exists)
    fn is_daemon_running(&self) -> bool;

    /// Send a request and read the full reply
    async fn send(&self, request: &IpcRequest) -> io::Result<String>;
}

/// Create the IPC server for the current platform
pub fn create_ipc_server() -> Box<dyn IpcServer> {
    Box::new(UnixSocketServer::new(SocketPath::new()))
}

/// Create the IPC client for the current platform
pub fn create_ipc_client() -> Box<dyn IpcClient> {
    Box::new(UnixSocketClient::new(SocketPath::new()))
}
