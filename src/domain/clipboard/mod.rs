//! Clipboard domain types

mod item;
mod pasteboard;

pub use item::{human_readable_size, ClipboardContent, ClipboardItem, ClipboardKind};
pub use pasteboard::{PasteboardContents, PasteboardSnapshot, PasteboardType};
