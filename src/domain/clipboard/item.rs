//! Clipboard history item value object

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of characters shown for text items in list views
const DISPLAY_TEXT_CHARS: usize = 100;

/// Coarse classification of a captured clipboard item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipboardKind {
    Text,
    Image,
    File,
    Url,
    Unknown,
}

impl ClipboardKind {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::File => "file",
            Self::Url => "url",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ClipboardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payload of a clipboard item. Exactly one payload exists per kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClipboardContent {
    Text {
        text: String,
    },
    Image {
        #[serde(with = "base64_bytes")]
        data: Vec<u8>,
    },
    File {
        paths: Vec<String>,
    },
    Url {
        url: String,
    },
    Unknown,
}

impl ClipboardContent {
    /// Get the kind of this payload
    pub const fn kind(&self) -> ClipboardKind {
        match self {
            Self::Text { .. } => ClipboardKind::Text,
            Self::Image { .. } => ClipboardKind::Image,
            Self::File { .. } => ClipboardKind::File,
            Self::Url { .. } => ClipboardKind::Url,
            Self::Unknown => ClipboardKind::Unknown,
        }
    }

    /// Kind-specific content equality used for adjacent-duplicate suppression.
    ///
    /// Images compare by byte length only. Unknown never equals anything.
    pub fn same_content(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text { text: a }, Self::Text { text: b }) => a == b,
            (Self::Url { url: a }, Self::Url { url: b }) => a == b,
            (Self::File { paths: a }, Self::File { paths: b }) => a == b,
            (Self::Image { data: a }, Self::Image { data: b }) => a.len() == b.len(),
            _ => false,
        }
    }
}

/// A captured clipboard entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardItem {
    id: Uuid,
    timestamp: DateTime<Utc>,
    #[serde(flatten)]
    content: ClipboardContent,
}

impl ClipboardItem {
    /// Create a new item stamped with a fresh id and the current time
    pub fn new(content: ClipboardContent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            content,
        }
    }

    /// Create a text item
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(ClipboardContent::Text { text: text.into() })
    }

    /// Create an image item from an encoded image blob
    pub fn image(data: Vec<u8>) -> Self {
        Self::new(ClipboardContent::Image { data })
    }

    /// Create a file-list item
    pub fn files(paths: Vec<String>) -> Self {
        Self::new(ClipboardContent::File { paths })
    }

    /// Create a URL item
    pub fn url(url: impl Into<String>) -> Self {
        Self::new(ClipboardContent::Url { url: url.into() })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn kind(&self) -> ClipboardKind {
        self.content.kind()
    }

    pub fn content(&self) -> &ClipboardContent {
        &self.content
    }

    /// Kind-specific content equality (see [`ClipboardContent::same_content`])
    pub fn same_content(&self, other: &Self) -> bool {
        self.content.same_content(&other.content)
    }

    /// Short single-line label for list views and pickers
    pub fn display_text(&self) -> String {
        match &self.content {
            ClipboardContent::Text { text } => {
                let line: String = text.chars().take(DISPLAY_TEXT_CHARS).collect();
                line.replace(['\n', '\r', '\t'], " ")
            }
            ClipboardContent::Url { url } => url.clone(),
            ClipboardContent::File { paths } => match paths.as_slice() {
                [single] => Path::new(single)
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_else(|| single.clone()),
                _ => format!("{} files", paths.len()),
            },
            ClipboardContent::Image { data } => format!("Image ({})", human_readable_size(data.len())),
            ClipboardContent::Unknown => "Unknown item".to_string(),
        }
    }
}

/// Format a byte count for display
pub fn human_readable_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_payload() {
        assert_eq!(ClipboardItem::text("a").kind(), ClipboardKind::Text);
        assert_eq!(ClipboardItem::image(vec![1]).kind(), ClipboardKind::Image);
        assert_eq!(ClipboardItem::files(vec!["/a".into()]).kind(), ClipboardKind::File);
        assert_eq!(ClipboardItem::url("https://x.y").kind(), ClipboardKind::Url);
    }

    #[test]
    fn text_and_url_compare_exactly() {
        assert!(ClipboardItem::text("abc").same_content(&ClipboardItem::text("abc")));
        assert!(!ClipboardItem::text("abc").same_content(&ClipboardItem::text("abd")));
        assert!(ClipboardItem::url("https://a").same_content(&ClipboardItem::url("https://a")));
    }

    #[test]
    fn different_kinds_never_equal() {
        let text = ClipboardItem::text("https://a");
        let url = ClipboardItem::url("https://a");
        assert!(!text.same_content(&url));
    }

    #[test]
    fn file_lists_compare_in_order() {
        let a = ClipboardItem::files(vec!["/a".into(), "/b".into()]);
        let b = ClipboardItem::files(vec!["/a".into(), "/b".into()]);
        let reversed = ClipboardItem::files(vec!["/b".into(), "/a".into()]);
        assert!(a.same_content(&b));
        assert!(!a.same_content(&reversed));
    }

    #[test]
    fn images_compare_by_length_only() {
        let a = ClipboardItem::image(vec![1, 2, 3]);
        let b = ClipboardItem::image(vec![9, 9, 9]);
        let c = ClipboardItem::image(vec![1, 2]);
        assert!(a.same_content(&b));
        assert!(!a.same_content(&c));
    }

    #[test]
    fn unknown_is_never_equal() {
        let a = ClipboardItem::new(ClipboardContent::Unknown);
        let b = ClipboardItem::new(ClipboardContent::Unknown);
        assert!(!a.same_content(&b));
        assert!(!a.same_content(&a.clone()));
    }

    #[test]
    fn new_items_get_distinct_ids() {
        let a = ClipboardItem::text("x");
        let b = ClipboardItem::text("x");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn display_text_truncates_and_flattens() {
        let long = "a\nb".repeat(80);
        let shown = ClipboardItem::text(long).display_text();
        assert_eq!(shown.chars().count(), DISPLAY_TEXT_CHARS);
        assert!(!shown.contains('\n'));
    }

    #[test]
    fn display_text_for_files() {
        let one = ClipboardItem::files(vec!["/home/me/report.pdf".into()]);
        assert_eq!(one.display_text(), "report.pdf");
        let many = ClipboardItem::files(vec!["/a".into(), "/b".into(), "/c".into()]);
        assert_eq!(many.display_text(), "3 files");
    }

    #[test]
    fn display_text_for_image() {
        let image = ClipboardItem::image(vec![0u8; 2048]);
        assert_eq!(image.display_text(), "Image (2.0 KB)");
    }

    #[test]
    fn serialized_form_carries_kind_tag() {
        let item = ClipboardItem::image(vec![1, 2, 3, 4]);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["kind"], "image");
        assert_eq!(json["data"], "AQIDBA==");
        assert!(json["id"].is_string());
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn human_readable_sizes() {
        assert_eq!(human_readable_size(500), "500 B");
        assert_eq!(human_readable_size(2 * 1024 * 1024), "2.0 MB");
    }
}
