//! Pasteboard read model, snapshots and content classification

use std::fmt;

use super::item::ClipboardContent;

/// Pasteboard representations the core distinguishes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PasteboardType {
    FileList,
    Image,
    Url,
    Text,
    /// Any other format advertised by the OS
    Other(String),
}

impl fmt::Display for PasteboardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileList => write!(f, "file-list"),
            Self::Image => write!(f, "image"),
            Self::Url => write!(f, "url"),
            Self::Text => write!(f, "text"),
            Self::Other(name) => write!(f, "{}", name),
        }
    }
}

/// What the OS clipboard holds at one point in time.
///
/// A type listed in `types` whose payload field is `None` was advertised
/// but could not be read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasteboardContents {
    pub types: Vec<PasteboardType>,
    pub files: Option<Vec<String>>,
    pub image: Option<Vec<u8>>,
    pub url: Option<String>,
    pub text: Option<String>,
}

impl PasteboardContents {
    /// Empty clipboard
    pub fn empty() -> Self {
        Self::default()
    }

    /// Clipboard holding plain text
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            types: vec![PasteboardType::Text],
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Check whether a representation is advertised
    pub fn has(&self, kind: &PasteboardType) -> bool {
        self.types.contains(kind)
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Classify the contents into a history payload.
    ///
    /// Priority: file list, image, URL-typed entry, plain text. Plain text
    /// that parses as a URL with a scheme becomes a URL. Returns `None`
    /// when nothing recognised is present or the advertised payload is
    /// unreadable; no fallthrough to lower priorities happens in that case.
    pub fn classify(&self) -> Option<ClipboardContent> {
        if self.has(&PasteboardType::FileList) {
            return self
                .files
                .as_ref()
                .filter(|paths| !paths.is_empty())
                .map(|paths| ClipboardContent::File {
                    paths: paths.clone(),
                });
        }

        if self.has(&PasteboardType::Image) {
            return self
                .image
                .as_ref()
                .map(|data| ClipboardContent::Image { data: data.clone() });
        }

        if self.has(&PasteboardType::Url) {
            return self
                .url
                .as_ref()
                .map(|url| ClipboardContent::Url { url: url.clone() });
        }

        if self.has(&PasteboardType::Text) {
            let text = self.text.as_ref().filter(|text| !text.is_empty())?;
            if looks_like_url(text) {
                return Some(ClipboardContent::Url { url: text.clone() });
            }
            return Some(ClipboardContent::Text { text: text.clone() });
        }

        None
    }
}

/// Text counts as a URL when it parses as one with a non-empty scheme.
/// Whitespace is never part of a URL string.
fn looks_like_url(text: &str) -> bool {
    if text.chars().any(char::is_whitespace) {
        return false;
    }
    url::Url::parse(text)
        .map(|url| !url.scheme().is_empty())
        .unwrap_or(false)
}

/// Full copy of the clipboard plus the change counter at capture time.
/// Only lives for the duration of a paste sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteboardSnapshot {
    pub contents: PasteboardContents,
    pub change_count: u64,
}

impl PasteboardSnapshot {
    pub fn new(contents: PasteboardContents, change_count: u64) -> Self {
        Self {
            contents,
            change_count,
        }
    }
}
