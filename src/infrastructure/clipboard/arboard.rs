//! Cross-platform clipboard adapter using arboard
//!
//! Works on Windows, macOS, and Linux (X11/Wayland). arboard exposes no
//! change counter, so one is derived from a content fingerprint: every
//! observed content change and every own write advances it by one.

use std::borrow::Cow;
use std::io::Cursor;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::{ClipboardError, ClipboardPort};
use crate::domain::clipboard::{
    ClipboardContent, ClipboardItem, PasteboardContents, PasteboardSnapshot, PasteboardType,
};

struct State {
    /// Kept alive so that content we own survives on Linux
    clipboard: Option<arboard::Clipboard>,
    fingerprint: Option<blake3::Hash>,
    change_count: u64,
}

impl State {
    fn clipboard(&mut self) -> Result<&mut arboard::Clipboard, ClipboardError> {
        if self.clipboard.is_none() {
            let clipboard = arboard::Clipboard::new()
                .map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            self.clipboard = Some(clipboard);
        }
        self.clipboard
            .as_mut()
            .ok_or_else(|| ClipboardError::Unavailable("clipboard not initialised".into()))
    }

    /// Re-fingerprint after our own write and count it as one change.
    fn record_own_write(&mut self) -> Result<(), ClipboardError> {
        let fingerprint = fingerprint(self.clipboard()?);
        self.fingerprint = Some(fingerprint);
        self.change_count += 1;
        Ok(())
    }
}

/// Cross-platform clipboard adapter using arboard
#[derive(Clone)]
pub struct ArboardClipboard {
    state: Arc<Mutex<State>>,
}

impl ArboardClipboard {
    /// Create a new arboard clipboard adapter. The OS clipboard is opened
    /// on first use.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                clipboard: None,
                fingerprint: None,
                change_count: 0,
            })),
        }
    }

    /// Run `f` on a blocking thread with the adapter state locked.
    async fn with_state<T, F>(&self, f: F) -> Result<T, ClipboardError>
    where
        T: Send + 'static,
        F: FnOnce(&mut State) -> Result<T, ClipboardError> + Send + 'static,
    {
        let state = Arc::clone(&self.state);

        // arboard operations are blocking, so run in spawn_blocking
        tokio::task::spawn_blocking(move || {
            let mut guard = lock(&state);
            f(&mut guard)
        })
        .await
        .map_err(|e| ClipboardError::Unavailable(format!("Task join error: {}", e)))?
    }
}

impl Default for ArboardClipboard {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClipboardPort for ArboardClipboard {
    async fn change_count(&self) -> Result<u64, ClipboardError> {
        self.with_state(|state| {
            let current = fingerprint(state.clipboard()?);
            match state.fingerprint {
                Some(previous) if previous != current => state.change_count += 1,
                _ => {}
            }
            state.fingerprint = Some(current);
            Ok(state.change_count)
        })
        .await
    }

    async fn read(&self) -> Result<PasteboardContents, ClipboardError> {
        self.with_state(|state| Ok(read_contents(state.clipboard()?)))
            .await
    }

    async fn write(&self, item: &ClipboardItem) -> Result<(), ClipboardError> {
        let content = item.content().clone();
        self.with_state(move |state| {
            write_content(state.clipboard()?, &content)?;
            state.record_own_write()
        })
        .await
    }

    async fn snapshot(&self) -> Result<PasteboardSnapshot, ClipboardError> {
        self.with_state(|state| {
            let contents = read_contents(state.clipboard()?);
            Ok(PasteboardSnapshot::new(contents, state.change_count))
        })
        .await
    }

    async fn restore(&self, snapshot: &PasteboardSnapshot) -> Result<(), ClipboardError> {
        let contents = snapshot.contents.clone();
        self.with_state(move |state| {
            restore_contents(state.clipboard()?, &contents)?;
            state.record_own_write()
        })
        .await
    }
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Cheap identity of the current clipboard content. Images are hashed on
/// their raw pixels so no PNG encoding happens per tick.
fn fingerprint(clipboard: &mut arboard::Clipboard) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    if let Ok(image) = clipboard.get_image() {
        hasher.update(b"image");
        hasher.update(&(image.width as u64).to_le_bytes());
        hasher.update(&(image.height as u64).to_le_bytes());
        hasher.update(&image.bytes);
    }
    if let Ok(text) = clipboard.get_text() {
        hasher.update(b"text");
        hasher.update(text.as_bytes());
    }
    hasher.finalize()
}

fn read_contents(clipboard: &mut arboard::Clipboard) -> PasteboardContents {
    let mut contents = PasteboardContents::empty();

    match clipboard.get_image() {
        Ok(image) => {
            contents.types.push(PasteboardType::Image);
            contents.image = rgba_to_png(&image);
        }
        Err(arboard::Error::ContentNotAvailable) => {}
        Err(e) => {
            debug!(error = %e, "clipboard image unreadable");
            contents.types.push(PasteboardType::Image);
        }
    }

    match clipboard.get_text() {
        Ok(text) => match parse_file_uris(&text) {
            Some(paths) => {
                contents.types.push(PasteboardType::FileList);
                contents.files = Some(paths);
            }
            None => {
                contents.types.push(PasteboardType::Text);
                contents.text = Some(text);
            }
        },
        Err(arboard::Error::ContentNotAvailable) => {}
        Err(e) => {
            debug!(error = %e, "clipboard text unreadable");
            contents.types.push(PasteboardType::Text);
        }
    }

    contents
}

fn write_content(
    clipboard: &mut arboard::Clipboard,
    content: &ClipboardContent,
) -> Result<(), ClipboardError> {
    let result = match content {
        ClipboardContent::Text { text } => clipboard.set_text(text.as_str()),
        ClipboardContent::Url { url } => clipboard.set_text(url.as_str()),
        ClipboardContent::File { paths } => clipboard.set_text(to_file_uris(paths)),
        ClipboardContent::Image { data } => clipboard.set_image(png_to_rgba(data)?),
        ClipboardContent::Unknown => clipboard.clear(),
    };
    result.map_err(|e| ClipboardError::WriteFailed(e.to_string()))
}

/// arboard holds one representation at a time; the richest readable one wins.
fn restore_contents(
    clipboard: &mut arboard::Clipboard,
    contents: &PasteboardContents,
) -> Result<(), ClipboardError> {
    let content = if let Some(data) = &contents.image {
        ClipboardContent::Image { data: data.clone() }
    } else if let Some(paths) = &contents.files {
        ClipboardContent::File {
            paths: paths.clone(),
        }
    } else if let Some(text) = contents.text.as_ref().or(contents.url.as_ref()) {
        ClipboardContent::Text { text: text.clone() }
    } else {
        ClipboardContent::Unknown
    };
    write_content(clipboard, &content)
}

/// Encode arboard's RGBA pixels as PNG
fn rgba_to_png(image: &arboard::ImageData) -> Option<Vec<u8>> {
    let buffer = image::RgbaImage::from_raw(
        image.width as u32,
        image.height as u32,
        image.bytes.to_vec(),
    )?;

    let mut png = Vec::new();
    match image::DynamicImage::ImageRgba8(buffer).write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png) {
        Ok(()) => Some(png),
        Err(e) => {
            debug!(error = %e, "failed to encode clipboard image as PNG");
            None
        }
    }
}

fn png_to_rgba(data: &[u8]) -> Result<arboard::ImageData<'static>, ClipboardError> {
    let decoded = image::load_from_memory_with_format(data, image::ImageFormat::Png)
        .map_err(|e| ClipboardError::WriteFailed(format!("invalid image data: {}", e)))?
        .into_rgba8();

    Ok(arboard::ImageData {
        width: decoded.width() as usize,
        height: decoded.height() as usize,
        bytes: Cow::Owned(decoded.into_raw()),
    })
}

/// Interpret text as a `text/uri-list` of local files.
fn parse_file_uris(text: &str) -> Option<Vec<String>> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .collect();
    if lines.is_empty() {
        return None;
    }

    lines
        .into_iter()
        .map(|line| {
            let url = url::Url::parse(line).ok().filter(|u| u.scheme() == "file")?;
            let path = url.to_file_path().ok()?;
            Some(path.to_string_lossy().into_owned())
        })
        .collect()
}

fn to_file_uris(paths: &[String]) -> String {
    paths
        .iter()
        .map(|p| {
            url::Url::from_file_path(p)
                .map(|u| u.to_string())
                .unwrap_or_else(|()| p.clone())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipboard_creates_without_touching_os() {
        let clipboard = ArboardClipboard::new();
        assert!(lock(&clipboard.state).clipboard.is_none());
    }

    #[test]
    fn clipboard_default_creates() {
        let _clipboard = ArboardClipboard::default();
    }

    #[cfg(unix)]
    #[test]
    fn file_uri_list_parses_to_paths() {
        let paths = parse_file_uris("file:///tmp/a.txt\r\nfile:///tmp/my%20dir/b.png\n").unwrap();
        assert_eq!(paths, vec!["/tmp/a.txt", "/tmp/my dir/b.png"]);
    }

    #[test]
    fn plain_text_is_not_a_file_list() {
        assert!(parse_file_uris("hello world").is_none());
        assert!(parse_file_uris("file:///tmp/a\nnot a uri").is_none());
        assert!(parse_file_uris("https://example.com").is_none());
        assert!(parse_file_uris("   ").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn file_uris_round_trip() {
        let paths = vec!["/tmp/a.txt".to_string(), "/home/u/my file".to_string()];
        let text = to_file_uris(&paths);
        assert_eq!(parse_file_uris(&text).unwrap(), paths);
    }

    #[test]
    fn png_encoding_round_trips_pixels() {
        let image = arboard::ImageData {
            width: 2,
            height: 1,
            bytes: Cow::Owned(vec![255, 0, 0, 255, 0, 255, 0, 255]),
        };

        let png = rgba_to_png(&image).unwrap();
        let decoded = png_to_rgba(&png).unwrap();

        assert_eq!(decoded.width, 2);
        assert_eq!(decoded.height, 1);
        assert_eq!(decoded.bytes.as_ref(), image.bytes.as_ref());
    }

    #[test]
    fn invalid_png_is_rejected() {
        assert!(png_to_rgba(b"not a png").is_err());
    }
}
