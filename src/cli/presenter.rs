//! CLI presenter for output formatting

use chrono::Local;
use colored::*;

use super::ipc::EntrySummary;

/// Presenter for CLI output formatting
pub struct Presenter;

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print daemon status
    pub fn daemon_status(&self, state: &str) {
        eprintln!("{} Daemon: {}", "●".cyan(), state);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Print history entries, one per line
    pub fn entries(&self, entries: &[EntrySummary]) {
        if entries.is_empty() {
            self.info("History is empty");
            return;
        }
        for entry in entries {
            println!("{}", self.format_entry(entry));
        }
    }

    /// `  0  12:04  text   hello world`
    pub fn format_entry(&self, entry: &EntrySummary) -> String {
        let time = entry.timestamp.with_timezone(&Local).format("%H:%M");
        format!(
            "{:>3}  {}  {:<5}  {}",
            entry.index,
            time.to_string().dimmed(),
            entry.kind.as_str().cyan(),
            entry.preview
        )
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clipboard::ClipboardItem;

    #[test]
    fn format_entry_shows_index_kind_and_preview() {
        colored::control::set_override(false);
        let item = ClipboardItem::text("hello world");
        let entry = EntrySummary::from_item(7, &item);

        let line = Presenter::new().format_entry(&entry);

        assert!(line.starts_with("  7  "));
        assert!(line.contains("text "));
        assert!(line.ends_with("hello world"));
    }
}
