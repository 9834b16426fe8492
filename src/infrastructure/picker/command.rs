//! External picker command adapter (dmenu, rofi, fzf, ...)

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tracing::debug;

use crate::application::ports::{Picker, PickerError};

/// Runs a shell command that reads one entry per line on stdin and prints
/// the chosen line, or its 0-based index, on stdout.
///
/// The child is killed when the pick future is dropped, so aborting the
/// task dismisses the picker.
pub struct CommandPicker {
    command: String,
}

impl CommandPicker {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

#[async_trait]
impl Picker for CommandPicker {
    async fn pick(&self, entries: Vec<String>) -> Result<Option<usize>, PickerError> {
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| PickerError::LaunchFailed(format!("{}: {}", self.command, e)))?;

        let lines: Vec<String> = entries.iter().map(|e| one_line(e)).collect();

        if let Some(mut stdin) = child.stdin.take() {
            let input = lines.join("\n") + "\n";
            // A picker that exits before reading everything is not an error
            if let Err(e) = stdin.write_all(input.as_bytes()).await {
                debug!(error = %e, "picker closed stdin early");
            }
        }

        let mut output = String::new();
        if let Some(mut stdout) = child.stdout.take() {
            stdout
                .read_to_string(&mut output)
                .await
                .map_err(|e| PickerError::Io(e.to_string()))?;
        }

        let status = child
            .wait()
            .await
            .map_err(|e| PickerError::Io(e.to_string()))?;

        if !status.success() {
            debug!(%status, "picker dismissed");
            return Ok(None);
        }

        Ok(parse_selection(&output, &lines))
    }
}

/// Entries must not break the one-entry-per-line contract
fn one_line(entry: &str) -> String {
    entry.replace(['\n', '\r'], " ")
}

fn parse_selection(output: &str, lines: &[String]) -> Option<usize> {
    let chosen = output.lines().next()?.trim_end_matches('\r');
    if chosen.trim().is_empty() {
        return None;
    }

    if let Some(index) = lines.iter().position(|l| l == chosen) {
        return Some(index);
    }

    chosen
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|&index| index < lines.len())
}
