//! Clipboard monitor use case

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::domain::clipboard::{ClipboardItem, ClipboardKind};

use super::history::SharedHistory;
use super::ports::{ClipboardPort, HistoryPersistence};

/// Something that can be told to ignore upcoming self-caused clipboard changes
pub trait ChangeSuppressor: Send + Sync {
    /// Ignore the next `n` detected changes.
    fn suppress(&self, n: u32);

    /// Withdraw up to `n` pending suppressions (the write they covered failed).
    fn unsuppress(&self, n: u32);
}

/// Result of one polling tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Change counter unchanged
    Unchanged,
    /// Change consumed by a pending suppression
    Suppressed { remaining: u32 },
    /// Change classified and handed to the history
    Captured(ClipboardKind),
    /// Change detected but nothing capturable could be read
    Skipped,
    /// Change counter could not be read
    Unavailable,
}

/// Polls the clipboard change counter and feeds new content into the history.
pub struct ClipboardMonitor<C, P>
where
    C: ClipboardPort,
    P: HistoryPersistence,
{
    clipboard: C,
    history: SharedHistory<P>,
    last_change: Mutex<Option<u64>>,
    suppressed: AtomicU32,
    poll_interval: Duration,
}

impl<C, P> ClipboardMonitor<C, P>
where
    C: ClipboardPort,
    P: HistoryPersistence,
{
    pub fn new(clipboard: C, history: SharedHistory<P>, poll_interval: Duration) -> Self {
        Self {
            clipboard,
            history,
            last_change: Mutex::new(None),
            suppressed: AtomicU32::new(0),
            poll_interval,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Periodic timer for driving [`tick`](Self::tick). Late ticks are skipped,
    /// never bunched.
    pub fn ticker(&self) -> Interval {
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker
    }

    /// Record the current change counter so content already on the
    /// clipboard at startup is not captured.
    pub async fn prime(&self) {
        let mut last = self.last_change.lock().await;
        match self.clipboard.change_count().await {
            Ok(count) => {
                *last = Some(count);
                info!(
                    change_count = count,
                    interval_ms = self.poll_interval.as_millis() as u64,
                    "clipboard monitor started"
                );
            }
            Err(e) => warn!(error = %e, "clipboard unavailable at startup"),
        }
    }

    /// Suppressions not yet consumed
    pub fn pending_suppressions(&self) -> u32 {
        self.suppressed.load(Ordering::SeqCst)
    }

    /// Check the change counter once and capture a real change.
    pub async fn tick(&self) -> TickOutcome {
        let mut last = self.last_change.lock().await;

        let current = match self.clipboard.change_count().await {
            Ok(count) => count,
            Err(e) => {
                debug!(error = %e, "clipboard change counter unavailable");
                return TickOutcome::Unavailable;
            }
        };

        let previous = last.replace(current);
        let changes = match previous {
            Some(prev) if prev == current => return TickOutcome::Unchanged,
            // First successful read only establishes the baseline
            None => return TickOutcome::Unchanged,
            // One counter step per write; a counter that went backwards
            // counts as a single change
            Some(prev) => current
                .checked_sub(prev)
                .and_then(|delta| u32::try_from(delta).ok())
                .unwrap_or(1),
        };

        let (consumed, remaining) = self.take_suppressions(changes);
        if consumed == changes {
            debug!(
                change_count = current,
                consumed,
                remaining,
                "ignored self-caused clipboard change"
            );
            return TickOutcome::Suppressed { remaining };
        }
        if consumed > 0 {
            debug!(
                change_count = current,
                consumed,
                changes,
                "external change mixed with self-caused ones"
            );
        }

        let contents = match self.clipboard.read().await {
            Ok(contents) => contents,
            Err(e) => {
                debug!(error = %e, "skipping unreadable clipboard change");
                return TickOutcome::Skipped;
            }
        };

        let Some(content) = contents.classify() else {
            debug!(types = ?contents.types, "nothing capturable on clipboard");
            return TickOutcome::Skipped;
        };

        let kind = content.kind();
        self.history.lock().await.add(ClipboardItem::new(content)).await;
        debug!(%kind, change_count = current, "captured clipboard change");
        TickOutcome::Captured(kind)
    }

    /// Consume up to `changes` pending suppressions; returns (consumed, remaining).
    fn take_suppressions(&self, changes: u32) -> (u32, u32) {
        let prev = self
            .suppressed
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                Some(n.saturating_sub(changes))
            })
            .unwrap_or_else(|n| n);
        let consumed = prev.min(changes);
        (consumed, prev - consumed)
    }
}

impl<C, P> ChangeSuppressor for ClipboardMonitor<C, P>
where
    C: ClipboardPort,
    P: HistoryPersistence,
{
    fn suppress(&self, n: u32) {
        let prev = self.suppressed.fetch_add(n, Ordering::SeqCst);
        debug!(pending = prev.saturating_add(n), "suppressing clipboard changes");
    }

    fn unsuppress(&self, n: u32) {
        let _ = self
            .suppressed
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |c| Some(c.saturating_sub(n)));
    }
}

impl<T: ChangeSuppressor + ?Sized> ChangeSuppressor for std::sync::Arc<T> {
    fn suppress(&self, n: u32) {
        self.as_ref().suppress(n)
    }

    fn unsuppress(&self, n: u32) {
        self.as_ref().unsuppress(n)
    }
}
