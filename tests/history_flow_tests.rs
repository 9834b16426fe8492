//! Capture, persist and paste-back flow over fake platform ports

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pasteback::application::ports::{
    AppHandle, ClipboardError, ClipboardPort, ForegroundApp, ForegroundError, KeySimulator,
    KeySimulatorError, PermissionPort, Picker, PickerError,
};
use pasteback::application::{
    CancelToken, ClipboardMonitor, HistoryStore, PasteConfig, PasteError, PasteOrchestrator,
    PasteSession, SessionState, SharedHistory, TickOutcome,
};
use pasteback::domain::clipboard::{
    ClipboardContent, ClipboardItem, ClipboardKind, PasteboardContents, PasteboardSnapshot,
    PasteboardType,
};
use pasteback::domain::hotkey::KeyCombo;
use pasteback::infrastructure::notification::SilentNotifier;
use pasteback::infrastructure::JsonFileHistoryStore;
use tempfile::TempDir;
use tokio::sync::oneshot;

type Log = Arc<Mutex<Vec<String>>>;

/// In-memory clipboard with a write counter
struct FakeClipboard {
    contents: Mutex<PasteboardContents>,
    count: Mutex<u64>,
    log: Log,
}

impl FakeClipboard {
    fn new(log: Log) -> Self {
        Self {
            contents: Mutex::new(PasteboardContents::empty()),
            count: Mutex::new(0),
            log,
        }
    }

    /// A change made by some other application
    fn user_copy(&self, contents: PasteboardContents) {
        *self.contents.lock().unwrap() = contents;
        *self.count.lock().unwrap() += 1;
    }

    fn current_text(&self) -> Option<String> {
        self.contents.lock().unwrap().text.clone()
    }
}

fn contents_of(item: &ClipboardItem) -> PasteboardContents {
    match item.content() {
        ClipboardContent::Text { text } => PasteboardContents::with_text(text.clone()),
        ClipboardContent::Url { url } => PasteboardContents {
            types: vec![PasteboardType::Url, PasteboardType::Text],
            url: Some(url.clone()),
            text: Some(url.clone()),
            ..Default::default()
        },
        ClipboardContent::Image { data } => PasteboardContents {
            types: vec![PasteboardType::Image],
            image: Some(data.clone()),
            ..Default::default()
        },
        ClipboardContent::File { paths } => PasteboardContents {
            types: vec![PasteboardType::FileList],
            files: Some(paths.clone()),
            ..Default::default()
        },
        ClipboardContent::Unknown => PasteboardContents::empty(),
    }
}

#[async_trait]
impl ClipboardPort for FakeClipboard {
    async fn change_count(&self) -> Result<u64, ClipboardError> {
        Ok(*self.count.lock().unwrap())
    }

    async fn read(&self) -> Result<PasteboardContents, ClipboardError> {
        Ok(self.contents.lock().unwrap().clone())
    }

    async fn write(&self, item: &ClipboardItem) -> Result<(), ClipboardError> {
        self.log.lock().unwrap().push("write".into());
        self.user_copy(contents_of(item));
        Ok(())
    }

    async fn restore(&self, snapshot: &PasteboardSnapshot) -> Result<(), ClipboardError> {
        self.log.lock().unwrap().push("restore".into());
        self.user_copy(snapshot.contents.clone());
        Ok(())
    }
}

struct FakeKeys(Log);

#[async_trait]
impl KeySimulator for FakeKeys {
    async fn press_combo(&self, combo: &KeyCombo) -> Result<(), KeySimulatorError> {
        self.0.lock().unwrap().push(format!("key {}", combo));
        Ok(())
    }
}

struct FakePermission {
    granted: bool,
}

#[async_trait]
impl PermissionPort for FakePermission {
    async fn is_granted(&self) -> bool {
        self.granted
    }

    async fn request_prompt(&self) -> bool {
        false
    }

    fn guidance_link(&self) -> &str {
        "https://example.invalid/grant"
    }
}

struct FakeForeground {
    previous: Mutex<Option<AppHandle>>,
    log: Log,
}

#[async_trait]
impl ForegroundApp for FakeForeground {
    async fn capture_current(&self) -> Result<Option<AppHandle>, ForegroundError> {
        Ok(self.previous())
    }

    fn remember(&self, app: AppHandle) {
        *self.previous.lock().unwrap() = Some(app);
    }

    fn previous(&self) -> Option<AppHandle> {
        self.previous.lock().unwrap().clone()
    }

    async fn activate(&self, app: &AppHandle) -> Result<(), ForegroundError> {
        self.log.lock().unwrap().push(format!("activate {}", app));
        Ok(())
    }
}

/// Picker that shows entries and answers once told to
struct FakePicker {
    shown: Mutex<Vec<Vec<String>>>,
    answer: Mutex<Option<oneshot::Receiver<Option<usize>>>>,
}

impl FakePicker {
    /// Stays open until closed from outside
    fn never() -> Arc<Self> {
        Arc::new(Self {
            shown: Mutex::default(),
            answer: Mutex::new(None),
        })
    }

    fn answering() -> (oneshot::Sender<Option<usize>>, Arc<Self>) {
        let (tx, rx) = oneshot::channel();
        let picker = Self {
            shown: Mutex::default(),
            answer: Mutex::new(Some(rx)),
        };
        (tx, Arc::new(picker))
    }

    fn shown(&self) -> Vec<Vec<String>> {
        self.shown.lock().unwrap().clone()
    }
}

#[async_trait]
impl Picker for FakePicker {
    async fn pick(&self, entries: Vec<String>) -> Result<Option<usize>, PickerError> {
        self.shown.lock().unwrap().push(entries);
        let answer = self.answer.lock().unwrap().take();
        match answer {
            Some(rx) => Ok(rx.await.unwrap_or(None)),
            None => std::future::pending().await,
        }
    }
}

type Monitor = ClipboardMonitor<Arc<FakeClipboard>, JsonFileHistoryStore>;
type Orchestrator =
    PasteOrchestrator<Arc<FakeClipboard>, FakeKeys, FakePermission, FakeForeground, Arc<Monitor>>;
type Session = PasteSession<
    Arc<FakeClipboard>,
    FakeKeys,
    FakePermission,
    FakeForeground,
    Arc<Monitor>,
    JsonFileHistoryStore,
>;

struct Harness {
    _dir: TempDir,
    store_path: std::path::PathBuf,
    log: Log,
    clipboard: Arc<FakeClipboard>,
    history: SharedHistory<JsonFileHistoryStore>,
    monitor: Arc<Monitor>,
}

impl Harness {
    async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let store_path = dir.path().join("store.json");
        let log: Log = Arc::default();
        let clipboard = Arc::new(FakeClipboard::new(log.clone()));

        let history = HistoryStore::load(JsonFileHistoryStore::with_path(&store_path))
            .await
            .shared();
        let monitor = Arc::new(ClipboardMonitor::new(
            clipboard.clone(),
            history.clone(),
            Duration::from_millis(500),
        ));
        monitor.prime().await;

        Self {
            _dir: dir,
            store_path,
            log,
            clipboard,
            history,
            monitor,
        }
    }

    fn orchestrator(&self, config: PasteConfig, granted: bool) -> Orchestrator {
        let foreground = FakeForeground {
            previous: Mutex::new(None),
            log: self.log.clone(),
        };
        foreground.remember(AppHandle::new("editor"));

        PasteOrchestrator::new(
            self.clipboard.clone(),
            FakeKeys(self.log.clone()),
            FakePermission { granted },
            foreground,
            self.monitor.clone(),
            config,
        )
    }

    fn session(&self, config: PasteConfig, picker: Option<Arc<FakePicker>>) -> Session {
        PasteSession::new(
            self.history.clone(),
            Arc::new(self.orchestrator(config, true)),
            Arc::new(SilentNotifier),
            picker.map(|p| p as Arc<dyn Picker>),
        )
    }

    /// Yield until the running paste sequence has restored focus
    async fn wait_for_activation(&self) {
        while !self.log().iter().any(|step| step.starts_with("activate")) {
            tokio::task::yield_now().await;
        }
    }

    async fn copy(&self, text: &str) -> TickOutcome {
        self.clipboard.user_copy(PasteboardContents::with_text(text));
        self.monitor.tick().await
    }

    async fn texts(&self) -> Vec<String> {
        self.history
            .lock()
            .await
            .list()
            .iter()
            .map(ClipboardItem::display_text)
            .collect()
    }

    fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

fn quick(preserve_clipboard: bool) -> PasteConfig {
    PasteConfig {
        preserve_clipboard,
        activation_delay: Duration::from_millis(5),
        restore_delay: Duration::from_millis(5),
    }
}

#[tokio::test]
async fn startup_content_is_not_captured() {
    let harness = Harness::new().await;

    assert_eq!(harness.monitor.tick().await, TickOutcome::Unchanged);
    assert!(harness.history.lock().await.is_empty());
}

#[tokio::test]
async fn copies_are_captured_newest_first() {
    let harness = Harness::new().await;

    assert_eq!(harness.copy("one").await, TickOutcome::Captured(ClipboardKind::Text));
    assert_eq!(
        harness.copy("https://example.com/two").await,
        TickOutcome::Captured(ClipboardKind::Url)
    );
    assert_eq!(harness.copy("three").await, TickOutcome::Captured(ClipboardKind::Text));

    assert_eq!(
        harness.texts().await,
        vec!["three", "https://example.com/two", "one"]
    );
}

#[tokio::test]
async fn repeated_copy_of_head_is_ignored() {
    let harness = Harness::new().await;

    harness.copy("same").await;
    harness.copy("same").await;
    harness.copy("other").await;
    harness.copy("same").await;

    assert_eq!(harness.texts().await, vec!["same", "other", "same"]);
}

#[tokio::test]
async fn history_survives_restart() {
    let harness = Harness::new().await;
    harness.copy("kept").await;
    harness.clipboard.user_copy(PasteboardContents {
        types: vec![PasteboardType::FileList],
        files: Some(vec!["/tmp/a.txt".into(), "/tmp/b.txt".into()]),
        ..Default::default()
    });
    harness.monitor.tick().await;
    harness.clipboard.user_copy(PasteboardContents {
        types: vec![PasteboardType::Image],
        image: Some(vec![137, 80, 78, 71, 1, 2, 3]),
        ..Default::default()
    });
    harness.monitor.tick().await;

    let before: Vec<ClipboardItem> = harness.history.lock().await.list().to_vec();
    let reloaded = HistoryStore::load(JsonFileHistoryStore::with_path(&harness.store_path)).await;

    assert_eq!(reloaded.list(), before.as_slice());
    assert_eq!(
        reloaded.list().iter().map(ClipboardItem::kind).collect::<Vec<_>>(),
        vec![ClipboardKind::Image, ClipboardKind::File, ClipboardKind::Text]
    );
}

#[tokio::test]
async fn deleted_and_cleared_items_stay_gone_after_restart() {
    let harness = Harness::new().await;
    harness.copy("a").await;
    harness.copy("b").await;

    let id = harness.history.lock().await.get(1).unwrap().id();
    harness.history.lock().await.delete(id).await;
    let reloaded = HistoryStore::load(JsonFileHistoryStore::with_path(&harness.store_path)).await;
    assert_eq!(reloaded.len(), 1);
    assert!(reloaded.find(id).is_none());

    harness.history.lock().await.clear().await;
    let reloaded = HistoryStore::load(JsonFileHistoryStore::with_path(&harness.store_path)).await;
    assert!(reloaded.is_empty());
}

#[tokio::test]
async fn pasted_item_is_not_recaptured() {
    let harness = Harness::new().await;
    harness.copy("first").await;
    harness.copy("second").await;

    let item = harness.history.lock().await.get(1).cloned().unwrap();
    let orchestrator = harness.orchestrator(quick(false), true);
    let outcome = orchestrator.paste(&item, &CancelToken::new()).await.unwrap();

    assert!(outcome.paste_sent);
    assert!(outcome.focus_restored);
    assert_eq!(harness.clipboard.current_text().as_deref(), Some("first"));
    assert_eq!(harness.monitor.tick().await, TickOutcome::Suppressed { remaining: 0 });
    assert_eq!(harness.texts().await, vec!["second", "first"]);

    // The next real copy is captured normally
    assert_eq!(harness.copy("third").await, TickOutcome::Captured(ClipboardKind::Text));
    assert_eq!(harness.texts().await, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn paste_steps_run_in_order() {
    let harness = Harness::new().await;
    harness.copy("payload").await;

    let item = harness.history.lock().await.get(0).cloned().unwrap();
    harness
        .orchestrator(quick(false), true)
        .paste(&item, &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(
        harness.log(),
        vec![
            "write".to_string(),
            "activate editor".to_string(),
            format!("key {}", KeyCombo::paste()),
        ]
    );
}

#[tokio::test]
async fn preserved_clipboard_is_restored_without_new_history() {
    let harness = Harness::new().await;
    harness.copy("old").await;
    harness.copy("current").await;

    let item = harness.history.lock().await.get(1).cloned().unwrap();
    let outcome = harness
        .orchestrator(quick(true), true)
        .paste(&item, &CancelToken::new())
        .await
        .unwrap();

    assert!(outcome.clipboard_restored);
    assert_eq!(harness.clipboard.current_text().as_deref(), Some("current"));
    assert_eq!(harness.log().first().map(String::as_str), Some("write"));
    assert_eq!(harness.log().last().map(String::as_str), Some("restore"));

    for _ in 0..3 {
        assert!(!matches!(
            harness.monitor.tick().await,
            TickOutcome::Captured(_)
        ));
    }
    assert_eq!(harness.texts().await, vec!["current", "old"]);
}

#[tokio::test]
async fn denied_permission_leaves_clipboard_untouched() {
    let harness = Harness::new().await;
    harness.copy("keep me").await;

    let item = ClipboardItem::text("never written");
    let result = harness
        .orchestrator(quick(false), false)
        .paste(&item, &CancelToken::new())
        .await;

    assert!(matches!(result, Err(PasteError::PermissionDenied { .. })));
    assert!(harness.log().is_empty());
    assert_eq!(harness.monitor.pending_suppressions(), 0);
    assert_eq!(harness.clipboard.current_text().as_deref(), Some("keep me"));
}

#[tokio::test]
async fn cancelled_paste_skips_keystroke_and_restores() {
    let harness = Harness::new().await;
    harness.copy("before").await;

    let config = PasteConfig {
        preserve_clipboard: true,
        activation_delay: Duration::from_secs(30),
        restore_delay: Duration::from_secs(30),
    };
    let orchestrator = Arc::new(harness.orchestrator(config, true));
    let cancel = CancelToken::new();
    let item = ClipboardItem::text("interrupted");

    let task = {
        let orchestrator = orchestrator.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { orchestrator.paste(&item, &cancel).await })
    };

    // Let the sequence reach its activation delay
    while !harness.log().iter().any(|step| step.starts_with("activate")) {
        tokio::task::yield_now().await;
    }
    cancel.cancel();

    let outcome = tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .unwrap()
        .unwrap()
        .unwrap();

    assert!(outcome.cancelled);
    assert!(!outcome.paste_sent);
    assert!(outcome.clipboard_restored);
    assert!(!harness.log().iter().any(|step| step.starts_with("key")));
    assert_eq!(harness.clipboard.current_text().as_deref(), Some("before"));

    // Write and restore landed in one poll; both are ignored, nothing more
    assert_eq!(harness.monitor.tick().await, TickOutcome::Suppressed { remaining: 0 });
    assert_eq!(harness.copy("after").await, TickOutcome::Captured(ClipboardKind::Text));
}

#[tokio::test]
async fn secondary_combos_are_sent_in_order() {
    let harness = Harness::new().await;
    let combos: Vec<KeyCombo> = ["Super+Space", "Super+4"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();

    harness
        .orchestrator(quick(false), true)
        .send_combos(&combos, Duration::from_millis(1))
        .await
        .unwrap();

    assert_eq!(
        harness.log(),
        vec![format!("key {}", combos[0]), format!("key {}", combos[1])]
    );
}

#[tokio::test(start_paused = true)]
async fn next_copy_after_preserving_paste_is_captured() {
    let harness = Harness::new().await;
    harness.copy("old").await;
    harness.copy("current").await;

    let item = harness.history.lock().await.get(1).cloned().unwrap();
    let config = PasteConfig {
        preserve_clipboard: true,
        ..PasteConfig::default()
    };
    harness
        .orchestrator(config, true)
        .paste(&item, &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(harness.monitor.tick().await, TickOutcome::Suppressed { remaining: 0 });
    assert_eq!(harness.monitor.pending_suppressions(), 0);
    assert_eq!(
        harness.copy("user copies this").await,
        TickOutcome::Captured(ClipboardKind::Text)
    );
    assert_eq!(harness.texts().await, vec!["user copies this", "current", "old"]);
}

#[tokio::test(start_paused = true)]
async fn new_paste_cancels_running_one_and_waits_for_its_restore() {
    let harness = Harness::new().await;
    harness.copy("before").await;

    let config = PasteConfig {
        preserve_clipboard: true,
        activation_delay: Duration::from_secs(30),
        restore_delay: Duration::from_secs(30),
    };
    let mut session = harness.session(config, None);

    session.start_paste(ClipboardItem::text("first"));
    harness.wait_for_activation().await;
    assert_eq!(session.state(), SessionState::Pasting);

    session.start_paste(ClipboardItem::text("second"));
    session.join_paste().await;

    // The first sequence is cut short and restores before the second writes
    let paste_key = format!("key {}", KeyCombo::paste());
    assert_eq!(
        harness.log(),
        vec![
            "write".to_string(),
            "activate editor".to_string(),
            "restore".to_string(),
            "write".to_string(),
            "activate editor".to_string(),
            paste_key,
            "restore".to_string(),
        ]
    );
    assert_eq!(harness.clipboard.current_text().as_deref(), Some("before"));
    assert_eq!(session.state(), SessionState::Idle);
}

#[tokio::test(start_paused = true)]
async fn dismiss_cancels_paste_before_keystroke() {
    let harness = Harness::new().await;
    harness.copy("before").await;

    let config = PasteConfig {
        preserve_clipboard: true,
        activation_delay: Duration::from_secs(30),
        restore_delay: Duration::from_secs(30),
    };
    let mut session = harness.session(config, None);

    session.start_paste(ClipboardItem::text("unwanted"));
    harness.wait_for_activation().await;
    session.dismiss();
    session.join_paste().await;

    assert!(!harness.log().iter().any(|step| step.starts_with("key")));
    assert_eq!(harness.log().last().map(String::as_str), Some("restore"));
    assert_eq!(harness.clipboard.current_text().as_deref(), Some("before"));
}

#[tokio::test]
async fn paste_by_index() {
    let harness = Harness::new().await;
    harness.copy("only").await;
    let mut session = harness.session(quick(false), None);

    assert!(!session.paste_index(1).await);
    assert!(session.paste_index(0).await);
    session.join_paste().await;

    assert!(harness.log().contains(&"write".to_string()));
}

#[tokio::test]
async fn toggling_again_closes_open_picker() {
    let harness = Harness::new().await;
    harness.copy("a").await;
    let mut session = harness.session(quick(false), Some(FakePicker::never()));

    session.toggle_picker().await;
    assert_eq!(session.state(), SessionState::Picking);

    session.toggle_picker().await;
    assert_eq!(session.state(), SessionState::Idle);
    assert!(harness.log().is_empty());
}

#[tokio::test]
async fn empty_history_opens_no_picker() {
    let harness = Harness::new().await;
    let picker = FakePicker::never();
    let mut session = harness.session(quick(false), Some(picker.clone()));

    session.toggle_picker().await;

    assert_eq!(session.state(), SessionState::Idle);
    assert!(picker.shown().is_empty());
}

#[tokio::test]
async fn picked_entry_stays_pinned_while_history_grows() {
    let harness = Harness::new().await;
    harness.copy("a").await;
    harness.copy("b").await;

    let (answer, picker) = FakePicker::answering();
    let mut session = harness.session(quick(false), Some(picker.clone()));
    session.toggle_picker().await;

    // Captured while the picker is open; shifts every index by one
    harness.copy("c").await;
    answer.send(Some(1)).unwrap();

    let result = session.picker_closed().await;
    session.on_picker_done(result).await;
    session.join_paste().await;

    assert_eq!(picker.shown(), vec![vec!["b".to_string(), "a".to_string()]]);
    assert_eq!(harness.clipboard.current_text().as_deref(), Some("a"));
    assert_eq!(session.state(), SessionState::Idle);
}

#[tokio::test]
async fn dismissed_picker_pastes_nothing() {
    let harness = Harness::new().await;
    harness.copy("a").await;

    let (answer, picker) = FakePicker::answering();
    let mut session = harness.session(quick(false), Some(picker));
    session.toggle_picker().await;
    answer.send(None).unwrap();

    let result = session.picker_closed().await;
    session.on_picker_done(result).await;
    session.join_paste().await;

    assert!(harness.log().is_empty());
    assert_eq!(session.state(), SessionState::Idle);
}

#[tokio::test]
async fn entry_deleted_while_picking_is_not_pasted() {
    let harness = Harness::new().await;
    harness.copy("a").await;
    harness.copy("b").await;

    let (answer, picker) = FakePicker::answering();
    let mut session = harness.session(quick(false), Some(picker));
    session.toggle_picker().await;

    let id = harness.history.lock().await.get(0).unwrap().id();
    harness.history.lock().await.delete(id).await;
    answer.send(Some(0)).unwrap();

    let result = session.picker_closed().await;
    session.on_picker_done(result).await;
    session.join_paste().await;

    assert!(harness.log().is_empty());
}
