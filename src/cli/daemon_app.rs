//! Daemon app runner

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::application::ports::{
    AppHandle, ForegroundApp, KeySimulator, Notifier, PermissionPort, Picker,
};
use crate::application::{
    ClipboardMonitor, HistoryCallbacks, HistoryStore, HotkeyCallback, HotkeyRegistry,
    PasteOrchestrator, PasteSession, SharedHistory,
};
use crate::domain::clipboard::ClipboardItem;
use crate::domain::hotkey::{HotkeyId, KeyCombo};
use crate::infrastructure::{
    create_foreground, create_key_simulator, create_notifier, ArboardClipboard, CommandPicker,
    GlobalHotkeyBackend, InputPermission, JsonFileHistoryStore,
};

use super::app::{EXIT_ERROR, EXIT_SUCCESS};
use super::args::{DaemonOptions, SecondaryShortcut};
use super::ipc::{create_ipc_server, error_reply, EntrySummary, IpcCommand, IpcRequest};
use super::pid_file::{PidFile, PidFileError};
use super::presenter::Presenter;
use super::signals::DaemonSignalHandler;

/// Upper bound for an in-flight paste to wind down at shutdown
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

type History = SharedHistory<JsonFileHistoryStore>;
type Monitor = ClipboardMonitor<ArboardClipboard, JsonFileHistoryStore>;
type Orchestrator = PasteOrchestrator<
    ArboardClipboard,
    Box<dyn KeySimulator>,
    InputPermission,
    Box<dyn ForegroundApp>,
    Arc<Monitor>,
>;
type Session = PasteSession<
    ArboardClipboard,
    Box<dyn KeySimulator>,
    InputPermission,
    Box<dyn ForegroundApp>,
    Arc<Monitor>,
    JsonFileHistoryStore,
>;

/// Run daemon mode
pub async fn run_daemon(options: DaemonOptions) -> ExitCode {
    let presenter = Presenter::new();

    let pid_file = PidFile::new();
    if let Err(e) = pid_file.acquire() {
        match e {
            PidFileError::AlreadyRunning(pid) => {
                presenter.error(&format!("Another daemon is already running (PID: {})", pid));
            }
            _ => presenter.error(&e.to_string()),
        }
        return ExitCode::from(EXIT_ERROR);
    }

    // History
    let persistence = JsonFileHistoryStore::new();
    debug!(path = %persistence.path().display(), "history store");
    let history = HistoryStore::load(persistence)
        .await
        .with_callbacks(history_callbacks())
        .shared();

    // Monitor
    let clipboard = ArboardClipboard::new();
    let monitor = Arc::new(Monitor::new(
        clipboard.clone(),
        Arc::clone(&history),
        options.poll_interval,
    ));
    monitor.prime().await;

    // Paste
    let (keys, tool) = match create_key_simulator(options.keystroke_tool).await {
        Ok(selected) => selected,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let permission = InputPermission::new(tool);
    if !permission.is_granted().await {
        presenter.warn(&format!(
            "Key simulation via {} is not available yet. See: {}",
            tool,
            permission.guidance_link()
        ));
    }
    let orchestrator = Arc::new(Orchestrator::new(
        clipboard,
        keys,
        permission,
        create_foreground().await,
        Arc::clone(&monitor),
        options.paste.clone(),
    ));

    let notifier: Arc<dyn Notifier> = Arc::from(create_notifier(options.notify));
    let picker: Option<Arc<dyn Picker>> = options
        .picker_command
        .as_deref()
        .map(|cmd| Arc::new(CommandPicker::new(cmd)) as Arc<dyn Picker>);

    // Hotkeys
    let (fired_tx, mut fired_rx) = mpsc::unbounded_channel::<HotkeyId>();
    let mut registry = HotkeyRegistry::new(GlobalHotkeyBackend::new());
    register_hotkey(
        &mut registry,
        HotkeyId::SHOW_HISTORY,
        options.show_history,
        &fired_tx,
        &presenter,
    );
    if let Some(secondary) = &options.secondary {
        register_hotkey(
            &mut registry,
            HotkeyId::SECONDARY,
            secondary.combo,
            &fired_tx,
            &presenter,
        );
    }

    let mut signals = match DaemonSignalHandler::new() {
        Ok(s) => s,
        Err(e) => {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    // Control socket
    let mut server = create_ipc_server();
    if let Err(e) = server.bind() {
        presenter.error(&format!("Failed to bind socket: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }
    let socket = server.path();
    let (ipc_tx, mut ipc_rx) = mpsc::channel::<IpcCommand>(16);
    let server_task = tokio::spawn(async move {
        if let Err(e) = server.run(ipc_tx).await {
            error!(error = %e, "control socket stopped");
        }
    });

    let mut daemon = Daemon {
        session: Session::new(Arc::clone(&history), orchestrator, notifier, picker),
        history,
        monitor,
        secondary: options.secondary.clone(),
    };

    presenter.daemon_status("Started, watching the clipboard");
    presenter.info(&format!(
        "PID: {} | Socket: {} | Hotkey: {} | SIGINT: exit",
        std::process::id(),
        socket,
        options.show_history
    ));

    let mut ticker = daemon.monitor.ticker();
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                daemon.monitor.tick().await;
            }
            Some(event) = registry.next_event() => {
                registry.dispatch(event);
            }
            Some(id) = fired_rx.recv() => {
                daemon.on_hotkey(id).await;
            }
            Some(command) = ipc_rx.recv() => {
                let reply = daemon.handle_request(command.request).await;
                let _ = command.reply.send(reply);
            }
            result = daemon.session.picker_closed(), if daemon.session.is_picking() => {
                daemon.session.on_picker_done(result).await;
            }
            signal = signals.recv() => {
                info!(?signal, "shutting down");
                break;
            }
        }
    }

    presenter.daemon_status("Shutting down...");
    daemon.session.shutdown(SHUTDOWN_GRACE).await;
    registry.unregister_all();
    server_task.abort();
    let _ = server_task.await;
    let _ = pid_file.release();

    ExitCode::from(EXIT_SUCCESS)
}

fn history_callbacks() -> HistoryCallbacks {
    HistoryCallbacks {
        on_item_added: Some(Box::new(|item: &ClipboardItem| {
            info!(kind = %item.kind(), preview = %item.display_text(), "new clipboard item");
        })),
        on_history_changed: Some(Box::new(|items: &[ClipboardItem]| {
            debug!(count = items.len(), "history changed");
        })),
    }
}

fn register_hotkey(
    registry: &mut HotkeyRegistry<GlobalHotkeyBackend>,
    id: HotkeyId,
    combo: KeyCombo,
    fired: &mpsc::UnboundedSender<HotkeyId>,
    presenter: &Presenter,
) {
    let fired = fired.clone();
    let callback: HotkeyCallback = Box::new(move |id| {
        let _ = fired.send(id);
    });

    if let Err(e) = registry.register(id, combo, callback) {
        presenter.warn(&format!(
            "{}. Use `pasteback daemon toggle` from a desktop shortcut instead.",
            e
        ));
    }
}

struct Daemon {
    history: History,
    monitor: Arc<Monitor>,
    session: Session,
    secondary: Option<SecondaryShortcut>,
}

impl Daemon {
    async fn on_hotkey(&mut self, id: HotkeyId) {
        match id {
            HotkeyId::SHOW_HISTORY => self.session.toggle_picker().await,
            HotkeyId::SECONDARY => self.run_secondary(),
            other => debug!(id = %other, "no action bound"),
        }
    }

    async fn handle_request(&mut self, request: IpcRequest) -> String {
        match request {
            IpcRequest::Status => {
                let count = self.history.lock().await.len();
                format!("{} ({} items)", self.session.state(), count)
            }
            IpcRequest::Toggle => {
                self.session.toggle_picker().await;
                "ok".to_string()
            }
            IpcRequest::List => {
                let history = self.history.lock().await;
                let entries: Vec<EntrySummary> = history
                    .list()
                    .iter()
                    .enumerate()
                    .map(|(index, item)| EntrySummary::from_item(index, item))
                    .collect();
                serde_json::to_string(&entries).unwrap_or_else(error_reply)
            }
            IpcRequest::Paste(index) => {
                if self.session.paste_index(index).await {
                    "ok".to_string()
                } else {
                    error_reply(format!("no entry at index {}", index))
                }
            }
            IpcRequest::Delete(id) => {
                let mut history = self.history.lock().await;
                if history.find(id).is_none() {
                    return error_reply(format!("no entry with id {}", id));
                }
                history.delete(id).await;
                "ok".to_string()
            }
            IpcRequest::Clear => {
                self.history.lock().await.clear().await;
                "ok".to_string()
            }
            IpcRequest::Dismiss => {
                self.session.dismiss();
                "ok".to_string()
            }
            IpcRequest::Foreground(window) => {
                self.session
                    .orchestrator()
                    .foreground()
                    .remember(AppHandle::new(window));
                "ok".to_string()
            }
        }
    }

    fn run_secondary(&self) {
        let Some(secondary) = self.secondary.clone() else {
            return;
        };

        let orchestrator = Arc::clone(self.session.orchestrator());
        tokio::spawn(async move {
            if let Err(e) = orchestrator
                .send_combos(&secondary.keys, secondary.delay)
                .await
            {
                warn!(error = %e, "secondary shortcut failed");
            }
        });
    }
}
