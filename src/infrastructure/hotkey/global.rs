//! System-wide shortcuts through the global-hotkey crate

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::application::ports::{HotkeyBackend, HotkeyError, HotkeyEvent};
use crate::domain::hotkey::{HotkeyId, KeyCode, KeyCombo};

const RECV_TIMEOUT: Duration = Duration::from_millis(250);

type IdMap = Arc<Mutex<HashMap<u32, HotkeyId>>>;

struct Listener {
    stop: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

/// Hotkey backend on top of [`GlobalHotKeyManager`].
///
/// The crate delivers presses on a process-wide channel; a forwarding
/// thread maps its ids back to [`HotkeyId`]s. On macOS presses are only
/// delivered while the main thread runs an event loop.
pub struct GlobalHotkeyBackend {
    manager: Option<GlobalHotKeyManager>,
    grabbed: HashMap<HotkeyId, HotKey>,
    ids: IdMap,
    listener: Option<Listener>,
}

impl GlobalHotkeyBackend {
    /// Create the backend. The OS manager is opened on first grab.
    pub fn new() -> Self {
        Self {
            manager: None,
            grabbed: HashMap::new(),
            ids: Arc::new(Mutex::new(HashMap::new())),
            listener: None,
        }
    }

    fn manager(&mut self) -> Result<&GlobalHotKeyManager, HotkeyError> {
        if self.manager.is_none() {
            let manager =
                GlobalHotKeyManager::new().map_err(|e| HotkeyError::Unavailable(e.to_string()))?;
            self.manager = Some(manager);
        }
        self.manager
            .as_ref()
            .ok_or_else(|| HotkeyError::Unavailable("hotkey manager not initialised".into()))
    }

    fn ids(&self) -> std::sync::MutexGuard<'_, HashMap<u32, HotkeyId>> {
        self.ids.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for GlobalHotkeyBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HotkeyBackend for GlobalHotkeyBackend {
    fn grab(&mut self, id: HotkeyId, combo: &KeyCombo) -> Result<(), HotkeyError> {
        let hotkey = to_hotkey(combo)?;
        self.manager()?
            .register(hotkey)
            .map_err(|e| HotkeyError::Refused {
                combo: combo.to_string(),
                reason: e.to_string(),
            })?;

        self.ids().insert(hotkey.id(), id);
        self.grabbed.insert(id, hotkey);
        debug!(%id, %combo, "grabbed global hotkey");
        Ok(())
    }

    fn release(&mut self, id: HotkeyId) -> Result<(), HotkeyError> {
        let Some(hotkey) = self.grabbed.remove(&id) else {
            return Ok(());
        };
        self.ids().remove(&hotkey.id());

        self.manager()?
            .unregister(hotkey)
            .map_err(|e| HotkeyError::Unavailable(e.to_string()))
    }

    fn install_listener(
        &mut self,
        events: mpsc::UnboundedSender<HotkeyEvent>,
    ) -> Result<(), HotkeyError> {
        if self.listener.is_some() {
            return Ok(());
        }

        let stop = Arc::new(AtomicBool::new(false));
        let ids = Arc::clone(&self.ids);
        let thread_stop = Arc::clone(&stop);

        let thread = std::thread::Builder::new()
            .name("hotkey-listener".into())
            .spawn(move || forward_events(ids, events, thread_stop))
            .map_err(|e| HotkeyError::ListenerFailed(e.to_string()))?;

        self.listener = Some(Listener { stop, thread });
        Ok(())
    }

    fn remove_listener(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.stop.store(true, Ordering::SeqCst);
            if listener.thread.join().is_err() {
                warn!("hotkey listener thread panicked");
            }
        }
    }
}

impl Drop for GlobalHotkeyBackend {
    fn drop(&mut self) {
        self.remove_listener();
    }
}

fn forward_events(ids: IdMap, events: mpsc::UnboundedSender<HotkeyEvent>, stop: Arc<AtomicBool>) {
    let receiver = GlobalHotKeyEvent::receiver();

    while !stop.load(Ordering::SeqCst) {
        let event = match receiver.recv_timeout(RECV_TIMEOUT) {
            Ok(event) => event,
            Err(e) if e.is_timeout() => continue,
            Err(_) => break,
        };

        if event.state != HotKeyState::Pressed {
            continue;
        }

        let id = ids
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&event.id)
            .copied();

        if let Some(id) = id {
            if events.send(HotkeyEvent { id }).is_err() {
                break;
            }
        }
    }

    debug!("hotkey listener stopped");
}

fn to_hotkey(combo: &KeyCombo) -> Result<HotKey, HotkeyError> {
    let code = to_code(combo.key).ok_or_else(|| HotkeyError::Unsupported {
        combo: combo.to_string(),
    })?;

    let mut modifiers = Modifiers::empty();
    if combo.modifiers.ctrl {
        modifiers |= Modifiers::CONTROL;
    }
    if combo.modifiers.alt {
        modifiers |= Modifiers::ALT;
    }
    if combo.modifiers.shift {
        modifiers |= Modifiers::SHIFT;
    }
    if combo.modifiers.meta {
        modifiers |= Modifiers::META;
    }

    let modifiers = (!modifiers.is_empty()).then_some(modifiers);
    Ok(HotKey::new(modifiers, code))
}

fn to_code(key: KeyCode) -> Option<Code> {
    let code = match key {
        KeyCode::Letter(c) => match c.to_ascii_uppercase() {
            'A' => Code::KeyA,
            'B' => Code::KeyB,
            'C' => Code::KeyC,
            'D' => Code::KeyD,
            'E' => Code::KeyE,
            'F' => Code::KeyF,
            'G' => Code::KeyG,
            'H' => Code::KeyH,
            'I' => Code::KeyI,
            'J' => Code::KeyJ,
            'K' => Code::KeyK,
            'L' => Code::KeyL,
            'M' => Code::KeyM,
            'N' => Code::KeyN,
            'O' => Code::KeyO,
            'P' => Code::KeyP,
            'Q' => Code::KeyQ,
            'R' => Code::KeyR,
            'S' => Code::KeyS,
            'T' => Code::KeyT,
            'U' => Code::KeyU,
            'V' => Code::KeyV,
            'W' => Code::KeyW,
            'X' => Code::KeyX,
            'Y' => Code::KeyY,
            'Z' => Code::KeyZ,
            _ => return None,
        },
        KeyCode::Digit(d) => match d {
            0 => Code::Digit0,
            1 => Code::Digit1,
            2 => Code::Digit2,
            3 => Code::Digit3,
            4 => Code::Digit4,
            5 => Code::Digit5,
            6 => Code::Digit6,
            7 => Code::Digit7,
            8 => Code::Digit8,
            9 => Code::Digit9,
            _ => return None,
        },
        KeyCode::Space => Code::Space,
        KeyCode::Enter => Code::Enter,
        KeyCode::Escape => Code::Escape,
        KeyCode::Tab => Code::Tab,
        KeyCode::Function(n) => match n {
            1 => Code::F1,
            2 => Code::F2,
            3 => Code::F3,
            4 => Code::F4,
            5 => Code::F5,
            6 => Code::F6,
            7 => Code::F7,
            8 => Code::F8,
            9 => Code::F9,
            10 => Code::F10,
            11 => Code::F11,
            12 => Code::F12,
            _ => return None,
        },
    };
    Some(code)
}
