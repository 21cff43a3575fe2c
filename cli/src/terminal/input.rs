use std::io::IsTerminal;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tokio_util::sync::CancellationToken;
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Watches the terminal for 'q' or Ctrl+C and cancels `cancel` when seen.
///
/// Raw mode swallows the terminal's own Ctrl+C handling, so both keys are
/// read here. Dropping the handle stops the watcher and restores the
/// terminal without cancelling anything.
pub struct InputHandle {
    stop: CancellationToken,
    worker: Option<JoinHandle<()>>,
}

impl InputHandle {
    /// Starts watching, or returns `None` when stdin is not a terminal.
    pub fn start(cancel: CancellationToken) -> Option<Self> {
        if !std::io::stdin().is_terminal() {
            return None;
        }
        if let Err(e) = enable_raw_mode() {
            debug!("raw mode unavailable, not watching for keys: {e}");
            return None;
        }

        let stop = CancellationToken::new();
        let stop_ref = stop.clone();
        let worker = thread::spawn(move || {
            while !cancel.is_cancelled() && !stop_ref.is_cancelled() {
                match event::poll(POLL_INTERVAL) {
                    Ok(true) => {
                        if let Ok(Event::Key(key)) = event::read() {
                            if is_quit_key(&key) {
                                cancel.cancel();
                            }
                        }
                    }
                    Ok(false) => {}
                    Err(e) => {
                        debug!("stopped reading terminal input: {e}");
                        break;
                    }
                }
            }
            let _ = disable_raw_mode();
        });

        Some(Self {
            stop,
            worker: Some(worker),
        })
    }
}

impl Drop for InputHandle {
    fn drop(&mut self) {
        self.stop.cancel();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        let _ = disable_raw_mode();
    }
}

fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    let is_q = key.code == KeyCode::Char('q');
    let is_ctrl_c =
        key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
    is_q || is_ctrl_c
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
