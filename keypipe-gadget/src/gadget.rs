//! Gadget keyboard session and its serialized writer thread

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, error};
use zerocopy::IntoBytes;

use crate::error::GadgetError;
use crate::keystroke::Keystroke;
use crate::report::ReportState;
use crate::types::KeyEvent;

/// Receive timeout between shutdown-flag checks when idle
const RECV_TIMEOUT_MS: u64 = 5;

/// A keyboard session on a USB gadget HID endpoint.
///
/// Opening a session spawns one writer thread that owns the device file and
/// the report state. Events submitted with [`GadgetKeyboard::forward`] are
/// handed to that thread one at a time over a rendezvous channel, so they
/// are applied and written in exactly submission order.
pub struct GadgetKeyboard {
    event_tx: SyncSender<KeyEvent>,
    shutdown: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl GadgetKeyboard {
    /// Open the gadget device and start the writer thread.
    ///
    /// The path is created if missing, so a session can be pointed at a
    /// regular file to capture the report frames.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GadgetError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| GadgetError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        // Capacity 0: forward() blocks until the writer takes the event,
        // so at most one event is ever in flight.
        let (event_tx, event_rx) = mpsc::sync_channel(0);
        let shutdown = Arc::new(AtomicBool::new(false));

        let worker_shutdown = Arc::clone(&shutdown);
        let worker = std::thread::Builder::new()
            .name("hidg-writer".into())
            .spawn(move || {
                run_writer_loop(file, event_rx, worker_shutdown);
            })
            .expect("Failed to spawn gadget writer thread");

        debug!("Gadget session opened on {}", path.display());

        Ok(Self {
            event_tx,
            shutdown,
            worker: Some(worker),
        })
    }

    /// Hand one key event to the writer thread.
    ///
    /// Blocks until the writer takes ownership of the event, not until the
    /// device write completes. Fails with [`GadgetError::Closed`] once the
    /// writer is gone (session closed, or its loop ended on a write error).
    pub fn forward(&self, event: KeyEvent) -> Result<(), GadgetError> {
        self.event_tx.send(event).map_err(|_| GadgetError::Closed)
    }

    /// Synthesize one logical keystroke and forward its events in order.
    pub fn send_keystroke(&self, stroke: Keystroke, ctrl_held: bool) -> Result<(), GadgetError> {
        for event in stroke.to_events(ctrl_held) {
            self.forward(event)?;
        }
        Ok(())
    }

    /// Type a string as a sequence of character keystrokes.
    ///
    /// `delay` inserts a pause after each character's pulse;
    /// `Duration::ZERO` disables pacing.
    pub fn type_text(&self, text: &str, delay: Duration) -> Result<(), GadgetError> {
        for ch in text.chars() {
            self.send_keystroke(Keystroke::Char(ch), false)?;
            if !delay.is_zero() {
                std::thread::sleep(delay);
            }
        }
        Ok(())
    }

    /// Shut the writer down and wait for it to finish.
    ///
    /// An event in flight at this moment is either written before the
    /// thread exits or surfaces as [`GadgetError::Closed`] to its
    /// submitter; which one is timing-dependent. Join returns promptly
    /// even when the writer already ended on a write error.
    pub fn close(mut self) -> Result<(), GadgetError> {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("Gadget writer thread panicked");
            }
        }
        debug!("Gadget session closed");
        Ok(())
    }
}

impl Drop for GadgetKeyboard {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

/// Writer loop: sole owner of the device file and the report state.
///
/// One event per iteration: fold it into the report, write the 8-byte
/// frame, flush. Every received event produces a write, even when the
/// fold dropped it. Flush errors are ignored; a short or failed write
/// ends the loop and closes the device.
fn run_writer_loop(mut file: File, events: Receiver<KeyEvent>, shutdown: Arc<AtomicBool>) {
    debug!("Gadget writer thread started");
    let mut state = ReportState::new();

    while !shutdown.load(Ordering::Relaxed) {
        // Short timeout so the shutdown flag is observed when idle
        match events.recv_timeout(Duration::from_millis(RECV_TIMEOUT_MS)) {
            Ok(event) => {
                state.apply(event);
                let frame = state.report().as_bytes();
                match file.write(frame) {
                    Ok(n) if n == frame.len() => {}
                    Ok(n) => {
                        error!("Short report write: {} of {} bytes", n, frame.len());
                        break;
                    }
                    Err(e) => {
                        error!("Report write failed: {}", e);
                        break;
                    }
                }
                let _ = file.sync_all();
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    debug!("Gadget writer thread exiting");
}
