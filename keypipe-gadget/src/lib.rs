//! USB HID boot-protocol keyboard emulation over a Linux gadget device
//!
//! Turns discrete key events into the 8-byte reports a boot-protocol
//! keyboard sends to its host, written in strict arrival order to a gadget
//! endpoint (`/dev/hidgN`):
//!
//! - [`keymap`]: evdev key code → USB usage translation tables
//! - [`ReportState`]: the 6-key rollover state machine
//! - [`Keystroke`]: character/named-key synthesis into event pulses
//! - [`GadgetKeyboard`]: session handle with a single writer thread
//!
//! The gadget function itself (configfs setup, endpoint binding) is assumed
//! to exist; writing a report frame to the endpoint makes the plugged-in
//! host see a keystroke.

pub mod error;
pub mod gadget;
pub mod keymap;
pub mod keystroke;
pub mod report;
pub mod types;

pub use error::GadgetError;
pub use gadget::GadgetKeyboard;
pub use keystroke::Keystroke;
pub use report::{KeyboardReport, ReportState, ROLLOVER_SLOTS};
pub use types::{KeyAction, KeyCode, KeyEvent};
