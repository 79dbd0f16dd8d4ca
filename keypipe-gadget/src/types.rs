//! Common types for the gadget event pipeline

/// Input-layer key code (Linux evdev namespace, `KEY_A` = 30, ...)
///
/// This is the key's identity on the producer side; the USB usage ID it
/// maps to lives in [`crate::keymap`].
pub type KeyCode = u16;

/// Direction of a key transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Key pressed
    Down,
    /// Key released
    Up,
}

/// A single key transition, the unit of work sent to the writer thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Input-layer key code
    pub code: KeyCode,
    /// Press or release
    pub action: KeyAction,
}

impl KeyEvent {
    /// Press event for `code`
    pub fn down(code: KeyCode) -> Self {
        Self {
            code,
            action: KeyAction::Down,
        }
    }

    /// Release event for `code`
    pub fn up(code: KeyCode) -> Self {
        Self {
            code,
            action: KeyAction::Up,
        }
    }
}
