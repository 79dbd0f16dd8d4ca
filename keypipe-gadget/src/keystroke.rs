//! Logical keystrokes and their expansion into key-event pulses

use crate::keymap::{
    KEY_0, KEY_1, KEY_2, KEY_3, KEY_4, KEY_5, KEY_6, KEY_7, KEY_8, KEY_9, KEY_A, KEY_APOSTROPHE,
    KEY_B, KEY_BACKSLASH, KEY_BACKSPACE, KEY_C, KEY_COMMA, KEY_D, KEY_DOT, KEY_DOWN, KEY_E,
    KEY_ENTER, KEY_EQUAL, KEY_ESC, KEY_F, KEY_G, KEY_H, KEY_I, KEY_J, KEY_K, KEY_L, KEY_LEFT,
    KEY_LEFTBRACE, KEY_LEFTCTRL, KEY_LEFTSHIFT, KEY_M, KEY_MINUS, KEY_N, KEY_O, KEY_P, KEY_Q,
    KEY_R, KEY_RIGHT, KEY_RIGHTBRACE, KEY_S, KEY_SEMICOLON, KEY_SLASH, KEY_SPACE, KEY_T, KEY_TAB,
    KEY_U, KEY_UP, KEY_V, KEY_W, KEY_X, KEY_Y, KEY_Z, UNMAPPED_CODE,
};
use crate::types::{KeyCode, KeyEvent};

/// One logical keystroke from an input surface (terminal key press,
/// scripted text).
///
/// A keystroke expands into a self-contained press/release pulse via
/// [`Keystroke::to_events`]; nothing is ever held across keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    /// Printable character or C0 control-character alias
    Char(char),
    Enter,
    Backspace,
    Tab,
    Esc,
    Up,
    Down,
    Left,
    Right,
}

/// Evdev codes for 'a'..='z' indexed by letter ordinal
const LETTER_CODES: [KeyCode; 26] = [
    KEY_A, KEY_B, KEY_C, KEY_D, KEY_E, KEY_F, KEY_G, KEY_H, KEY_I, KEY_J, KEY_K, KEY_L, KEY_M,
    KEY_N, KEY_O, KEY_P, KEY_Q, KEY_R, KEY_S, KEY_T, KEY_U, KEY_V, KEY_W, KEY_X, KEY_Y, KEY_Z,
];

fn letter_code(ch: char) -> KeyCode {
    LETTER_CODES[(ch as u8 - b'a') as usize]
}

/// Key code for a control-chord symbol.
///
/// Terminals report Ctrl+letter either as the letter itself (with a
/// modifier flag) or as the C0 control character 0x01-0x1A; both resolve
/// to the letter's code.
fn ctrl_code(ch: char) -> Option<KeyCode> {
    match ch {
        'a'..='z' => Some(letter_code(ch)),
        'A'..='Z' => Some(letter_code(ch.to_ascii_lowercase())),
        '\u{01}'..='\u{1a}' => Some(LETTER_CODES[ch as usize - 1]),
        _ => None,
    }
}

/// Symbols that transmit as Shift + another key on a US layout.
///
/// `/` appears both here and in the base table; this table is consulted
/// first, so `/` goes out as Shift+Slash.
fn shifted_code(ch: char) -> Option<KeyCode> {
    match ch {
        '!' => Some(KEY_1),
        '@' => Some(KEY_2),
        '#' => Some(KEY_3),
        '$' => Some(KEY_4),
        '%' => Some(KEY_5),
        '^' => Some(KEY_6),
        '&' => Some(KEY_7),
        '*' => Some(KEY_8),
        '(' => Some(KEY_9),
        ')' => Some(KEY_0),
        '_' => Some(KEY_MINUS),
        '+' => Some(KEY_EQUAL),
        '{' => Some(KEY_LEFTBRACE),
        '}' => Some(KEY_RIGHTBRACE),
        '"' => Some(KEY_APOSTROPHE),
        '/' => Some(KEY_SLASH),
        '<' => Some(KEY_COMMA),
        '>' => Some(KEY_DOT),
        '|' => Some(KEY_BACKSLASH),
        _ => None,
    }
}

/// Base-table key code for unmodified characters.
///
/// Digits, lowercase letters, the unshifted US-layout punctuation and the
/// control-character aliases of the named keys. Characters not listed
/// (`-`, backtick, `~`, `:`, `?`, ...) resolve to the unmapped sentinel.
fn base_code(ch: char) -> Option<KeyCode> {
    match ch {
        '1'..='9' => Some(KEY_1 + (ch as u8 - b'1') as KeyCode),
        '0' => Some(KEY_0),
        'a'..='z' => Some(letter_code(ch)),
        ' ' => Some(KEY_SPACE),
        '=' => Some(KEY_EQUAL),
        ',' => Some(KEY_COMMA),
        '.' => Some(KEY_DOT),
        '[' => Some(KEY_LEFTBRACE),
        ']' => Some(KEY_RIGHTBRACE),
        ';' => Some(KEY_SEMICOLON),
        '\'' => Some(KEY_APOSTROPHE),
        '/' => Some(KEY_SLASH),
        '\\' => Some(KEY_BACKSLASH),
        '\r' | '\n' => Some(KEY_ENTER),
        '\u{08}' | '\u{7f}' => Some(KEY_BACKSPACE),
        '\t' => Some(KEY_TAB),
        '\u{1b}' => Some(KEY_ESC),
        _ => None,
    }
}

impl Keystroke {
    /// Expand into the ordered key events that type this keystroke.
    ///
    /// With `ctrl_held` the pulse is bracketed by LeftCtrl and the symbol
    /// resolves through the control-letter table. Otherwise shifted symbols
    /// and uppercase letters are bracketed by LeftShift around their base
    /// key. Symbols with no mapping expand to a pulse of
    /// [`UNMAPPED_CODE`], which the report state drops downstream; any
    /// modifier bracket still opens and closes normally.
    pub fn to_events(self, ctrl_held: bool) -> Vec<KeyEvent> {
        if ctrl_held {
            let base = match self {
                Keystroke::Char(ch) => ctrl_code(ch),
                _ => None,
            }
            .unwrap_or(UNMAPPED_CODE);
            return vec![
                KeyEvent::down(KEY_LEFTCTRL),
                KeyEvent::down(base),
                KeyEvent::up(base),
                KeyEvent::up(KEY_LEFTCTRL),
            ];
        }

        let (base, shifted) = match self {
            Keystroke::Char(ch) => {
                if let Some(code) = shifted_code(ch) {
                    (code, true)
                } else if ch.is_ascii_uppercase() {
                    let lower = ch.to_ascii_lowercase();
                    (base_code(lower).unwrap_or(UNMAPPED_CODE), true)
                } else {
                    (base_code(ch).unwrap_or(UNMAPPED_CODE), false)
                }
            }
            Keystroke::Enter => (KEY_ENTER, false),
            Keystroke::Backspace => (KEY_BACKSPACE, false),
            Keystroke::Tab => (KEY_TAB, false),
            Keystroke::Esc => (KEY_ESC, false),
            Keystroke::Up => (KEY_UP, false),
            Keystroke::Down => (KEY_DOWN, false),
            Keystroke::Left => (KEY_LEFT, false),
            Keystroke::Right => (KEY_RIGHT, false),
        };

        if shifted {
            vec![
                KeyEvent::down(KEY_LEFTSHIFT),
                KeyEvent::down(base),
                KeyEvent::up(base),
                KeyEvent::up(KEY_LEFTSHIFT),
            ]
        } else {
            vec![KeyEvent::down(base), KeyEvent::up(base)]
        }
    }
}
