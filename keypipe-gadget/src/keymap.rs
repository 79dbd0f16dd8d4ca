//! Translation tables from Linux evdev key codes to USB HID usages
//!
//! The boot-protocol report speaks the USB HID keyboard usage page, while
//! producers speak evdev key codes. Both lookups here are total: codes
//! without a USB equivalent resolve to the zero/`None` sentinel and are
//! handled by the caller.

use crate::types::KeyCode;

// Evdev key codes (linux/input-event-codes.h) used by the keystroke
// synthesizer and the modifier table.
pub const KEY_ESC: KeyCode = 1;
pub const KEY_1: KeyCode = 2;
pub const KEY_2: KeyCode = 3;
pub const KEY_3: KeyCode = 4;
pub const KEY_4: KeyCode = 5;
pub const KEY_5: KeyCode = 6;
pub const KEY_6: KeyCode = 7;
pub const KEY_7: KeyCode = 8;
pub const KEY_8: KeyCode = 9;
pub const KEY_9: KeyCode = 10;
pub const KEY_0: KeyCode = 11;
pub const KEY_MINUS: KeyCode = 12;
pub const KEY_EQUAL: KeyCode = 13;
pub const KEY_BACKSPACE: KeyCode = 14;
pub const KEY_TAB: KeyCode = 15;
pub const KEY_Q: KeyCode = 16;
pub const KEY_W: KeyCode = 17;
pub const KEY_E: KeyCode = 18;
pub const KEY_R: KeyCode = 19;
pub const KEY_T: KeyCode = 20;
pub const KEY_Y: KeyCode = 21;
pub const KEY_U: KeyCode = 22;
pub const KEY_I: KeyCode = 23;
pub const KEY_O: KeyCode = 24;
pub const KEY_P: KeyCode = 25;
pub const KEY_LEFTBRACE: KeyCode = 26;
pub const KEY_RIGHTBRACE: KeyCode = 27;
pub const KEY_ENTER: KeyCode = 28;
pub const KEY_LEFTCTRL: KeyCode = 29;
pub const KEY_A: KeyCode = 30;
pub const KEY_S: KeyCode = 31;
pub const KEY_D: KeyCode = 32;
pub const KEY_F: KeyCode = 33;
pub const KEY_G: KeyCode = 34;
pub const KEY_H: KeyCode = 35;
pub const KEY_J: KeyCode = 36;
pub const KEY_K: KeyCode = 37;
pub const KEY_L: KeyCode = 38;
pub const KEY_SEMICOLON: KeyCode = 39;
pub const KEY_APOSTROPHE: KeyCode = 40;
pub const KEY_LEFTSHIFT: KeyCode = 42;
pub const KEY_BACKSLASH: KeyCode = 43;
pub const KEY_Z: KeyCode = 44;
pub const KEY_X: KeyCode = 45;
pub const KEY_C: KeyCode = 46;
pub const KEY_V: KeyCode = 47;
pub const KEY_B: KeyCode = 48;
pub const KEY_N: KeyCode = 49;
pub const KEY_M: KeyCode = 50;
pub const KEY_COMMA: KeyCode = 51;
pub const KEY_DOT: KeyCode = 52;
pub const KEY_SLASH: KeyCode = 53;
pub const KEY_RIGHTSHIFT: KeyCode = 54;
pub const KEY_LEFTALT: KeyCode = 56;
pub const KEY_SPACE: KeyCode = 57;
pub const KEY_RIGHTCTRL: KeyCode = 97;
pub const KEY_RIGHTALT: KeyCode = 100;
pub const KEY_UP: KeyCode = 103;
pub const KEY_LEFT: KeyCode = 105;
pub const KEY_RIGHT: KeyCode = 106;
pub const KEY_DOWN: KeyCode = 108;
pub const KEY_LEFTMETA: KeyCode = 125;
pub const KEY_RIGHTMETA: KeyCode = 126;

/// Sentinel key code for symbols with no evdev mapping.
///
/// Outside the table range, so [`usage_for`] resolves it to usage 0 and the
/// report state drops the event with a diagnostic.
pub const UNMAPPED_CODE: KeyCode = KeyCode::MAX;

/// Modifier bit masks for byte 0 of the boot report
pub mod modifier {
    pub const LEFT_CTRL: u8 = 0x01;
    pub const LEFT_SHIFT: u8 = 0x02;
    pub const LEFT_ALT: u8 = 0x04;
    pub const LEFT_META: u8 = 0x08;
    pub const RIGHT_CTRL: u8 = 0x10;
    pub const RIGHT_SHIFT: u8 = 0x20;
    pub const RIGHT_ALT: u8 = 0x40;
    pub const RIGHT_META: u8 = 0x80;
}

/// USB HID keyboard usage ID indexed by evdev key code.
///
/// Inverse of the kernel's `hid_keyboard[]` usage table
/// (drivers/hid/hid-input.c). Zero entries are codes with no equivalent in
/// the keyboard usage page; codes past the end of the table also map to 0.
static USAGE_TABLE: [u8; 194] = [
    3, 41, 30, 31, 32, 33, 34, 35, 36, 37, // 0: reserved, Esc, 1-8
    38, 39, 45, 46, 42, 43, 20, 26, 8, 21, // 10: 9, 0, -, =, Bksp, Tab, Q-R
    23, 28, 24, 12, 18, 19, 47, 48, 40, 224, // 20: T-P, [, ], Enter, LCtrl
    4, 22, 7, 9, 10, 11, 13, 14, 15, 51, // 30: A-L, ;
    52, 53, 225, 50, 29, 27, 6, 25, 5, 17, // 40: ', `, LShift, \, Z-N
    16, 54, 55, 56, 229, 85, 226, 44, 57, 58, // 50: M-/, RShift, KP*, LAlt, Space, Caps, F1
    59, 60, 61, 62, 63, 64, 65, 66, 67, 83, // 60: F2-F10, NumLock
    71, 95, 96, 97, 86, 92, 93, 94, 87, 89, // 70: ScrollLock, keypad 7-1
    90, 91, 98, 99, 0, 148, 100, 68, 69, 135, // 80: keypad 2-., F11, F12, intl
    146, 147, 138, 136, 139, 140, 88, 228, 84, 70, // 90: lang keys, KPEnter, RCtrl, KP/, SysRq
    230, 0, 74, 82, 75, 80, 79, 77, 81, 78, // 100: RAlt, Home, Up, PgUp, Left, Right, End, Down, PgDn
    73, 76, 0, 239, 238, 237, 102, 103, 0, 72, // 110: Ins, Del, volume, Power, Pause
    0, 133, 144, 145, 137, 227, 231, 101, 243, 121, // 120: lang, LMeta, RMeta, Compose
    118, 122, 119, 124, 116, 125, 244, 123, 117, 0, // 130: Undo, Copy, Paste, Find...
    251, 0, 248, 0, 0, 0, 0, 0, 0, 0, // 140
    240, 0, 249, 0, 0, 0, 0, 0, 241, 242, // 150
    0, 236, 0, 235, 232, 234, 233, 0, 0, 0, // 160: media keys
    0, 0, 0, 250, 0, 0, 247, 245, 246, 182, // 170
    183, 0, 0, 104, 105, 106, 107, 108, 109, 110, // 180: KP parens, F13-F19
    111, 112, 113, 114, // 190: F20-F23
];

/// Look up the USB usage ID for an evdev key code.
///
/// Total over all codes; unknown or out-of-range codes yield the
/// "unmapped" sentinel 0.
pub fn usage_for(code: KeyCode) -> u8 {
    USAGE_TABLE.get(code as usize).copied().unwrap_or(0)
}

/// Look up the modifier bit for an evdev key code.
///
/// Returns `None` for every non-modifier code. The eight modifier keys are
/// reported in byte 0 of the boot report, never in the key slots.
pub fn modifier_bit(code: KeyCode) -> Option<u8> {
    match code {
        KEY_LEFTCTRL => Some(modifier::LEFT_CTRL),
        KEY_LEFTSHIFT => Some(modifier::LEFT_SHIFT),
        KEY_LEFTALT => Some(modifier::LEFT_ALT),
        KEY_LEFTMETA => Some(modifier::LEFT_META),
        KEY_RIGHTCTRL => Some(modifier::RIGHT_CTRL),
        KEY_RIGHTSHIFT => Some(modifier::RIGHT_SHIFT),
        KEY_RIGHTALT => Some(modifier::RIGHT_ALT),
        KEY_RIGHTMETA => Some(modifier::RIGHT_META),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_for_main_block() {
        assert_eq!(usage_for(KEY_A), 4);
        assert_eq!(usage_for(KEY_Z), 29);
        assert_eq!(usage_for(KEY_1), 30);
        assert_eq!(usage_for(KEY_0), 39);
        assert_eq!(usage_for(KEY_ENTER), 40);
        assert_eq!(usage_for(KEY_ESC), 41);
        assert_eq!(usage_for(KEY_SPACE), 44);
        assert_eq!(usage_for(KEY_SLASH), 56);
    }

    #[test]
    fn test_usage_for_arrows() {
        assert_eq!(usage_for(KEY_UP), 82);
        assert_eq!(usage_for(KEY_DOWN), 81);
        assert_eq!(usage_for(KEY_LEFT), 80);
        assert_eq!(usage_for(KEY_RIGHT), 79);
    }

    #[test]
    fn test_usage_for_gaps_and_out_of_range() {
        // Holes inside the table
        assert_eq!(usage_for(84), 0);
        assert_eq!(usage_for(101), 0);
        // Past the end
        assert_eq!(usage_for(194), 0);
        assert_eq!(usage_for(1000), 0);
        assert_eq!(usage_for(UNMAPPED_CODE), 0);
    }

    #[test]
    fn test_modifier_bits_distinct_and_complete() {
        let codes = [
            KEY_LEFTCTRL,
            KEY_LEFTSHIFT,
            KEY_LEFTALT,
            KEY_LEFTMETA,
            KEY_RIGHTCTRL,
            KEY_RIGHTSHIFT,
            KEY_RIGHTALT,
            KEY_RIGHTMETA,
        ];
        let mut mask = 0u8;
        for code in codes {
            let bit = modifier_bit(code).unwrap();
            assert_eq!(bit.count_ones(), 1);
            assert_eq!(mask & bit, 0, "bit for code {code} not distinct");
            mask |= bit;
        }
        assert_eq!(mask, 0xFF);
    }

    #[test]
    fn test_modifier_bit_none_for_regular_keys() {
        assert_eq!(modifier_bit(KEY_A), None);
        assert_eq!(modifier_bit(KEY_SPACE), None);
        assert_eq!(modifier_bit(UNMAPPED_CODE), None);
    }
}
