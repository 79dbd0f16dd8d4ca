//! Boot-protocol report layout and the 6-key rollover state machine

use tracing::warn;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::keymap;
use crate::types::{KeyAction, KeyEvent};

/// Number of regular-key slots in a boot-protocol report
pub const ROLLOVER_SLOTS: usize = 6;

/// 8-byte USB HID boot-protocol keyboard report.
///
/// The struct is the wire format: `as_bytes()` yields exactly the frame the
/// host reads from a boot keyboard's interrupt endpoint.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, IntoBytes, FromBytes, KnownLayout, Immutable,
)]
#[repr(C)]
pub struct KeyboardReport {
    /// OR of the currently held modifier bits ([`keymap::modifier`])
    pub modifiers: u8,
    /// Always zero in the boot protocol
    reserved: u8,
    /// Usage IDs of held keys; unused slots are 0, slot order carries no meaning
    pub keys: [u8; ROLLOVER_SLOTS],
}

/// Current report plus the active-slot counter.
///
/// Owned exclusively by the writer thread; one `apply` per consumed event.
/// Invariant: `pressed` equals the number of non-zero key slots, and those
/// slots form a contiguous prefix of `keys`.
#[derive(Debug, Default)]
pub struct ReportState {
    report: KeyboardReport,
    pressed: usize,
}

impl ReportState {
    /// All-released state (zeroed report)
    pub fn new() -> Self {
        Self::default()
    }

    /// The report frame to transmit after the last `apply`
    pub fn report(&self) -> &KeyboardReport {
        &self.report
    }

    /// Number of occupied key slots
    pub fn pressed(&self) -> usize {
        self.pressed
    }

    /// Fold one key transition into the report.
    ///
    /// Modifier keys set or clear their bit in byte 0 (idempotent in both
    /// directions). Regular keys enter or leave the key slots:
    ///
    /// - press of a held key, or release of a key not held: no-op
    /// - release of a held key: swap-with-last removal
    /// - press past 6 held keys: the newcomer overwrites the last slot,
    ///   counter unchanged; the evicted key's release is later ignored
    ///
    /// Codes that resolve to usage 0 are dropped with a diagnostic.
    pub fn apply(&mut self, event: KeyEvent) {
        if let Some(bit) = keymap::modifier_bit(event.code) {
            match event.action {
                KeyAction::Down => self.report.modifiers |= bit,
                KeyAction::Up => self.report.modifiers &= !bit,
            }
            return;
        }

        let usage = keymap::usage_for(event.code);
        if usage == 0 {
            warn!("No usage mapping for key code {}, dropping event", event.code);
            return;
        }

        let held = self.report.keys[..self.pressed]
            .iter()
            .position(|&u| u == usage);
        match (held, event.action) {
            (Some(slot), KeyAction::Up) => {
                // Swap-with-last removal; self-copy when slot is last.
                self.report.keys[slot] = self.report.keys[self.pressed - 1];
                self.report.keys[self.pressed - 1] = 0;
                self.pressed -= 1;
            }
            (Some(_), KeyAction::Down) => {}
            (None, KeyAction::Down) => {
                if self.pressed < ROLLOVER_SLOTS {
                    self.report.keys[self.pressed] = usage;
                    self.pressed += 1;
                } else {
                    // At capacity the newcomer takes the last slot.
                    self.report.keys[ROLLOVER_SLOTS - 1] = usage;
                }
            }
            (None, KeyAction::Up) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::{
        KEY_A, KEY_B, KEY_C, KEY_D, KEY_E, KEY_F, KEY_G, KEY_LEFTSHIFT, KEY_RIGHTSHIFT,
    };

    fn held_usages(state: &ReportState) -> Vec<u8> {
        let mut held: Vec<u8> = state.report().keys[..state.pressed()].to_vec();
        held.sort_unstable();
        held
    }

    #[test]
    fn test_report_is_eight_bytes() {
        assert_eq!(std::mem::size_of::<KeyboardReport>(), 8);
        let state = ReportState::new();
        assert_eq!(state.report().as_bytes(), &[0u8; 8]);
    }

    #[test]
    fn test_wire_layout() {
        let mut state = ReportState::new();
        state.apply(KeyEvent::down(KEY_LEFTSHIFT));
        state.apply(KeyEvent::down(KEY_A));
        assert_eq!(state.report().as_bytes(), &[0x02, 0, 4, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_modifier_set_clear() {
        let mut state = ReportState::new();
        state.apply(KeyEvent::down(KEY_LEFTSHIFT));
        assert_eq!(state.report().modifiers, 0x02);
        state.apply(KeyEvent::down(KEY_RIGHTSHIFT));
        assert_eq!(state.report().modifiers, 0x22);
        state.apply(KeyEvent::up(KEY_LEFTSHIFT));
        assert_eq!(state.report().modifiers, 0x20);
        // Modifiers never occupy key slots
        assert_eq!(state.pressed(), 0);
    }

    #[test]
    fn test_modifier_idempotent() {
        let mut state = ReportState::new();
        state.apply(KeyEvent::down(KEY_LEFTSHIFT));
        state.apply(KeyEvent::down(KEY_LEFTSHIFT));
        assert_eq!(state.report().modifiers, 0x02);
        state.apply(KeyEvent::up(KEY_LEFTSHIFT));
        state.apply(KeyEvent::up(KEY_LEFTSHIFT));
        assert_eq!(state.report().modifiers, 0);
    }

    #[test]
    fn test_press_and_release_ordering() {
        let mut state = ReportState::new();
        state.apply(KeyEvent::down(KEY_A));
        assert_eq!(state.report().keys, [4, 0, 0, 0, 0, 0]);
        state.apply(KeyEvent::down(KEY_B));
        assert_eq!(state.report().keys, [4, 5, 0, 0, 0, 0]);
        state.apply(KeyEvent::up(KEY_A));
        assert_eq!(state.report().keys, [5, 0, 0, 0, 0, 0]);
        state.apply(KeyEvent::up(KEY_B));
        assert_eq!(state.report().keys, [0, 0, 0, 0, 0, 0]);
        assert_eq!(state.pressed(), 0);
    }

    #[test]
    fn test_repeated_press_is_idempotent() {
        let mut state = ReportState::new();
        state.apply(KeyEvent::down(KEY_A));
        state.apply(KeyEvent::down(KEY_A));
        assert_eq!(state.pressed(), 1);
        assert_eq!(state.report().keys, [4, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_release_of_untracked_key_is_noop() {
        let mut state = ReportState::new();
        state.apply(KeyEvent::down(KEY_A));
        state.apply(KeyEvent::up(KEY_B));
        assert_eq!(state.pressed(), 1);
        assert_eq!(state.report().keys, [4, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_swap_remove_middle_key() {
        let mut state = ReportState::new();
        state.apply(KeyEvent::down(KEY_A));
        state.apply(KeyEvent::down(KEY_B));
        state.apply(KeyEvent::down(KEY_C));
        state.apply(KeyEvent::up(KEY_B));
        assert_eq!(state.pressed(), 2);
        // C moved into B's slot, last slot zeroed
        assert_eq!(state.report().keys, [4, 6, 0, 0, 0, 0]);
    }

    #[test]
    fn test_rollover_capacity_and_eviction() {
        let mut state = ReportState::new();
        for code in [KEY_A, KEY_B, KEY_C, KEY_D, KEY_E, KEY_F] {
            state.apply(KeyEvent::down(code));
        }
        assert_eq!(state.pressed(), 6);
        assert_eq!(held_usages(&state), vec![4, 5, 6, 7, 8, 9]);

        // Seventh key: last slot gives way, counter stays at 6
        state.apply(KeyEvent::down(KEY_G));
        assert_eq!(state.pressed(), 6);
        assert_eq!(state.report().keys[5], 10);
        assert_eq!(held_usages(&state), vec![4, 5, 6, 7, 8, 10]);

        // Releasing the evicted key is a no-op
        state.apply(KeyEvent::up(KEY_F));
        assert_eq!(state.pressed(), 6);
        assert_eq!(held_usages(&state), vec![4, 5, 6, 7, 8, 10]);
    }

    #[test]
    fn test_unmapped_code_leaves_state_unchanged() {
        let mut state = ReportState::new();
        state.apply(KeyEvent::down(KEY_A));
        // Code 84 is a hole in the usage table, 1000 is out of range
        state.apply(KeyEvent::down(84));
        state.apply(KeyEvent::up(84));
        state.apply(KeyEvent::down(1000));
        assert_eq!(state.pressed(), 1);
        assert_eq!(state.report().as_bytes(), &[0, 0, 4, 0, 0, 0, 0, 0]);
    }
}
