//! Fuzz target: gesture state machine
//!
//! Drives `ButtonState` with arbitrary interleavings of edges and
//! classifier ticks and verifies:
//! - No panics, including across `u32` timestamp wrap
//! - `pending_count` only grows on a Released → Pressed transition
//! - A gesture is only reported for two or more pending presses, and
//!   always clears the count
//!
//! cargo fuzz run fuzz_gesture_engine

#![no_main]

use clickwise::gesture::{ButtonState, Gesture, Level, Transition};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut state = ButtonState::new(Level::Released);
    let mut now: u32 = u32::from_le_bytes([
        data.first().copied().unwrap_or(0),
        data.get(1).copied().unwrap_or(0),
        data.get(2).copied().unwrap_or(0),
        data.get(3).copied().unwrap_or(0),
    ]);

    for chunk in data.get(4..).unwrap_or(&[]).chunks(2) {
        let op = chunk[0];
        let advance = u32::from(chunk.get(1).copied().unwrap_or(0));
        now = now.wrapping_add(advance);
        let before = state;

        match op % 3 {
            0 | 1 => {
                let level = if op % 3 == 0 { Level::Pressed } else { Level::Released };
                match state.apply(level, now) {
                    None => assert_eq!(state, before),
                    Some(Transition::Pressed) => {
                        assert_eq!(before.level, Level::Released);
                        assert_eq!(state.press_timestamp, now);
                        assert_eq!(state.pending_count, before.pending_count.saturating_add(1));
                    }
                    Some(Transition::Released { held_ms }) => {
                        assert_eq!(before.level, Level::Pressed);
                        assert_eq!(held_ms, now.wrapping_sub(before.press_timestamp));
                        assert_eq!(state.pending_count, before.pending_count);
                    }
                }
            }
            _ => {
                match state.classify(now) {
                    Some(Gesture::DoubleClick) => assert_eq!(before.pending_count, 2),
                    Some(Gesture::Repeat(n)) => {
                        assert!(n >= 3);
                        assert_eq!(n, before.pending_count);
                    }
                    None => {}
                }
                assert!(state.pending_count == 0 || state.pending_count == before.pending_count);
                assert_eq!(state.level, before.level);
            }
        }
    }
});
