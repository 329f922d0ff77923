//! Shared button state and its two read-modify-write operations.
//!
//! [`ButtonState`] is a small `Copy` record.  [`SharedState`] keeps it in
//! a critical-section mutex so that the edge context and the tick context
//! never interleave inside an update.
//!
//! ## Critical-section budget
//!
//! Each lock copies the record out, runs one of the pure transition
//! functions below and copies it back: a few dozen instructions, no
//! allocation, no logging, no listener calls.  This hold time must stay
//! well below the fastest edge spacing a bouncing contact produces
//! (~1 µs on a 240 MHz core versus tens of µs of bounce).

use core::cell::Cell;
use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::CriticalSectionMutex;

use super::{BURST_WINDOW_MS, SINGLE_RESET_MS};

/// Logical button level (polarity already applied by the HAL).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Pressed,
    Released,
}

/// Result of applying a new level to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Pressed,
    Released { held_ms: u32 },
}

/// Multi-press gesture recognised by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    DoubleClick,
    Repeat(u32),
}

/// Per-button timing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonState {
    /// Last observed level.
    pub level: Level,
    /// Tick count (ms) of the most recent press; 0 if never pressed.
    pub press_timestamp: u32,
    /// Presses not yet classified or discarded.
    pub pending_count: u32,
}

impl ButtonState {
    pub const fn new(level: Level) -> Self {
        Self {
            level,
            press_timestamp: 0,
            pending_count: 0,
        }
    }

    /// Apply a level observed at `now_ms`.
    ///
    /// Returns `None` and leaves the record untouched when the level did
    /// not change (duplicate interrupt).  Never resets `pending_count`.
    pub fn apply(&mut self, level: Level, now_ms: u32) -> Option<Transition> {
        if level == self.level {
            return None;
        }
        self.level = level;

        match level {
            Level::Pressed => {
                self.press_timestamp = now_ms;
                self.pending_count = self.pending_count.saturating_add(1);
                Some(Transition::Pressed)
            }
            Level::Released => Some(Transition::Released {
                held_ms: now_ms.wrapping_sub(self.press_timestamp),
            }),
        }
    }

    /// Run one classifier step at `now_ms`.
    ///
    /// A burst of two or more presses is reported once no new press has
    /// arrived for [`BURST_WINDOW_MS`]; a lone press is silently dropped
    /// after [`SINGLE_RESET_MS`].  Both paths clear `pending_count`.
    ///
    /// A press stamped later than `now_ms` (the edge was handled between
    /// the tick sampling its clock and taking the lock) counts as not yet
    /// aged rather than as a wrapped, huge elapsed time.
    pub fn classify(&mut self, now_ms: u32) -> Option<Gesture> {
        let elapsed = now_ms.wrapping_sub(self.press_timestamp);
        if elapsed > u32::MAX / 2 {
            return None;
        }

        if self.pending_count > 1 && elapsed >= BURST_WINDOW_MS {
            let gesture = if self.pending_count > 2 {
                Gesture::Repeat(self.pending_count)
            } else {
                Gesture::DoubleClick
            };
            self.pending_count = 0;
            return Some(gesture);
        }

        if self.pending_count == 1 && elapsed >= SINGLE_RESET_MS {
            self.pending_count = 0;
        }

        None
    }
}

/// [`ButtonState`] shared between the edge and tick contexts.
///
/// Once [`close`](Self::close) returns, no update touches the record: the
/// closed flag is set and checked under the same critical section.
pub struct SharedState {
    inner: CriticalSectionMutex<Cell<ButtonState>>,
    closed: AtomicBool,
}

impl SharedState {
    pub const fn new(level: Level) -> Self {
        Self {
            inner: CriticalSectionMutex::new(Cell::new(ButtonState::new(level))),
            closed: AtomicBool::new(false),
        }
    }

    /// Freeze the record.  Terminal.
    pub fn close(&self) {
        self.inner.lock(|_| self.closed.store(true, Ordering::Release));
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Consistent copy of the current record.
    pub fn snapshot(&self) -> ButtonState {
        self.inner.lock(Cell::get)
    }

    /// [`ButtonState::apply`] under the critical section.  `None` once
    /// closed.
    pub fn record(&self, level: Level, now_ms: u32) -> Option<Transition> {
        self.update(|state| state.apply(level, now_ms))
    }

    /// [`ButtonState::classify`] under the critical section.  `None` once
    /// closed.
    pub fn classify(&self, now_ms: u32) -> Option<Gesture> {
        self.update(|state| state.classify(now_ms))
    }

    fn update<R>(&self, f: impl FnOnce(&mut ButtonState) -> Option<R>) -> Option<R> {
        self.inner.lock(|cell| {
            if self.closed.load(Ordering::Acquire) {
                return None;
            }
            let mut state = cell.get();
            let out = f(&mut state);
            cell.set(state);
            out
        })
    }
}
