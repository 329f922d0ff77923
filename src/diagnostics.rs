//! Runtime counters for a button.
//!
//! Failures inside the edge and tick contexts are contained rather than
//! returned; these counters are how they stay visible.  Counters are
//! relaxed atomics bumped from either context and read on demand via
//! [`Diagnostics::snapshot`], e.g. for a periodic health log line.

use core::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

/// Point-in-time copy of a button's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonStats {
    /// Edges with a recognised level (including duplicates).
    pub edges: u32,
    /// Edges whose level matched the stored level and were ignored.
    pub duplicate_edges: u32,
    /// Edges whose level could not be read or decoded.
    pub unrecognized_levels: u32,
    /// Listener invocations that returned an error.
    pub listener_failures: u32,
    /// DoubleClick and Repeat events produced by the classifier.
    pub gestures: u32,
}

#[derive(Default)]
pub struct Diagnostics {
    edges: AtomicU32,
    duplicate_edges: AtomicU32,
    unrecognized_levels: AtomicU32,
    listener_failures: AtomicU32,
    gestures: AtomicU32,
}

impl Diagnostics {
    pub const fn new() -> Self {
        Self {
            edges: AtomicU32::new(0),
            duplicate_edges: AtomicU32::new(0),
            unrecognized_levels: AtomicU32::new(0),
            listener_failures: AtomicU32::new(0),
            gestures: AtomicU32::new(0),
        }
    }

    pub(crate) fn record_edge(&self) {
        self.edges.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_duplicate_edge(&self) {
        self.duplicate_edges.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unrecognized_level(&self) {
        self.unrecognized_levels.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_listener_failures(&self, n: u32) {
        if n > 0 {
            self.listener_failures.fetch_add(n, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_gesture(&self) {
        self.gestures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ButtonStats {
        ButtonStats {
            edges: self.edges.load(Ordering::Relaxed),
            duplicate_edges: self.duplicate_edges.load(Ordering::Relaxed),
            unrecognized_levels: self.unrecognized_levels.load(Ordering::Relaxed),
            listener_failures: self.listener_failures.load(Ordering::Relaxed),
            gestures: self.gestures.load(Ordering::Relaxed),
        }
    }
}
