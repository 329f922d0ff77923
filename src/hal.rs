//! HAL port — the capability boundary between the gesture engine and the
//! platform.
//!
//! ```text
//!   Platform adapter ──▶ ButtonHal ──▶ Button (edge detector + classifier)
//! ```
//!
//! An adapter reads the pin, calls the edge handler on every level change
//! and the tick handler on a fixed period.  The engine never talks to
//! hardware directly, so one implementation per platform is all that
//! changes between boards.

use std::sync::{Arc, Mutex};

use crate::config::ButtonConfig;
use crate::error::{ConfigError, HalError, LevelError};
use crate::gesture::Level;

/// One edge observation, captured as close to the interrupt as possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeSample {
    /// Monotonic milliseconds at the edge (wraps at `u32::MAX`).
    pub now_ms: u32,
    /// Level read right after the edge, polarity applied.
    pub level: Result<Level, LevelError>,
}

/// Invoked from the edge-interrupt context.
pub type EdgeHandler = Arc<dyn Fn(EdgeSample) + Send + Sync>;

/// Invoked from the periodic-timer context with the current time in ms.
pub type TickHandler = Arc<dyn Fn(u32) + Send + Sync>;

/// Capabilities the gesture engine needs from a platform.
pub trait ButtonHal {
    /// Claim and configure the input pin.  Reject pins the platform
    /// cannot use for edge interrupts.
    fn configure(&mut self, config: &ButtonConfig) -> Result<(), ConfigError>;

    /// Current logical level of the pin.
    fn read_level(&mut self) -> Result<Level, LevelError>;

    /// Start calling `handler` on every edge (both directions).
    fn on_edge(&mut self, handler: EdgeHandler) -> Result<(), HalError>;

    /// Stop edge callbacks.  An invocation already running may complete.
    fn off_edge(&mut self);

    /// Start calling `handler` every `period_ms`.
    fn on_tick(&mut self, period_ms: u32, handler: TickHandler) -> Result<(), HalError>;

    /// Stop tick callbacks.  An invocation already running may complete.
    fn off_tick(&mut self);
}

/// Handler storage for adapters whose callback argument must outlive the
/// registration, e.g. a raw pointer handed to a C timer.
///
/// The slot itself is never freed while registered; `off_*` only empties
/// it.  A callback clones the handler out and runs it without holding the
/// lock, so a concurrent clear cannot free a handler that is still running.
pub struct HandlerSlot<T> {
    handler: Mutex<Option<T>>,
}

impl<T: Clone> HandlerSlot<T> {
    pub const fn new() -> Self {
        Self { handler: Mutex::new(None) }
    }

    /// The installed handler, if any.
    pub fn current(&self) -> Option<T> {
        match self.handler.lock() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Install `handler` (or clear with `None`), returning the previous one.
    pub fn replace(&self, handler: Option<T>) -> Option<T> {
        match self.handler.lock() {
            Ok(mut slot) => core::mem::replace(&mut *slot, handler),
            Err(poisoned) => core::mem::replace(&mut *poisoned.into_inner(), handler),
        }
    }
}

impl<T: Clone> Default for HandlerSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
