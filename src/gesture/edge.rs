//! Edge detector — runs on every level transition of the button pin.

use std::sync::Arc;

use log::{debug, warn};

use super::{ButtonCore, Transition};
use crate::events::ButtonEvent;
use crate::hal::EdgeSample;

/// Turns raw edge interrupts into Press / Release events.
///
/// Must stay short and non-blocking: it takes the state critical section
/// once, then dispatches with no lock held.
pub struct EdgeDetector {
    core: Arc<ButtonCore>,
}

impl EdgeDetector {
    pub fn new(core: Arc<ButtonCore>) -> Self {
        Self { core }
    }

    /// Handle one edge interrupt.  Listener errors and panics are
    /// contained; nothing propagates to the interrupt source.
    pub fn on_transition(&self, sample: EdgeSample) {
        let core = &self.core;
        if core.is_closed() {
            return;
        }

        let level = match sample.level {
            Ok(level) => level,
            Err(e) => {
                core.diagnostics.record_unrecognized_level();
                warn!("button {}: {} at {}ms, edge ignored", core.pin(), e, sample.now_ms);
                return;
            }
        };
        core.diagnostics.record_edge();

        let Some(transition) = core.state.record(level, sample.now_ms) else {
            // Closed between the check above and the critical section.
            if !core.is_closed() {
                core.diagnostics.record_duplicate_edge();
            }
            return;
        };

        let pin = core.pin();
        let event = match transition {
            Transition::Pressed => ButtonEvent::Press { pin },
            Transition::Released { held_ms } => ButtonEvent::Release { pin, held_ms },
        };
        debug!("button {}: {:?} at {}ms", pin, event, sample.now_ms);

        let failures = core.listeners.dispatch(&event);
        core.diagnostics.record_listener_failures(failures);
    }
}
