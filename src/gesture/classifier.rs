//! Gesture classifier — runs every [`TICK_PERIOD_MS`](super::TICK_PERIOD_MS)
//! whether or not the button is active.

use std::sync::Arc;

use log::debug;

use super::{ButtonCore, Gesture};
use crate::events::ButtonEvent;

/// Turns the pending press count into DoubleClick / Repeat events.
pub struct GestureClassifier {
    core: Arc<ButtonCore>,
}

impl GestureClassifier {
    pub fn new(core: Arc<ButtonCore>) -> Self {
        Self { core }
    }

    /// One periodic step.  Listener failures are contained so the timer
    /// keeps firing.
    pub fn on_tick(&self, now_ms: u32) {
        let core = &self.core;
        if core.is_closed() {
            return;
        }

        let Some(gesture) = core.state.classify(now_ms) else {
            return;
        };
        core.diagnostics.record_gesture();

        let pin = core.pin();
        let event = match gesture {
            Gesture::DoubleClick => ButtonEvent::DoubleClick { pin },
            Gesture::Repeat(count) => ButtonEvent::Repeat { pin, count },
        };
        debug!("button {}: {:?} at {}ms", pin, event, now_ms);

        let failures = core.listeners.dispatch(&event);
        core.diagnostics.record_listener_failures(failures);
    }
}
