//! Gesture classification engine.
//!
//! Two preemptive contexts share one [`ButtonCore`]:
//!
//! | Context        | Entry point                              | Emits                 |
//! |----------------|------------------------------------------|-----------------------|
//! | Edge interrupt | [`EdgeDetector::on_transition`]          | Press, Release        |
//! | 100 ms timer   | [`GestureClassifier::on_tick`]           | DoubleClick, Repeat   |
//!
//! Neither context blocks on the other; all state changes go through the
//! short critical sections in [`state::SharedState`] and listener dispatch
//! always happens after the critical section is released.

pub mod classifier;
pub mod edge;
pub mod state;

pub use classifier::GestureClassifier;
pub use edge::EdgeDetector;
pub use state::{ButtonState, Gesture, Level, SharedState, Transition};

use crate::diagnostics::Diagnostics;
use crate::events::PinId;
use crate::listeners::ListenerRegistry;

/// A lone press is discarded once this long has passed without a repeat.
pub const SINGLE_RESET_MS: u32 = 230;
/// Maximum quiet gap after the last press of a burst before it is classified.
pub const BURST_WINDOW_MS: u32 = 250;
/// Classifier period.
pub const TICK_PERIOD_MS: u32 = 100;

/// Everything the edge and tick handlers share for one button.
pub struct ButtonCore {
    pin: PinId,
    pub(crate) state: SharedState,
    pub(crate) listeners: ListenerRegistry,
    pub(crate) diagnostics: Diagnostics,
}

impl ButtonCore {
    pub fn new(pin: PinId, initial: Level) -> Self {
        Self {
            pin,
            state: SharedState::new(initial),
            listeners: ListenerRegistry::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn pin(&self) -> PinId {
        self.pin
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Stop all further state mutation.  Terminal.
    pub(crate) fn shut_down(&self) {
        self.state.close();
    }

    pub fn is_closed(&self) -> bool {
        self.state.is_closed()
    }
}
