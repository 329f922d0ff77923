//! Interrupt-driven button with press, release, double-click and repeat
//! detection.
//!
//! ## Hardware
//!
//! Momentary switch on any interrupt-capable GPIO.  The HAL fires the
//! edge detector on both edges and the classifier every 100 ms; see
//! [`gesture`](crate::gesture) for the timing protocol.
//!
//! ## Gesture detection
//!
//! | Gesture      | Condition                                   | Event          |
//! |--------------|---------------------------------------------|----------------|
//! | Press        | Released → Pressed edge                     | `Press`        |
//! | Release      | Pressed → Released edge                     | `Release`      |
//! | Double click | 2 presses, then 250 ms without a press      | `DoubleClick`  |
//! | Repeat       | N ≥ 3 presses, then 250 ms without a press  | `Repeat`       |
//!
//! ## Lifecycle
//!
//! ```text
//!   new() ──▶ Active ──close()/drop──▶ Closed (terminal)
//! ```

use std::sync::Arc;

use log::{info, warn};

use crate::config::ButtonConfig;
use crate::diagnostics::ButtonStats;
use crate::error::Result;
use crate::events::{ButtonEvent, EventCategory, PinId};
use crate::gesture::{ButtonCore, EdgeDetector, GestureClassifier, Level, TICK_PERIOD_MS};
use crate::hal::ButtonHal;
use crate::listeners::{Listener, ListenerId};

/// Lifecycle of a [`Button`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Edge interrupt and periodic timer installed.
    Active,
    /// Interrupt and timer disabled; no further state mutation.
    Closed,
}

/// A monitored button bound to one HAL instance.
pub struct Button<H: ButtonHal> {
    hal: H,
    core: Arc<ButtonCore>,
    lifecycle: LifecycleState,
}

impl<H: ButtonHal> Button<H> {
    /// Configure the pin, seed the level from the HAL and install the
    /// edge and tick handlers.
    ///
    /// Configuration problems are fatal: the HAL is left with nothing
    /// installed and the error is returned.
    pub fn new(config: ButtonConfig, mut hal: H) -> Result<Self> {
        config.validate()?;
        hal.configure(&config)?;

        let initial = hal.read_level().unwrap_or_else(|e| {
            warn!("button GPIO{}: initial read failed ({}), assuming released", config.pin, e);
            Level::Released
        });
        let core = Arc::new(ButtonCore::new(PinId(config.pin), initial));

        let edge = EdgeDetector::new(Arc::clone(&core));
        hal.on_edge(Arc::new(move |sample| edge.on_transition(sample)))?;

        let classifier = GestureClassifier::new(Arc::clone(&core));
        if let Err(e) = hal.on_tick(TICK_PERIOD_MS, Arc::new(move |now_ms| classifier.on_tick(now_ms))) {
            hal.off_edge();
            return Err(e.into());
        }

        info!(
            "button {}: active (pull={:?}, active={:?}, initial={:?})",
            core.pin(),
            config.pull,
            config.active,
            initial
        );

        Ok(Self {
            hal,
            core,
            lifecycle: LifecycleState::Active,
        })
    }

    pub fn pin(&self) -> PinId {
        self.core.pin()
    }

    /// Level as last observed by the edge detector.
    pub fn level(&self) -> Level {
        self.core.state().snapshot().level
    }

    /// Presses not yet classified or discarded.
    pub fn pending_count(&self) -> u32 {
        self.core.state().snapshot().pending_count
    }

    pub fn lifecycle(&self) -> LifecycleState {
        self.lifecycle
    }

    pub fn is_closed(&self) -> bool {
        self.lifecycle == LifecycleState::Closed
    }

    pub fn stats(&self) -> ButtonStats {
        self.core.diagnostics().snapshot()
    }

    pub fn hal(&self) -> &H {
        &self.hal
    }

    // ── Listener lists ────────────────────────────────────────

    pub fn add_listener<F>(&self, category: EventCategory, f: F) -> ListenerId
    where
        F: Fn(&ButtonEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.core.listeners().add(category, f)
    }

    pub fn remove_listener(&self, category: EventCategory, id: ListenerId) -> Result<()> {
        self.core.listeners().remove(category, id)
    }

    // ── Primary callbacks (one per category) ──────────────────

    /// Primary callback for Press/Release events.  Replaces any previous one.
    pub fn on_click<F>(&self, f: F)
    where
        F: Fn(&ButtonEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.set_primary(EventCategory::PressRelease, Arc::new(f));
    }

    /// Primary callback for Repeat events (three or more presses).
    pub fn on_counter<F>(&self, f: F)
    where
        F: Fn(&ButtonEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.set_primary(EventCategory::RepeatCount, Arc::new(f));
    }

    /// Primary callback for DoubleClick events.
    pub fn on_double_click<F>(&self, f: F)
    where
        F: Fn(&ButtonEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.set_primary(EventCategory::DoubleClick, Arc::new(f));
    }

    /// Whether a primary listener occupies the slot for `category`.
    pub fn has_primary(&self, category: EventCategory) -> bool {
        self.core.listeners().has_primary(category)
    }

    pub fn clear_primary(&self, category: EventCategory) {
        drop(self.core.listeners().set_primary(category, None));
    }

    fn set_primary(&self, category: EventCategory, listener: Listener) {
        drop(self.core.listeners().set_primary(category, Some(listener)));
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Disable the edge interrupt and the periodic timer.
    ///
    /// Idempotent.  A handler invocation already running on another
    /// context may still finish, but it will not touch the button state.
    pub fn close(&mut self) {
        if self.lifecycle == LifecycleState::Closed {
            return;
        }
        self.core.shut_down();
        self.hal.off_edge();
        self.hal.off_tick();
        self.lifecycle = LifecycleState::Closed;
        info!("button {}: closed", self.core.pin());
    }
}

impl<H: ButtonHal> Drop for Button<H> {
    fn drop(&mut self) {
        self.close();
    }
}
