//! Polling HAL adapter for any `embedded-hal` input pin.
//!
//! For boards (or simulators) without pin-change interrupts: call
//! [`PolledButtonHal::poll`] from a fast loop and it synthesises the edge
//! and tick callbacks the gesture engine expects.  Edge timestamps are
//! the poll time, so timing resolution equals the poll period.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use embedded_hal::digital::InputPin;
use log::debug;

use crate::config::{ActiveLevel, ButtonConfig};
use crate::error::{ConfigError, HalError, LevelError};
use crate::gesture::Level;
use crate::hal::{ButtonHal, EdgeHandler, EdgeSample, TickHandler};

struct Ticker {
    period_ms: u32,
    /// Deadline of the next tick; `None` until the first poll.
    next_ms: Option<u32>,
    handler: TickHandler,
}

impl Ticker {
    /// Fire at most once per poll.  Deadlines stay on the fixed
    /// `first + k * period` grid whatever the poll interval; periods missed
    /// entirely are skipped, not replayed.
    fn due(&mut self, now_ms: u32) -> Option<TickHandler> {
        let next = self.next_ms.unwrap_or(now_ms);
        if !reached(now_ms, next) {
            return None;
        }
        let period = self.period_ms.max(1);
        let missed = now_ms.wrapping_sub(next) / period;
        self.next_ms = Some(next.wrapping_add(period.wrapping_mul(missed + 1)));
        Some(Arc::clone(&self.handler))
    }
}

/// `now_ms` is at or past `deadline`, modulo `u32` wrap.
fn reached(now_ms: u32, deadline: u32) -> bool {
    now_ms.wrapping_sub(deadline) <= u32::MAX / 2
}

struct PollState<P> {
    pin: P,
    active: ActiveLevel,
    last_high: Option<bool>,
    read_failing: bool,
    edge: Option<EdgeHandler>,
    ticker: Option<Ticker>,
}

/// Polling [`ButtonHal`].  [`poll`](Self::poll) takes `&self`, so it can
/// be driven through [`Button::hal`](crate::Button::hal) after the button
/// has taken ownership.
pub struct PolledButtonHal<P> {
    state: Mutex<PollState<P>>,
}

impl<P: InputPin> PolledButtonHal<P> {
    /// `pin` must already be an input with its pull configured; embedded-hal
    /// has no portable pull API.
    pub fn new(pin: P) -> Self {
        Self {
            state: Mutex::new(PollState {
                pin,
                active: ActiveLevel::Low,
                last_high: None,
                read_failing: false,
                edge: None,
                ticker: None,
            }),
        }
    }

    /// Sample the pin and fire any due callbacks.
    ///
    /// Handlers run after the internal lock is released.
    pub fn poll(&self, now_ms: u32) {
        let (edge, tick) = {
            let mut st = self.lock();
            let level = match st.pin.is_high() {
                Ok(high) => {
                    st.read_failing = false;
                    if st.last_high == Some(high) {
                        None
                    } else {
                        st.last_high = Some(high);
                        Some(Ok(st.active.level_for(high)))
                    }
                }
                // Report a failing pin once, not on every poll.
                Err(_) if st.read_failing => None,
                Err(_) => {
                    st.read_failing = true;
                    Some(Err(LevelError::ReadFailed))
                }
            };
            let edge = level.and_then(|level| st.edge.clone().map(|h| (h, level)));

            let tick = st.ticker.as_mut().and_then(|ticker| ticker.due(now_ms));
            (edge, tick)
        };

        if let Some((handler, level)) = edge {
            handler(EdgeSample { now_ms, level });
        }
        if let Some(handler) = tick {
            handler(now_ms);
        }
    }

    pub fn is_edge_enabled(&self) -> bool {
        self.lock().edge.is_some()
    }

    pub fn is_tick_enabled(&self) -> bool {
        self.lock().ticker.is_some()
    }

    fn lock(&self) -> MutexGuard<'_, PollState<P>> {
        // Handlers never run under this lock.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&mut self) -> &mut PollState<P> {
        self.state.get_mut().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P: InputPin> ButtonHal for PolledButtonHal<P> {
    fn configure(&mut self, config: &ButtonConfig) -> Result<(), ConfigError> {
        self.state_mut().active = config.active;
        debug!("polled hal: GPIO{} active={:?}", config.pin, config.active);
        Ok(())
    }

    fn read_level(&mut self) -> Result<Level, LevelError> {
        let st = self.state_mut();
        let high = st.pin.is_high().map_err(|_| LevelError::ReadFailed)?;
        // The engine seeds its state from this reading; don't replay it
        // as an edge on the first poll.
        st.last_high = Some(high);
        Ok(st.active.level_for(high))
    }

    fn on_edge(&mut self, handler: EdgeHandler) -> Result<(), HalError> {
        self.state_mut().edge = Some(handler);
        Ok(())
    }

    fn off_edge(&mut self) {
        self.state_mut().edge = None;
    }

    fn on_tick(&mut self, period_ms: u32, handler: TickHandler) -> Result<(), HalError> {
        self.state_mut().ticker = Some(Ticker {
            period_ms,
            next_ms: None,
            handler,
        });
        Ok(())
    }

    fn off_tick(&mut self) {
        self.state_mut().ticker = None;
    }
}
