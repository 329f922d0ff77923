//! ESP32-S3 HAL adapter (ESP-IDF).
//!
//! - **Edges**: a GPIO any-edge ISR timestamps the edge with
//!   `esp_timer_get_time()`, samples the pin and pushes the pair onto a
//!   lock-free [`heapless::mpmc::Q16`].  A small edge task drains the
//!   queue into the edge detector, so listeners never run inside the ISR
//!   itself (no logging or allocation is legal there).
//! - **Ticks**: a periodic `esp_timer` dispatched from the ESP timer task.
//!
//! Timestamps come from the ISR, so edge timing is exact even though
//! dispatch lags by up to one edge-task poll interval.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use esp_idf_svc::sys::*;
use heapless::mpmc::Q16;
use log::{debug, error, info, warn};

use crate::config::{ActiveLevel, ButtonConfig, Pull};
use crate::error::{ConfigError, HalError, LevelError};
use crate::gesture::Level;
use crate::hal::{ButtonHal, EdgeHandler, EdgeSample, HandlerSlot, TickHandler};
use crate::pins;

/// Edge task poll interval.  One FreeRTOS tick at the default 100 Hz.
const EDGE_POLL_MS: u64 = 10;
const EDGE_TASK_STACK: usize = 4 * 1024;
/// Above the main task (1) so listeners run promptly after an edge.
const EDGE_TASK_PRIORITY: i32 = 5;
/// APP_CPU; WiFi/BLE stacks live on core 0.
const EDGE_TASK_CORE: i32 = 1;

#[derive(Clone, Copy)]
struct RawEdge {
    now_ms: u32,
    raw: i32,
}

/// State reachable from the ISR.  Leaked once per adapter so the ISR can
/// hold a `'static` reference for as long as the handler is installed.
struct IsrContext {
    pin: i32,
    queue: Q16<RawEdge>,
    dropped: AtomicU32,
}

/// SAFETY: `arg` is the `&'static IsrContext` registered in `on_edge`.
/// Only a register read, an RTC counter read and a lock-free enqueue
/// happen here, all of which are ISR-safe.
unsafe extern "C" fn edge_isr(arg: *mut core::ffi::c_void) {
    let ctx = unsafe { &*(arg as *const IsrContext) };
    let now_ms = (unsafe { esp_timer_get_time() } / 1_000) as u32;
    let raw = unsafe { gpio_get_level(ctx.pin) };
    if ctx.queue.enqueue(RawEdge { now_ms, raw }).is_err() {
        ctx.dropped.fetch_add(1, Ordering::Relaxed);
    }
}

/// Timer callback argument.  Leaked once per adapter like [`IsrContext`];
/// `off_tick` only empties it.
type TickSlot = HandlerSlot<TickHandler>;

/// SAFETY: `arg` is the `&'static TickSlot` registered in `on_tick`.
unsafe extern "C" fn tick_cb(arg: *mut core::ffi::c_void) {
    let slot = unsafe { &*(arg as *const TickSlot) };
    let Some(handler) = slot.current() else {
        return;
    };
    let now_ms = (unsafe { esp_timer_get_time() } / 1_000) as u32;
    handler(now_ms);
}

fn decode(raw: i32, active: ActiveLevel) -> Result<Level, LevelError> {
    match raw {
        0 => Ok(active.level_for(false)),
        1 => Ok(active.level_for(true)),
        other => Err(LevelError::Unrecognized(other)),
    }
}

pub struct Esp32ButtonHal {
    pin: i32,
    active: ActiveLevel,
    isr: Option<&'static IsrContext>,
    edge_running: Arc<AtomicBool>,
    edge_task: Option<JoinHandle<()>>,
    timer: esp_timer_handle_t,
    tick: Option<&'static TickSlot>,
}

impl Default for Esp32ButtonHal {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32ButtonHal {
    pub fn new() -> Self {
        Self {
            pin: -1,
            active: ActiveLevel::Low,
            isr: None,
            edge_running: Arc::new(AtomicBool::new(false)),
            edge_task: None,
            timer: core::ptr::null_mut(),
            tick: None,
        }
    }

    /// Edges lost because the ISR queue was full.
    pub fn dropped_edges(&self) -> u32 {
        self.isr.map_or(0, |ctx| ctx.dropped.load(Ordering::Relaxed))
    }
}

impl ButtonHal for Esp32ButtonHal {
    fn configure(&mut self, config: &ButtonConfig) -> Result<(), ConfigError> {
        let pin = config.pin;
        if !pins::exists(pin) {
            return Err(ConfigError::InvalidPin(pin));
        }
        if pins::is_reserved(pin) {
            return Err(ConfigError::ReservedPin(pin));
        }
        if config.pull == Pull::Down && pins::NO_PULL_DOWN_GPIOS.contains(&pin) {
            return Err(ConfigError::UnsupportedPull(pin));
        }

        let pull_mode = match config.pull {
            Pull::None => gpio_pull_mode_t_GPIO_FLOATING,
            Pull::Up => gpio_pull_mode_t_GPIO_PULLUP_ONLY,
            Pull::Down => gpio_pull_mode_t_GPIO_PULLDOWN_ONLY,
        };

        // SAFETY: plain register configuration of a pin validated above,
        // done from the application task before any handler is installed.
        unsafe {
            if gpio_reset_pin(pin) != ESP_OK
                || gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_INPUT) != ESP_OK
            {
                return Err(ConfigError::InvalidPin(pin));
            }
            if gpio_set_pull_mode(pin, pull_mode) != ESP_OK {
                return Err(ConfigError::UnsupportedPull(pin));
            }
        }

        self.pin = pin;
        self.active = config.active;
        info!("esp32 hal: GPIO{} input, pull={:?}", pin, config.pull);
        Ok(())
    }

    fn read_level(&mut self) -> Result<Level, LevelError> {
        // SAFETY: register read of the configured input pin.
        decode(unsafe { gpio_get_level(self.pin) }, self.active)
    }

    fn on_edge(&mut self, handler: EdgeHandler) -> Result<(), HalError> {
        let ctx: &'static IsrContext = match self.isr {
            Some(ctx) => ctx,
            None => {
                let ctx = Box::leak(Box::new(IsrContext {
                    pin: self.pin,
                    queue: Q16::new(),
                    dropped: AtomicU32::new(0),
                }));
                self.isr = Some(ctx);
                ctx
            }
        };

        // SAFETY: applies to the next pthread_create() from this thread,
        // which is the spawn directly below.
        unsafe {
            let mut cfg = esp_create_default_pthread_config();
            cfg.pin_to_core = EDGE_TASK_CORE;
            cfg.prio = EDGE_TASK_PRIORITY;
            cfg.stack_size = EDGE_TASK_STACK as i32;
            cfg.thread_name = b"btn-edge\0".as_ptr() as *const _;
            let ret = esp_pthread_set_cfg(&cfg);
            if ret != ESP_OK {
                return Err(HalError::EdgeRegistration(ret));
            }
        }

        self.edge_running.store(true, Ordering::Release);
        let running = Arc::clone(&self.edge_running);
        let active = self.active;
        let task = std::thread::Builder::new()
            .name("btn-edge".into())
            .spawn(move || {
                while running.load(Ordering::Acquire) {
                    while let Some(edge) = ctx.queue.dequeue() {
                        handler(EdgeSample {
                            now_ms: edge.now_ms,
                            level: decode(edge.raw, active),
                        });
                    }
                    std::thread::sleep(Duration::from_millis(EDGE_POLL_MS));
                }
            })
            .map_err(|e| {
                error!("esp32 hal: edge task spawn failed: {}", e);
                HalError::EdgeRegistration(ESP_FAIL as i32)
            })?;
        self.edge_task = Some(task);

        // SAFETY: `ctx` is 'static and outlives the handler registration;
        // edge_isr only touches ISR-safe state.
        unsafe {
            let ret = gpio_install_isr_service(0);
            if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE as i32 {
                self.stop_edge_task();
                return Err(HalError::EdgeRegistration(ret));
            }
            gpio_set_intr_type(self.pin, gpio_int_type_t_GPIO_INTR_ANYEDGE);
            let ret = gpio_isr_handler_add(
                self.pin,
                Some(edge_isr),
                ctx as *const IsrContext as *mut core::ffi::c_void,
            );
            if ret != ESP_OK {
                self.stop_edge_task();
                return Err(HalError::EdgeRegistration(ret));
            }
            gpio_intr_enable(self.pin);
        }
        debug!("esp32 hal: GPIO{} any-edge ISR installed", self.pin);
        Ok(())
    }

    fn off_edge(&mut self) {
        if self.edge_task.is_none() {
            return;
        }
        // SAFETY: removes the handler installed in on_edge for this pin.
        unsafe {
            gpio_intr_disable(self.pin);
            gpio_isr_handler_remove(self.pin);
        }
        self.stop_edge_task();
    }

    fn on_tick(&mut self, period_ms: u32, handler: TickHandler) -> Result<(), HalError> {
        let slot: &'static TickSlot = match self.tick {
            Some(slot) => slot,
            None => {
                let slot = Box::leak(Box::new(TickSlot::new()));
                self.tick = Some(slot);
                slot
            }
        };
        drop(slot.replace(Some(handler)));

        let args = esp_timer_create_args_t {
            callback: Some(tick_cb),
            arg: slot as *const TickSlot as *mut core::ffi::c_void,
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"btn-tick\0".as_ptr() as *const _,
            skip_unhandled_events: true,
        };

        // SAFETY: `slot` is 'static, so the timer may fire at any point
        // until it is deleted.
        unsafe {
            let ret = esp_timer_create(&args, &mut self.timer);
            if ret != ESP_OK {
                self.timer = core::ptr::null_mut();
                drop(slot.replace(None));
                return Err(HalError::TimerRegistration(ret));
            }
            let ret = esp_timer_start_periodic(self.timer, u64::from(period_ms) * 1_000);
            if ret != ESP_OK {
                esp_timer_delete(self.timer);
                self.timer = core::ptr::null_mut();
                drop(slot.replace(None));
                return Err(HalError::TimerRegistration(ret));
            }
        }
        debug!("esp32 hal: classifier timer @{}ms", period_ms);
        Ok(())
    }

    fn off_tick(&mut self) {
        if self.timer.is_null() {
            return;
        }
        // SAFETY: timer handle created in on_tick; null-check above
        // prevents a double delete.
        unsafe {
            esp_timer_stop(self.timer);
            let ret = esp_timer_delete(self.timer);
            if ret != ESP_OK {
                warn!("esp32 hal: timer delete failed ({})", ret);
            }
        }
        self.timer = core::ptr::null_mut();
        // A callback that already cloned the handler finishes with its own
        // reference; later fires find the slot empty.
        if let Some(slot) = self.tick {
            drop(slot.replace(None));
        }
    }
}

impl Esp32ButtonHal {
    fn stop_edge_task(&mut self) {
        self.edge_running.store(false, Ordering::Release);
        if let Some(task) = self.edge_task.take() {
            if task.join().is_err() {
                warn!("esp32 hal: edge task panicked");
            }
        }
    }
}

impl Drop for Esp32ButtonHal {
    fn drop(&mut self) {
        self.off_edge();
        self.off_tick();
    }
}
