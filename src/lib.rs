//! Clickwise button gesture library.
//!
//! Classifies press, release, double-click and repeat gestures on a
//! momentary switch from two inputs: an edge interrupt and a 100 ms
//! periodic tick.  Platform access goes through the [`hal::ButtonHal`]
//! port; the ESP-IDF adapter is guarded by `#[cfg(target_os = "espidf")]`.

#![deny(unused_must_use)]

pub mod adapters;
pub mod config;
pub mod diagnostics;
pub mod drivers;
pub mod error;
pub mod events;
pub mod gesture;
pub mod hal;
pub mod listeners;
pub mod pins;

pub use config::{ActiveLevel, ButtonConfig, Pull};
pub use diagnostics::ButtonStats;
pub use drivers::button::{Button, LifecycleState};
pub use error::{ConfigError, Error, HalError, LevelError, Result};
pub use events::{ButtonEvent, EventCategory, PinId};
pub use gesture::Level;
pub use hal::{ButtonHal, EdgeHandler, EdgeSample, HandlerSlot, TickHandler};
pub use listeners::{Listener, ListenerId};
