//! Adapters — concrete implementations of the [`ButtonHal`](crate::hal::ButtonHal)
//! port, plus ready-made listeners.
//!
//! | Adapter        | Implements  | Connects to                        |
//! |----------------|-------------|------------------------------------|
//! | `esp32`        | ButtonHal   | ESP-IDF GPIO ISR + `esp_timer`     |
//! | `polled`       | ButtonHal   | any `embedded-hal` input pin       |
//! | `log_listener` | Listener    | Serial log output                  |

#[cfg(all(feature = "espidf", target_os = "espidf"))]
pub mod esp32;
pub mod log_listener;
pub mod polled;
