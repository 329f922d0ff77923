//! Log-based listener adapter.
//!
//! Writes every [`ButtonEvent`] to the `log` facade (UART / USB-CDC on the
//! device, stderr under test).  Register it like any other listener:
//!
//! ```ignore
//! button.add_listener(EventCategory::DoubleClick, LogListener::emit);
//! ```

use log::info;

use crate::events::ButtonEvent;

/// Listener that logs each event to the serial console.
pub struct LogListener;

impl LogListener {
    pub fn emit(event: &ButtonEvent) -> anyhow::Result<()> {
        match event {
            ButtonEvent::Press { pin } => {
                info!("BUTTON | {} | pressed", pin);
            }
            ButtonEvent::Release { pin, held_ms } => {
                info!("BUTTON | {} | released after {}ms", pin, held_ms);
            }
            ButtonEvent::DoubleClick { pin } => {
                info!("BUTTON | {} | double click", pin);
            }
            ButtonEvent::Repeat { pin, count } => {
                info!("BUTTON | {} | repeat x{}", pin, count);
            }
        }
        Ok(())
    }
}
