//! GPIO assignments and pin restrictions for the reference board.
//!
//! Single source of truth — the demo binary and the ESP32 adapter
//! reference this module rather than hard-coding pin numbers.

/// BOOT push-button on the DevKitC board (switch to ground, external
/// pull-up fitted).
pub const BUTTON_GPIO: i32 = 0;

/// Highest GPIO number exposed by the ESP32-S3.
pub const MAX_GPIO: i32 = 48;

/// Gap in the S3 GPIO matrix: these numbers have no pad.
pub const MISSING_GPIOS: &[i32] = &[22, 23, 24, 25];

// ---------------------------------------------------------------------------
// Pins unusable for edge interrupts
// ---------------------------------------------------------------------------

/// USB D-/D+ and the octal flash/PSRAM bus.  Attaching an ISR to any of
/// these either breaks the console or hangs the SPI flash controller.
pub const RESERVED_GPIOS: &[i32] = &[19, 20, 26, 27, 28, 29, 30, 31, 32];

/// Strapping pins without internal pull-down on the S3.
pub const NO_PULL_DOWN_GPIOS: &[i32] = &[0];

pub fn is_reserved(pin: i32) -> bool {
    RESERVED_GPIOS.contains(&pin)
}

pub fn exists(pin: i32) -> bool {
    (0..=MAX_GPIO).contains(&pin) && !MISSING_GPIOS.contains(&pin)
}
