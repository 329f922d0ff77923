//! Unified error types for the button gesture engine.
//!
//! Construction-time failures (bad pin, HAL refusing to register a
//! handler) propagate to the caller through [`Error`].  Runtime failures
//! raised inside the edge or tick contexts ([`LevelError`], listener
//! errors) are never returned: they are logged and counted in
//! [`ButtonStats`](crate::diagnostics::ButtonStats) instead.
//! All variants are `Copy` so they can be passed around without allocation.

use core::fmt;

use crate::events::EventCategory;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible public operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The requested pin/pull configuration is invalid or forbidden.
    Config(ConfigError),
    /// The HAL could not install the edge or tick handler.
    Hal(HalError),
    /// A listener handle was never registered for this category.
    NotFound(EventCategory),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Hal(e) => write!(f, "hal: {e}"),
            Self::NotFound(category) => {
                write!(f, "listener not registered for {}", category.name())
            }
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// GPIO number outside the range the platform exposes.
    InvalidPin(i32),
    /// GPIO exists but cannot be used for edge interrupts on this platform.
    ReservedPin(i32),
    /// The platform cannot apply the requested pull resistor to this pin.
    UnsupportedPull(i32),
    /// Serialised configuration could not be parsed.
    Malformed,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPin(pin) => write!(f, "GPIO {pin} does not exist"),
            Self::ReservedPin(pin) => write!(f, "GPIO {pin} not allowed for interrupt use"),
            Self::UnsupportedPull(pin) => write!(f, "GPIO {pin} has no such pull resistor"),
            Self::Malformed => write!(f, "malformed configuration"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// HAL errors
// ---------------------------------------------------------------------------

/// Failures while wiring the core into the platform's interrupt/timer
/// services.  The payload is the platform return code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalError {
    EdgeRegistration(i32),
    TimerRegistration(i32),
}

impl fmt::Display for HalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EdgeRegistration(rc) => write!(f, "edge interrupt registration failed (rc={rc})"),
            Self::TimerRegistration(rc) => write!(f, "periodic timer registration failed (rc={rc})"),
        }
    }
}

impl From<HalError> for Error {
    fn from(e: HalError) -> Self {
        Self::Hal(e)
    }
}

// ---------------------------------------------------------------------------
// Level read errors (reported, never propagated)
// ---------------------------------------------------------------------------

/// The HAL produced a reading outside {Pressed, Released}.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelError {
    /// Raw register value that maps to neither level.
    Unrecognized(i32),
    /// The underlying pin read itself failed.
    ReadFailed,
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrecognized(raw) => write!(f, "unrecognized level {raw}"),
            Self::ReadFailed => write!(f, "pin read failed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
