//! Button configuration.
//!
//! Describes which pin the button sits on and how it is wired.  The
//! gesture timing windows are protocol constants (see
//! [`gesture`](crate::gesture)) and deliberately not part of this struct.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::gesture::Level;
use crate::pins;

/// Internal pull resistor applied to the button input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pull {
    /// Floating input; external resistor expected.
    #[default]
    None,
    Up,
    Down,
}

/// Electrical level that means "pressed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveLevel {
    /// Logic 0 = pressed (switch to ground).
    #[default]
    Low,
    /// Logic 1 = pressed (switch to supply).
    High,
}

impl ActiveLevel {
    /// Map an electrical reading to a logical button level.
    pub const fn level_for(self, is_high: bool) -> Level {
        match (self, is_high) {
            (Self::Low, false) | (Self::High, true) => Level::Pressed,
            (Self::Low, true) | (Self::High, false) => Level::Released,
        }
    }
}

/// Per-button configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonConfig {
    /// GPIO number the button is attached to.
    pub pin: i32,
    /// Pull resistor to enable on the pin.
    #[serde(default)]
    pub pull: Pull,
    /// Which level counts as pressed.
    #[serde(default)]
    pub active: ActiveLevel,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            pin: pins::BUTTON_GPIO,
            pull: Pull::Up,
            active: ActiveLevel::Low,
        }
    }
}

impl ButtonConfig {
    /// Floating, active-low input on `pin`.
    pub fn new(pin: i32) -> Self {
        Self {
            pin,
            pull: Pull::None,
            active: ActiveLevel::Low,
        }
    }

    pub fn with_pull(mut self, pull: Pull) -> Self {
        self.pull = pull;
        self
    }

    pub fn with_active(mut self, active: ActiveLevel) -> Self {
        self.active = active;
        self
    }

    /// Platform-independent sanity check: pin numbers are non-negative.
    /// Range and reserved-pin policy belong to the HAL adapter's
    /// `configure`, since they differ per board.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pin < 0 {
            return Err(ConfigError::InvalidPin(self.pin));
        }
        Ok(())
    }

    /// Parse and validate a JSON board definition such as
    /// `{"pin": 4, "pull": "up", "active": "low"}`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }
}
