//! Button events and the categories listeners subscribe to.
//!
//! ```text
//! ┌──────────────┐ Press / Release  ┌──────────────────────┐
//! │ Edge ISR     │─────────────────▶│                      │
//! └──────────────┘                  │  Listener Registry   │──▶ callbacks
//! ┌──────────────┐ DoubleClick /    │  (per category)      │
//! │ 100 ms tick  │─ Repeat ────────▶│                      │
//! └──────────────┘                  └──────────────────────┘
//! ```

use core::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of the monitored pin (the GPIO number on ESP32).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinId(pub i32);

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO{}", self.0)
    }
}

/// Listener categories.  Each owns an independent listener list and one
/// optional primary callback slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    /// [`ButtonEvent::Press`] and [`ButtonEvent::Release`].
    PressRelease,
    /// [`ButtonEvent::Repeat`] (three or more presses in one burst).
    RepeatCount,
    /// [`ButtonEvent::DoubleClick`].
    DoubleClick,
}

impl EventCategory {
    pub const ALL: [Self; 3] = [Self::PressRelease, Self::RepeatCount, Self::DoubleClick];

    /// Stable, human-readable name used in logs and error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::PressRelease => "press/release",
            Self::RepeatCount => "repeat-count",
            Self::DoubleClick => "double-click",
        }
    }
}

/// Events delivered to listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    /// Released → Pressed transition.
    Press { pin: PinId },
    /// Pressed → Released transition; `held_ms` is the time since the
    /// matching press.
    Release { pin: PinId, held_ms: u32 },
    /// Exactly two presses inside the burst window.
    DoubleClick { pin: PinId },
    /// `count` ≥ 3 presses inside the burst window.
    Repeat { pin: PinId, count: u32 },
}

impl ButtonEvent {
    pub const fn pin(&self) -> PinId {
        match *self {
            Self::Press { pin }
            | Self::Release { pin, .. }
            | Self::DoubleClick { pin }
            | Self::Repeat { pin, .. } => pin,
        }
    }

    pub const fn category(&self) -> EventCategory {
        match self {
            Self::Press { .. } | Self::Release { .. } => EventCategory::PressRelease,
            Self::DoubleClick { .. } => EventCategory::DoubleClick,
            Self::Repeat { .. } => EventCategory::RepeatCount,
        }
    }

    /// Press duration carried by press/release events (0 for a press).
    pub const fn duration_ms(&self) -> Option<u32> {
        match *self {
            Self::Press { .. } => Some(0),
            Self::Release { held_ms, .. } => Some(held_ms),
            Self::DoubleClick { .. } | Self::Repeat { .. } => None,
        }
    }
}
