//! Button driven end to end through the polling adapter.

use core::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clickwise::adapters::polled::PolledButtonHal;
use clickwise::{Button, ButtonConfig, ButtonEvent, EventCategory, PinId};
use embedded_hal::digital::{ErrorType, InputPin};

use crate::mock_hal::Recorder;

/// Active-low line: `true` is the idle (released) level.
#[derive(Clone)]
struct Line(Arc<AtomicBool>);

impl Line {
    fn set_pressed(&self, pressed: bool) {
        self.0.store(!pressed, Ordering::SeqCst);
    }
}

impl ErrorType for Line {
    type Error = Infallible;
}

impl InputPin for Line {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.0.load(Ordering::SeqCst))
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.0.load(Ordering::SeqCst))
    }
}

#[test]
fn polled_double_click() {
    let line = Line(Arc::new(AtomicBool::new(true)));
    let button = Button::new(ButtonConfig::new(9), PolledButtonHal::new(line.clone())).unwrap();
    let rec = Recorder::new();
    for category in EventCategory::ALL {
        button.add_listener(category, rec.listener());
    }

    // Poll every 10 ms; the adapter ticks every 100 ms from the first poll.
    for now in (0..=600).step_by(10) {
        match now {
            10 | 130 => line.set_pressed(true),
            60 | 170 => line.set_pressed(false),
            _ => {}
        }
        button.hal().poll(now);
    }

    let pin = PinId(9);
    assert_eq!(
        rec.events(),
        vec![
            ButtonEvent::Press { pin },
            ButtonEvent::Release { pin, held_ms: 50 },
            ButtonEvent::Press { pin },
            ButtonEvent::Release { pin, held_ms: 40 },
            ButtonEvent::DoubleClick { pin },
        ]
    );
}

#[test]
fn close_stops_polling_callbacks() {
    let line = Line(Arc::new(AtomicBool::new(true)));
    let mut button = Button::new(ButtonConfig::new(9), PolledButtonHal::new(line.clone())).unwrap();
    let rec = Recorder::new();
    button.add_listener(EventCategory::PressRelease, rec.listener());

    button.close();
    assert!(!button.hal().is_edge_enabled());
    assert!(!button.hal().is_tick_enabled());

    line.set_pressed(true);
    button.hal().poll(0);
    assert!(rec.events().is_empty());
}
