//! Listener registration, primary callbacks and failure isolation.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use clickwise::{Button, ButtonConfig, ButtonEvent, Error, EventCategory, Level, PinId};

use crate::mock_hal::{MockHal, MockHandle, Recorder};

fn button() -> (Button<MockHal>, MockHandle) {
    let (hal, handle) = MockHal::new();
    (Button::new(ButtonConfig::new(5), hal).unwrap(), handle)
}

fn double_click(hal: &MockHandle) {
    hal.run(
        &[
            (0, Level::Pressed),
            (50, Level::Released),
            (120, Level::Pressed),
            (160, Level::Released),
        ],
        500,
    );
}

#[test]
fn list_listeners_run_in_order_then_primary() {
    let (button, hal) = button();
    let order = Arc::new(Mutex::new(Vec::new()));

    let o = Arc::clone(&order);
    button.on_double_click(move |_: &ButtonEvent| {
        o.lock().unwrap().push("primary");
        Ok(())
    });
    for name in ["first", "second"] {
        let o = Arc::clone(&order);
        button.add_listener(EventCategory::DoubleClick, move |_: &ButtonEvent| {
            o.lock().unwrap().push(name);
            Ok(())
        });
    }

    double_click(&hal);

    assert_eq!(*order.lock().unwrap(), vec!["first", "second", "primary"]);
}

#[test]
fn removed_listener_is_not_called() {
    let (button, hal) = button();
    let kept = Recorder::new();
    let dropped = Recorder::new();

    button.add_listener(EventCategory::PressRelease, kept.listener());
    let id = button.add_listener(EventCategory::PressRelease, dropped.listener());
    button.remove_listener(EventCategory::PressRelease, id).unwrap();

    hal.press(0);
    hal.release(30);

    assert_eq!(kept.events().len(), 2);
    assert!(dropped.events().is_empty());
}

#[test]
fn removing_twice_reports_not_found() {
    let (button, _hal) = button();
    let id = button.add_listener(EventCategory::RepeatCount, |_: &ButtonEvent| Ok(()));

    assert!(button.remove_listener(EventCategory::RepeatCount, id).is_ok());
    assert_eq!(
        button.remove_listener(EventCategory::RepeatCount, id),
        Err(Error::NotFound(EventCategory::RepeatCount))
    );
}

#[test]
fn removing_from_wrong_category_reports_not_found() {
    let (button, _hal) = button();
    let id = button.add_listener(EventCategory::DoubleClick, |_: &ButtonEvent| Ok(()));

    assert_eq!(
        button.remove_listener(EventCategory::PressRelease, id),
        Err(Error::NotFound(EventCategory::PressRelease))
    );
    // Still registered where it was added.
    assert!(button.remove_listener(EventCategory::DoubleClick, id).is_ok());
}

#[test]
fn same_callback_registered_twice_runs_twice() {
    let (button, hal) = button();
    let calls = Arc::new(AtomicU32::new(0));
    let c = Arc::clone(&calls);
    let listener = move |_: &ButtonEvent| {
        c.fetch_add(1, Ordering::SeqCst);
        Ok(())
    };

    let a = button.add_listener(EventCategory::PressRelease, listener.clone());
    let b = button.add_listener(EventCategory::PressRelease, listener);
    assert_ne!(a, b);

    hal.press(0);
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    button.remove_listener(EventCategory::PressRelease, a).unwrap();
    hal.release(40);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn failing_listener_does_not_stop_the_rest() {
    let (button, hal) = button();
    let rec = Recorder::new();

    button.add_listener(EventCategory::PressRelease, |_: &ButtonEvent| {
        Err(anyhow!("display offline"))
    });
    button.add_listener(EventCategory::PressRelease, rec.listener());
    button.on_click(|_: &ButtonEvent| Err(anyhow!("primary offline")));

    hal.press(0);
    hal.release(30);

    assert_eq!(rec.events().len(), 2);
    assert_eq!(button.stats().listener_failures, 4);
    // Engine state advanced normally.
    assert_eq!(button.level(), Level::Released);
    assert_eq!(button.pending_count(), 1);
}

#[test]
fn failing_gesture_listener_does_not_block_later_gestures() {
    let (button, hal) = button();
    let seen = Arc::new(AtomicU32::new(0));
    let s = Arc::clone(&seen);
    button.on_double_click(move |_: &ButtonEvent| {
        s.fetch_add(1, Ordering::SeqCst);
        Err(anyhow!("boom"))
    });

    double_click(&hal);
    hal.run(
        &[
            (600, Level::Pressed),
            (640, Level::Released),
            (700, Level::Pressed),
            (740, Level::Released),
        ],
        1_200,
    );

    assert_eq!(seen.load(Ordering::SeqCst), 2);
    assert_eq!(button.stats().gestures, 2);
}

#[test]
fn primary_is_replaced_and_cleared() {
    let (button, hal) = button();
    let old = Recorder::new();
    let new = Recorder::new();

    button.on_counter(old.listener());
    button.on_counter(new.listener());
    hal.run(
        &[
            (0, Level::Pressed),
            (20, Level::Released),
            (60, Level::Pressed),
            (80, Level::Released),
            (120, Level::Pressed),
            (140, Level::Released),
        ],
        500,
    );

    assert!(old.events().is_empty());
    assert_eq!(new.events(), vec![ButtonEvent::Repeat { pin: PinId(5), count: 3 }]);
    assert!(button.has_primary(EventCategory::RepeatCount));
    assert!(!button.has_primary(EventCategory::DoubleClick));

    button.clear_primary(EventCategory::RepeatCount);
    assert!(!button.has_primary(EventCategory::RepeatCount));
    hal.run(
        &[
            (600, Level::Pressed),
            (620, Level::Released),
            (660, Level::Pressed),
            (680, Level::Released),
            (720, Level::Pressed),
            (740, Level::Released),
        ],
        1_200,
    );
    assert_eq!(new.events().len(), 1);
}

#[test]
fn categories_are_isolated() {
    let (button, hal) = button();
    let clicks = Recorder::new();
    let doubles = Recorder::new();
    let repeats = Recorder::new();
    button.on_click(clicks.listener());
    button.on_double_click(doubles.listener());
    button.on_counter(repeats.listener());

    double_click(&hal);

    assert_eq!(clicks.events().len(), 4);
    assert!(clicks.events().iter().all(|e| e.category() == EventCategory::PressRelease));
    assert_eq!(doubles.events(), vec![ButtonEvent::DoubleClick { pin: PinId(5) }]);
    assert!(repeats.events().is_empty());
}

#[test]
fn listener_may_register_another_during_dispatch() {
    let (button, hal) = button();
    let button = Arc::new(button);
    let late = Recorder::new();

    let weak = Arc::downgrade(&button);
    let late_listener = late.clone();
    button.add_listener(EventCategory::PressRelease, move |e: &ButtonEvent| {
        if matches!(e, ButtonEvent::Press { .. }) {
            if let Some(b) = weak.upgrade() {
                b.add_listener(EventCategory::PressRelease, late_listener.listener());
            }
        }
        Ok(())
    });

    hal.press(0);
    // Added during this dispatch, so it only sees the next event.
    assert!(late.events().is_empty());

    hal.release(30);
    assert_eq!(late.events().len(), 1);
}
