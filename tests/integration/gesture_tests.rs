//! End-to-end gesture timelines: edges and ticks in, events out.

use clickwise::{Button, ButtonConfig, ButtonEvent, EventCategory, Level, PinId};

use crate::mock_hal::{MockHal, MockHandle, Recorder};

const PIN: PinId = PinId(4);

fn button() -> (Button<MockHal>, MockHandle, Recorder) {
    let (hal, handle) = MockHal::new();
    let button = Button::new(ButtonConfig::new(PIN.0), hal).unwrap();
    let rec = Recorder::new();
    for category in EventCategory::ALL {
        button.add_listener(category, rec.listener());
    }
    (button, handle, rec)
}

fn burst(presses: u32, start_ms: u32, gap_ms: u32) -> Vec<(u32, Level)> {
    (0..presses)
        .flat_map(|i| {
            let t = start_ms + i * gap_ms;
            [(t, Level::Pressed), (t + gap_ms / 2, Level::Released)]
        })
        .collect()
}

#[test]
fn double_click_timeline() {
    let (_button, hal, rec) = button();

    hal.run(
        &[
            (0, Level::Pressed),
            (50, Level::Released),
            (120, Level::Pressed),
            (160, Level::Released),
        ],
        500,
    );

    assert_eq!(
        rec.events(),
        vec![
            ButtonEvent::Press { pin: PIN },
            ButtonEvent::Release { pin: PIN, held_ms: 50 },
            ButtonEvent::Press { pin: PIN },
            ButtonEvent::Release { pin: PIN, held_ms: 40 },
            ButtonEvent::DoubleClick { pin: PIN },
        ]
    );
}

#[test]
fn double_click_fires_on_first_tick_past_window() {
    let (_button, hal, rec) = button();

    hal.press(0);
    hal.release(50);
    hal.press(120);
    hal.release(160);
    for t in [200, 300] {
        hal.tick(t);
    }
    assert_eq!(rec.count(|e| matches!(e, ButtonEvent::DoubleClick { .. })), 0);

    // 400 - 120 = 280 ≥ 250
    hal.tick(400);
    assert_eq!(rec.count(|e| matches!(e, ButtonEvent::DoubleClick { .. })), 1);
}

#[test]
fn three_presses_report_repeat_count() {
    let (button, hal, rec) = button();

    hal.run(&burst(3, 0, 80), 700);

    let gestures: Vec<_> = rec
        .events()
        .into_iter()
        .filter(|e| e.category() != EventCategory::PressRelease)
        .collect();
    assert_eq!(gestures, vec![ButtonEvent::Repeat { pin: PIN, count: 3 }]);
    assert_eq!(button.pending_count(), 0);
}

#[test]
fn long_burst_counts_every_press() {
    let (_button, hal, rec) = button();

    hal.run(&burst(7, 0, 60), 1_000);

    assert_eq!(rec.count(|e| matches!(e, ButtonEvent::Press { .. })), 7);
    assert_eq!(rec.count(|e| matches!(e, ButtonEvent::Repeat { count: 7, .. })), 1);
    assert_eq!(rec.count(|e| matches!(e, ButtonEvent::DoubleClick { .. })), 0);
}

#[test]
fn lone_press_is_discarded_silently() {
    let (button, hal, rec) = button();

    hal.run(&[(0, Level::Pressed), (90, Level::Released)], 1_000);

    assert_eq!(
        rec.events(),
        vec![
            ButtonEvent::Press { pin: PIN },
            ButtonEvent::Release { pin: PIN, held_ms: 90 },
        ]
    );
    assert_eq!(button.pending_count(), 0);
    assert_eq!(button.stats().gestures, 0);
}

#[test]
fn lone_press_then_slow_second_press_is_no_double_click() {
    let (_button, hal, rec) = button();

    // Second press arrives after the single-press reset.
    hal.run(
        &[
            (0, Level::Pressed),
            (40, Level::Released),
            (400, Level::Pressed),
            (440, Level::Released),
        ],
        1_000,
    );

    assert_eq!(rec.count(|e| e.category() != EventCategory::PressRelease), 0);
}

#[test]
fn bursts_separated_by_quiet_time_classify_independently() {
    let (_button, hal, rec) = button();

    let mut edges = burst(2, 0, 80);
    edges.extend(burst(3, 600, 80));
    hal.run(&edges, 1_500);

    let gestures: Vec<_> = rec
        .events()
        .into_iter()
        .filter(|e| e.category() != EventCategory::PressRelease)
        .collect();
    assert_eq!(
        gestures,
        vec![
            ButtonEvent::DoubleClick { pin: PIN },
            ButtonEvent::Repeat { pin: PIN, count: 3 },
        ]
    );
}

#[test]
fn duplicate_edges_are_ignored() {
    let (button, hal, rec) = button();

    hal.press(0);
    hal.press(5);
    hal.release(50);
    hal.release(55);

    assert_eq!(
        rec.events(),
        vec![
            ButtonEvent::Press { pin: PIN },
            ButtonEvent::Release { pin: PIN, held_ms: 50 },
        ]
    );
    let stats = button.stats();
    assert_eq!(stats.edges, 4);
    assert_eq!(stats.duplicate_edges, 2);
    assert_eq!(button.pending_count(), 1);
}

#[test]
fn unrecognized_level_leaves_state_alone() {
    let (button, hal, rec) = button();

    hal.press(0);
    hal.unrecognized(20, 7);
    hal.release(60);

    assert_eq!(rec.events().len(), 2);
    assert_eq!(button.level(), Level::Released);
    assert_eq!(button.stats().unrecognized_levels, 1);
}

#[test]
fn release_duration_survives_timer_wrap() {
    let (_button, hal, rec) = button();

    hal.press(u32::MAX - 9);
    hal.release(20);

    assert_eq!(
        rec.events().last(),
        Some(&ButtonEvent::Release { pin: PIN, held_ms: 30 })
    );
}

#[test]
fn initially_pressed_button_ignores_first_press_edge() {
    let (hal, handle) = MockHal::new();
    let hal = hal.with_initial(Ok(Level::Pressed));
    let button = Button::new(ButtonConfig::new(PIN.0), hal).unwrap();
    let rec = Recorder::new();
    button.add_listener(EventCategory::PressRelease, rec.listener());

    handle.press(10);
    assert!(rec.events().is_empty());
    assert_eq!(button.pending_count(), 0);

    handle.release(30);
    assert_eq!(rec.events().len(), 1);
}
