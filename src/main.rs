//! Clickwise demo firmware — Main Entry Point
//!
//! Watches the BOOT button and logs every gesture.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  Esp32ButtonHal (GPIO ISR ──▶ edge task, esp_timer)      │
//! │  ─────────────────── ButtonHal port ───────────────────  │
//! │  Button: EdgeDetector · GestureClassifier · listeners    │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::Result;
use log::info;

use clickwise::adapters::esp32::Esp32ButtonHal;
use clickwise::adapters::log_listener::LogListener;
use clickwise::{Button, ButtonConfig, ButtonEvent, EventCategory};

const HEARTBEAT_SECS: u64 = 30;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Clickwise v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Button ─────────────────────────────────────────────
    let button = Button::new(ButtonConfig::default(), Esp32ButtonHal::new())?;

    button.on_counter(|event: &ButtonEvent| {
        if let ButtonEvent::Repeat { pin, count } = event {
            info!("{}: pressed {} times in a row", pin, count);
        }
        Ok(())
    });

    button.on_click(|event: &ButtonEvent| {
        match event {
            ButtonEvent::Press { pin } => info!("{}: pressed", pin),
            ButtonEvent::Release { pin, held_ms } => {
                info!("{}: released, held {}ms", pin, held_ms)
            }
            _ => {}
        }
        Ok(())
    });

    button.on_double_click(|event: &ButtonEvent| {
        info!("{}: double click", event.pin());
        Ok(())
    });

    button.add_listener(EventCategory::RepeatCount, LogListener::emit);

    // ── 3. Heartbeat ──────────────────────────────────────────
    // All work happens in the edge task and the timer task.
    loop {
        std::thread::sleep(Duration::from_secs(HEARTBEAT_SECS));
        let stats = button.stats();
        info!(
            "HEARTBEAT | edges={} dup={} gestures={} listener_failures={}",
            stats.edges, stats.duplicate_edges, stats.gestures, stats.listener_failures
        );
    }
}
