//! Device drivers built on the gesture engine.

pub mod button;
