//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific part of the
//! button engine against the mock HAL.  All tests run on the host with
//! no real hardware required.

mod gesture_tests;
mod listener_tests;
mod polled_hal_tests;
