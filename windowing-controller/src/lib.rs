//! Event-driven controller for the `windowing` crate.
//!
//! The `windowing` crate is pure math over heights and offsets. This crate owns the event
//! lifecycle an adapter needs around it:
//!
//! - a leading+trailing scroll throttle
//! - frame-aligned measurement (wait for layout and paint before reading sizes)
//! - imperative scroll-to with alignment
//! - teardown that cancels pending work
//!
//! It never touches a real UI. The host provides a [`ScrollSource`] and a
//! [`MeasurementSurface`], forwards events, and delivers paint-ready signals through
//! [`WindowController::on_frame`].
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod error;
mod options;
mod surface;
mod throttle;

#[cfg(test)]
mod tests;

pub use controller::{CycleOutcome, Phase, ScrollToOptions, VisibleItem, WindowController};
pub use error::CycleAbort;
pub use options::{
    ControllerOptions, DEFAULT_FRAMES_BEFORE_MEASURE, DEFAULT_THROTTLE_INTERVAL_MS,
    OnChangeCallback, OnScrollCallback,
};
pub use surface::{MeasurementSurface, ScrollBehavior, ScrollSource};
pub use throttle::Throttle;

pub use windowing::{Align, HeightModel, Padding, VisibleRange, WindowConfig};
