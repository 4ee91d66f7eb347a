//! Periodic time and weather refresh while the device is online.
#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]

pub mod engine;

pub use engine::{format_weather, FetchRequest, PollingMachine, PollingState};
