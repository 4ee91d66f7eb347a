//! Sky Clock firmware
//!
//! WiFi weather and clock dashboard for an 800×480 RGB panel.
//!
//! # Architecture
//!
//! Five cooperative tasks exchange messages over static bus endpoints:
//!
//! ```text
//! App router ──Connect──▶ Connectivity ──WifiCommand──▶ WiFi driver ──▶ radio
//!      ▲                        ▲                           │
//!      │                        └──── notifications ────────┤
//!      ├───────── updates ──── Polling ◀────────────────────┤
//!      └────────────────────────────────────────────────────┘
//!      │
//!      └──DisplayCommand──▶ Display ──▶ DisplaySync ──▶ panel
//! ```
//!
//! Hardware access goes through the `platform` collaborator traits, so the
//! same tasks run on the board and in the desktop emulator.
//!
//! # Features
//!
//! - `std` - Host build: OpenWeather decoding and host mocks
//! - `emulator` - Desktop emulator binary (tokio, tracing)
//! - `defmt` / `tracing` - Logging backend
//!
//! # Emulator
//!
//! ```bash
//! cargo run -p firmware --bin emulator --features emulator
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
// Critical correctness: deny these
#![deny(clippy::await_holding_lock)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]
// Logging discipline
#![warn(clippy::print_stdout)]
#![warn(clippy::dbg_macro)]
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)]

pub mod display;
pub mod tasks;
pub mod wiring;

#[cfg(feature = "std")]
pub mod net;

#[cfg(feature = "emulator")]
pub mod sim;

pub use display::{DisplaySync, DisplayTask, StripBuffer, SyncStats, BAND_LINES, BAND_PIXELS};
pub use tasks::{AppRouter, ConnectivityTask, PollingTask, WifiDriverTask};
