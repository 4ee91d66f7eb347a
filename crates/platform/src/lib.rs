//! Platform layer for the weather/clock display firmware
//!
//! This crate defines the collaborator interfaces the control core talks to,
//! plus the small shared pieces every other crate needs, so that the state
//! machines and the message bus can be developed and tested on the host.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate: tasks, wiring, emulator)
//!         ↓
//! Control Core (bus, connectivity, polling, ui)
//!         ↓
//! Platform (this crate - collaborator traits, shared data, timer, logging)
//!         ↓
//! Vendor drivers (panel, WiFi stack, HTTP client)
//! ```
//!
//! # Collaborators
//!
//! - [`DisplayPanel`] - RGB565 panel with bitmap upload and buffer swap
//! - [`WifiRadio`] - scan, smartconfig, connect and disconnect, raising [`WifiEvent`]s
//! - [`DataSource`] - time and weather lookups
//! - [`CredentialStore`] - persisted WiFi credentials
//!
//! # Shared pieces
//!
//! - [`text`] - fixed-capacity strings that truncate instead of overflowing
//! - [`timer`] - [`SoftTimer`], polled one-shot/periodic timers
//! - [`config`] - compile-time constants and runtime-tunable config structs
//! - [`fmt`] - `trace!`/`debug!`/`info!`/`warn!`/`error!` over defmt or tracing
//!
//! # Features
//!
//! - `std`: Enable standard library support (mocks, `std::error::Error` impls)
//! - `defmt`: Route log macros to defmt and derive `defmt::Format`
//! - `tracing`: Route log macros to tracing (emulator and host runs)

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)]
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::doc_markdown)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

pub mod config;
pub mod credentials;
pub mod display;
pub mod fmt;
pub mod service;
pub mod text;
pub mod timer;
pub mod wifi;

pub mod mocks;

#[doc(hidden)]
#[cfg(feature = "tracing")]
pub use tracing as __tracing;

pub use credentials::{CredentialStore, Credentials, StorageError};
pub use display::{DisplayError, DisplayPanel};
pub use service::{DataSource, FetchError, TimeInfo, WeatherInfo};
pub use text::{truncated, IpText, TruncatingWriter};
pub use timer::SoftTimer;
pub use wifi::{WifiError, WifiEvent, WifiRadio};
