//! WiFi connectivity: credential fallback chain, connect retries and link-loss re-entry.
//!
//! This crate is `no_std` by default; it only uses `core`, the bus types and
//! embassy-time types.

#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]

pub mod machine;
pub mod state;

pub use machine::{ConnectivityMachine, MAX_STEPS_PER_TICK};
pub use state::{ConnectivityState, CredentialSource};
