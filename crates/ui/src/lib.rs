//! Application UI layer: screen definitions, dashboard view model and the renderer.
//!
//! This crate is `no_std` by default; it only uses `core`, the bus types and
//! `embedded-graphics`.

#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]

pub mod dashboard;
pub mod render;
pub mod screen;

pub use dashboard::Dashboard;
pub use render::DashboardRenderer;
pub use screen::Screen;
