//! Message bus: bounded endpoints, typed messages and notification fan-out.
//!
//! This is the only way modules talk to each other. Drivers and modules
//! publish into `static` [`Endpoint`]s; each endpoint is drained by the one
//! task that owns it. A publisher that has several subscribers keeps a
//! [`FanOut`] of their endpoints.
//!
//! Ordering is FIFO within one endpoint. Nothing is guaranteed across
//! endpoints or across the targets of one broadcast.
//!
//! ```
//! use bus::{Endpoint, FanOut, Notification};
//!
//! static POLLING: Endpoint<3> = Endpoint::new("polling");
//! static APP: Endpoint<4> = Endpoint::new("app");
//!
//! let mut subscribers: FanOut<'static, 2> = FanOut::new("wifi-driver");
//! subscribers.add_target(&POLLING);
//! subscribers.add_target(&APP);
//!
//! assert_eq!(subscribers.broadcast(&Notification::Connected.into()), 2);
//! assert!(APP.try_dequeue().is_some());
//! ```
//!
//! This crate is `no_std` by default.

#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]
#![allow(async_fn_in_trait)]

pub mod endpoint;
pub mod fanout;
pub mod message;

pub use endpoint::{Endpoint, MessageSink};
pub use fanout::FanOut;
pub use message::{
    Command, DisplayCommand, LocationText, Message, MessageKind, Notification, TimeData,
    WeatherData, WifiCommand, LOCATION_LEN, WEATHER_TEXT_LEN,
};
