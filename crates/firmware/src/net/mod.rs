//! Host-side network helpers.

pub mod openweather;

pub use openweather::parse_weather;
