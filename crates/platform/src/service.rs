//! Remote time and weather lookups.
//!
//! HTTP transport and JSON decoding live behind [`DataSource`]; the polling
//! state machine only sees the decoded records or a [`FetchError`].

use heapless::String;

use crate::text::truncated;

/// Capacity of the formatted clock text, e.g. `"10:42"`.
pub const TIME_TEXT_LEN: usize = 16;
/// Capacity of the AM/PM marker.
pub const AM_PM_LEN: usize = 3;
/// Capacity of the formatted date, e.g. `"Wednesday, 14 October 2026"`.
pub const DATE_TEXT_LEN: usize = 48;

/// Local time as the display shows it.
///
/// This is also the `TimeUpdate`/`SetTime` bus payload, so the fields are
/// bounded and truncated on construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimeInfo {
    /// Seconds since the Unix epoch.
    pub timestamp: u32,
    /// Clock text.
    pub time: String<TIME_TEXT_LEN>,
    /// `"AM"`/`"PM"`, empty for 24-hour clocks.
    pub am_pm: String<AM_PM_LEN>,
    /// Date text.
    pub date: String<DATE_TEXT_LEN>,
}

impl TimeInfo {
    /// Build a record, truncating each string to its capacity.
    pub fn new(timestamp: u32, time: &str, am_pm: &str, date: &str) -> Self {
        Self {
            timestamp,
            time: truncated(time),
            am_pm: truncated(am_pm),
            date: truncated(date),
        }
    }
}

/// Current conditions from the weather service.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeatherInfo {
    /// Condition code.
    pub weather_id: u16,
    /// Condition group, e.g. `"Clouds"`.
    pub main: String<16>,
    /// Condition text, e.g. `"scattered clouds"`.
    pub description: String<32>,
    /// Icon id, e.g. `"03d"`.
    pub icon: String<8>,
    /// Temperature in degrees Celsius.
    pub temp: f32,
    /// Relative humidity in percent.
    pub humidity: u8,
    /// Sunrise, seconds since the Unix epoch.
    pub sunrise: u32,
    /// Sunset, seconds since the Unix epoch.
    pub sunset: u32,
}

/// Why a lookup produced no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FetchError {
    /// Connection or transfer failed.
    Transport,
    /// No answer within the request timeout.
    Timeout,
    /// Server answered with a non-success HTTP status.
    Status(u16),
    /// Body was not the expected JSON document.
    Parse,
}

#[cfg(feature = "std")]
impl std::error::Error for FetchError {}

impl core::fmt::Display for FetchError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Status(code) => write!(f, "HTTP status {code}"),
            other => f.write_str(other.as_str()),
        }
    }
}

impl FetchError {
    /// Short description for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport error",
            Self::Timeout => "request timed out",
            Self::Status(_) => "unexpected HTTP status",
            Self::Parse => "malformed response",
        }
    }
}

/// Time and weather service.
pub trait DataSource {
    /// Current local time.
    async fn fetch_time(&mut self) -> Result<TimeInfo, FetchError>;

    /// Current weather at the configured location.
    async fn fetch_weather(&mut self) -> Result<WeatherInfo, FetchError>;
}
