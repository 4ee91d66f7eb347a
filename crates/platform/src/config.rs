//! Application configuration and constants
//!
//! Central configuration values used across the firmware. Timing and queue
//! sizing live here as constants; the few values a deployment may want to
//! change (retry budget, periods, default credentials) are also gathered into
//! small config structs whose `Default` uses these constants.
//!
//! Default WiFi credentials and the weather API key are compiled in from the
//! build environment:
//!
//! ```bash
//! WIFI_SSID=home WIFI_PASSWORD=secret OPENWEATHER_API_KEY=... cargo build
//! ```
//!
//! Unset or empty variables mean "no default".

use core::fmt::Write;

use embassy_time::Duration;
use heapless::String;

use crate::credentials::Credentials;
use crate::text::TruncatingWriter;

/// The application name
pub const APP_NAME: &str = "Sky Clock";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ---------------------------------------------------------------------------
// Task timing
// ---------------------------------------------------------------------------

/// Sleep between iterations of every cooperative task loop.
pub const TASK_TICK: Duration = Duration::from_millis(500);

/// How long a connection attempt may take before it counts as failed.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(60);

/// Extra connection attempts per credential source after the first one.
pub const CONNECT_RETRY_MAX: u8 = 2;

/// Interval between time/weather refreshes while online.
pub const POLL_PERIOD: Duration = Duration::from_secs(30);

/// Upper bound for a single HTTP lookup.
pub const HTTP_TIMEOUT: Duration = Duration::from_millis(5000);

/// Longest a flush waits for vsync (one refresh period at ~50 Hz).
pub const VSYNC_WAIT: Duration = Duration::from_millis(20);

// ---------------------------------------------------------------------------
// Bus sizing
// ---------------------------------------------------------------------------

/// Commands for the connectivity module.
pub const WIFI_MODULE_QUEUE: usize = 2;
/// Commands for the WiFi driver.
pub const WIFI_DRIVER_QUEUE: usize = 2;
/// Notifications for the polling module.
pub const POLLING_QUEUE: usize = 3;
/// Notifications for the application router.
pub const APP_QUEUE: usize = 4;
/// Commands for the display task.
pub const DISPLAY_QUEUE: usize = 4;

/// Subscribers of WiFi driver notifications (connectivity, polling, app).
pub const WIFI_NOTIFY_TARGETS: usize = 3;
/// Subscribers of polling notifications (app).
pub const POLLING_NOTIFY_TARGETS: usize = 1;

// ---------------------------------------------------------------------------
// Location and weather service
// ---------------------------------------------------------------------------

/// Weather lookup city.
pub const WEATHER_CITY: &str = "Bengaluru";
/// Weather lookup ISO country code.
pub const WEATHER_COUNTRY: &str = "IN";
/// Location label shown on the dashboard.
pub const DEFAULT_LOCATION: &str = "Bengaluru,IN";

/// Capacity of a formatted weather request URL.
pub const URL_LEN: usize = 128;

/// OpenWeather current-conditions request for the configured city.
///
/// Returns `None` if the URL does not fit in [`URL_LEN`] bytes.
pub fn weather_url(api_key: &str) -> Option<String<URL_LEN>> {
    let mut w = TruncatingWriter::<URL_LEN>::new();
    write!(
        w,
        "http://api.openweathermap.org/data/2.5/weather?q={WEATHER_CITY}&appid={api_key}&units=metric"
    )
    .ok()?;
    if w.was_truncated() {
        None
    } else {
        Some(w.into_inner())
    }
}

/// Weather API key from `OPENWEATHER_API_KEY` at build time.
pub fn weather_api_key() -> Option<&'static str> {
    option_env!("OPENWEATHER_API_KEY").filter(|k| !k.is_empty())
}

/// Default credentials from `WIFI_SSID` / `WIFI_PASSWORD` at build time.
pub fn default_credentials() -> Option<Credentials> {
    Credentials::from_build_env(option_env!("WIFI_SSID"), option_env!("WIFI_PASSWORD"))
}

// ---------------------------------------------------------------------------
// Runtime-tunable configuration
// ---------------------------------------------------------------------------

/// Connectivity state machine settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectivityConfig {
    /// Retries per credential source after the first attempt.
    pub max_retries: u8,
    /// Connect timeout per attempt.
    pub connect_timeout: Duration,
    /// Compiled-in fallback credentials.
    pub default_credentials: Option<Credentials>,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            max_retries: CONNECT_RETRY_MAX,
            connect_timeout: CONNECT_TIMEOUT,
            default_credentials: default_credentials(),
        }
    }
}

/// Polling state machine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    /// Refresh interval.
    pub period: Duration,
    /// Bound on each lookup.
    pub fetch_timeout: Duration,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            period: POLL_PERIOD,
            fetch_timeout: HTTP_TIMEOUT,
        }
    }
}

/// How a flush hands the frame to the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlushMode {
    /// Wait for vsync, draw into the back buffer, then swap buffers.
    VsyncSwap,
    /// Draw, then wait for the colour-transfer-complete interrupt before the
    /// buffer is reused (double buffering without a swap primitive).
    TransferComplete,
}

/// Display flush settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Bound on the vsync / transfer-complete wait.
    pub vsync_wait: Duration,
    /// Flush strategy.
    pub mode: FlushMode,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            vsync_wait: VSYNC_WAIT,
            mode: FlushMode::VsyncSwap,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_url_format() {
        let url = weather_url("abc123").unwrap();
        assert_eq!(
            url.as_str(),
            "http://api.openweathermap.org/data/2.5/weather?q=Bengaluru&appid=abc123&units=metric"
        );
    }

    #[test]
    fn test_weather_url_rejects_oversized_key() {
        let key = "k".repeat(URL_LEN);
        assert!(weather_url(&key).is_none());
    }

    #[test]
    fn test_queue_capacities_are_small() {
        for cap in [
            WIFI_MODULE_QUEUE,
            WIFI_DRIVER_QUEUE,
            POLLING_QUEUE,
            APP_QUEUE,
            DISPLAY_QUEUE,
        ] {
            assert!((2..=4).contains(&cap));
        }
    }

    #[test]
    fn test_default_configs_use_constants() {
        let c = ConnectivityConfig::default();
        assert_eq!(c.max_retries, CONNECT_RETRY_MAX);
        assert_eq!(c.connect_timeout, CONNECT_TIMEOUT);
        assert_eq!(PollingConfig::default().period, POLL_PERIOD);
        assert_eq!(DisplayConfig::default().mode, FlushMode::VsyncSwap);
    }
}
