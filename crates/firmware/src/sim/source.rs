//! Data source backed by the host clock and a canned weather report.

use std::time::{SystemTime, UNIX_EPOCH};

use embassy_time::{Duration, Timer};

use platform::config::{weather_api_key, weather_url};
use platform::{DataSource, FetchError, TimeInfo, WeatherInfo};

use super::clock::{time_info, UTC_OFFSET_SECS};
use crate::net::parse_weather;

/// Body served for every weather lookup.
pub const SAMPLE_REPORT: &str = r#"{
    "weather": [{"id": 802, "main": "Clouds", "description": "scattered clouds", "icon": "03d"}],
    "main": {"temp": 26.6, "feels_like": 26.9, "pressure": 1013, "humidity": 58},
    "sys": {"country": "IN", "sunrise": 1760488800, "sunset": 1760531700},
    "name": "Bengaluru",
    "cod": 200
}"#;

/// Key used in the logged request when none was compiled in.
pub const SIM_API_KEY: &str = "sim";

/// Simulated lookups with a fixed round-trip latency.
pub struct SimDataSource {
    latency: Duration,
    report: String,
    url: String,
}

impl SimDataSource {
    /// Source answering after `latency`.
    ///
    /// The weather request is built from the `OPENWEATHER_API_KEY` the
    /// firmware was compiled with, or [`SIM_API_KEY`].
    pub fn new(latency: Duration) -> Self {
        let key = weather_api_key().unwrap_or(SIM_API_KEY);
        let url = match weather_url(key) {
            Some(url) => url.as_str().to_owned(),
            None => {
                platform::warn!("sim: weather request does not fit, api key too long");
                String::new()
            }
        };
        Self {
            latency,
            report: SAMPLE_REPORT.to_owned(),
            url,
        }
    }

    /// Request a board would send for each weather lookup.
    pub fn request_url(&self) -> &str {
        &self.url
    }

    /// Serve `body` for weather lookups from now on.
    pub fn set_report(&mut self, body: &str) {
        body.clone_into(&mut self.report);
    }
}

impl DataSource for SimDataSource {
    async fn fetch_time(&mut self) -> Result<TimeInfo, FetchError> {
        Timer::after(self.latency).await;
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| FetchError::Transport)?;
        let secs = u32::try_from(now.as_secs()).map_err(|_| FetchError::Parse)?;
        Ok(time_info(secs, UTC_OFFSET_SECS))
    }

    async fn fetch_weather(&mut self) -> Result<WeatherInfo, FetchError> {
        platform::debug!("sim: GET {}", self.url.as_str());
        Timer::after(self.latency).await;
        parse_weather(&self.report)
    }
}
