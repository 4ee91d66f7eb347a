//! OpenWeather current-conditions decoding.
//!
//! Decodes the body of `data/2.5/weather?...&units=metric`. Only the fields
//! the dashboard uses are read; everything else in the document is ignored.
//! The `weather` and `sys` sections are optional and leave their fields at
//! the default when missing. `main` is required: without it there is nothing
//! to show.

use serde::Deserialize;

use platform::{truncated, FetchError, WeatherInfo};

#[derive(Deserialize)]
struct Response {
    #[serde(default)]
    weather: Vec<Condition>,
    main: Readings,
    #[serde(default)]
    sys: Option<Sun>,
}

#[derive(Deserialize)]
struct Condition {
    id: u16,
    main: String,
    description: String,
    icon: String,
}

#[derive(Deserialize)]
struct Readings {
    temp: f32,
    humidity: u8,
}

#[derive(Deserialize)]
struct Sun {
    sunrise: u32,
    sunset: u32,
}

/// Decode a response body.
pub fn parse_weather(body: &str) -> Result<WeatherInfo, FetchError> {
    let response: Response = serde_json::from_str(body).map_err(|e| {
        platform::warn!("api: weather body rejected at line {}", e.line());
        FetchError::Parse
    })?;

    let mut info = WeatherInfo {
        temp: response.main.temp,
        humidity: response.main.humidity,
        ..WeatherInfo::default()
    };
    if let Some(condition) = response.weather.first() {
        info.weather_id = condition.id;
        info.main = truncated(&condition.main);
        info.description = truncated(&condition.description);
        info.icon = truncated(&condition.icon);
    }
    if let Some(sun) = response.sys {
        info.sunrise = sun.sunrise;
        info.sunset = sun.sunset;
    }
    platform::debug!(
        "api: weather id {} humidity {} sunrise {}",
        info.weather_id,
        info.humidity,
        info.sunrise
    );
    Ok(info)
}
