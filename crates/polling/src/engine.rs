//! Polling state machine.
//!
//! `PollingMachine` is a pure, `no_std`, allocation-free state machine that
//! schedules the periodic time/weather refresh while the device is online.
//!
//! It has **no** I/O. The polling task asks [`pending_fetch`] what to look
//! up, performs the lookup, and hands the result back through
//! [`complete_time`] / [`complete_weather`], which return the notification to
//! broadcast. Lookup failures are logged and answered with the last known
//! data; they never touch connectivity.
//!
//! [`pending_fetch`]: PollingMachine::pending_fetch
//! [`complete_time`]: PollingMachine::complete_time
//! [`complete_weather`]: PollingMachine::complete_weather

use embassy_time::{Duration, Instant};

use bus::{Notification, WeatherData};
use platform::config::PollingConfig;
use platform::{FetchError, SoftTimer, TimeInfo, TruncatingWriter, WeatherInfo};

/// Where the refresh cycle is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollingState {
    /// Waiting for the next timer firing.
    Idle,
    /// Time lookup due.
    GetTime,
    /// Weather lookup due.
    GetWeather,
}

impl PollingState {
    /// State name for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::GetTime => "GetTime",
            Self::GetWeather => "GetWeather",
        }
    }
}

/// Lookup the task has to perform next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FetchRequest {
    /// Call `DataSource::fetch_time`.
    Time,
    /// Call `DataSource::fetch_weather`.
    Weather,
}

/// Periodic time/weather refresh state machine.
pub struct PollingMachine {
    state: PollingState,
    previous: PollingState,
    period: Duration,
    timer: SoftTimer,
    time: TimeInfo,
    weather: WeatherInfo,
}

impl PollingMachine {
    /// Machine in `Idle` with the timer disarmed.
    pub fn new(config: PollingConfig) -> Self {
        Self {
            state: PollingState::Idle,
            previous: PollingState::Idle,
            period: config.period,
            timer: SoftTimer::new(),
            time: TimeInfo::default(),
            weather: WeatherInfo::default(),
        }
    }

    /// Current state.
    pub fn state(&self) -> PollingState {
        self.state
    }

    /// State before the last transition.
    pub fn previous(&self) -> PollingState {
        self.previous
    }

    /// Whether the periodic timer is running (i.e. the device is online).
    pub fn is_scheduled(&self) -> bool {
        self.timer.is_armed()
    }

    /// Last time data that was fetched successfully.
    pub fn last_time(&self) -> &TimeInfo {
        &self.time
    }

    /// Last weather data that was fetched successfully.
    pub fn last_weather(&self) -> &WeatherInfo {
        &self.weather
    }

    fn set_state(&mut self, next: PollingState) {
        self.previous = self.state;
        self.state = next;
        platform::info!("api: {} -> {}", self.previous.as_str(), next.as_str());
    }

    /// React to connectivity changes.
    ///
    /// `GotIp` arms the periodic timer and starts a cycle immediately;
    /// `LostIp`/`Disconnected` stop the timer. Returns whether the schedule
    /// changed.
    pub fn on_notification(&mut self, notification: &Notification, now: Instant) -> bool {
        match notification {
            Notification::GotIp(_) => {
                platform::info!("api: online, refreshing every {} s", self.period.as_secs());
                self.timer.arm_periodic(now, self.period);
                self.start_cycle();
                true
            }
            Notification::LostIp | Notification::Disconnected => {
                if self.timer.is_armed() {
                    platform::info!("api: offline, stopping periodic refresh");
                    self.timer.disarm();
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    /// Check the periodic timer. Returns whether a new cycle started.
    pub fn poll_timer(&mut self, now: Instant) -> bool {
        self.timer.poll(now) && self.start_cycle()
    }

    fn start_cycle(&mut self) -> bool {
        if self.state == PollingState::Idle {
            self.set_state(PollingState::GetTime);
            true
        } else {
            let running = self.state.as_str();
            platform::warn!("api: refresh still running in {}, skipped", running);
            false
        }
    }

    /// Lookup due in the current state.
    pub fn pending_fetch(&self) -> Option<FetchRequest> {
        match self.state {
            PollingState::Idle => None,
            PollingState::GetTime => Some(FetchRequest::Time),
            PollingState::GetWeather => Some(FetchRequest::Weather),
        }
    }

    /// Finish the time lookup and move on to weather.
    ///
    /// The returned `TimeUpdate` carries the fresh data, or the last known
    /// data when the lookup failed.
    pub fn complete_time(&mut self, result: Result<TimeInfo, FetchError>) -> Notification {
        match result {
            Ok(time) => self.time = time,
            Err(e) => platform::warn!("api: time lookup failed: {}", e.as_str()),
        }
        if self.state == PollingState::GetTime {
            self.set_state(PollingState::GetWeather);
        }
        Notification::TimeUpdate(self.time.clone())
    }

    /// Finish the weather lookup and end the cycle.
    ///
    /// The returned `WeatherUpdate` is formatted from the fresh data, or the
    /// last known data when the lookup failed.
    pub fn complete_weather(&mut self, result: Result<WeatherInfo, FetchError>) -> Notification {
        match result {
            Ok(weather) => self.weather = weather,
            Err(e) => platform::warn!("api: weather lookup failed: {}", e.as_str()),
        }
        if self.state == PollingState::GetWeather {
            self.set_state(PollingState::Idle);
        }
        Notification::WeatherUpdate(format_weather(&self.weather))
    }
}

impl Default for PollingMachine {
    fn default() -> Self {
        Self::new(PollingConfig::default())
    }
}

/// Display strings for `weather`: `"27 C"` and `"64 %"`.
pub fn format_weather(weather: &WeatherInfo) -> WeatherData {
    use core::fmt::Write;

    let mut temperature = TruncatingWriter::new();
    let mut humidity = TruncatingWriter::new();
    // TruncatingWriter never reports an error.
    let _ = write!(temperature, "{:.0} C", weather.temp);
    let _ = write!(humidity, "{} %", weather.humidity);
    WeatherData {
        temperature: temperature.into_inner(),
        humidity: humidity.into_inner(),
    }
}
