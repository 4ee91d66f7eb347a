//! Dashboard view model: what the panel should show, updated by display commands.


use bus::{DisplayCommand, LocationText, TimeData, WeatherData};
use platform::text::UNKNOWN_IP;
use platform::IpText;

use crate::screen::Screen;

/// Everything the renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    /// Screen currently shown.
    pub screen: Screen,
    /// IP label, `"????"` while offline.
    pub ip: IpText,
    /// Last clock update.
    pub time: TimeData,
    /// Last weather update.
    pub weather: WeatherData,
    /// Location label.
    pub location: LocationText,
}

impl Dashboard {
    /// Apply one display command. Returns `true` when the frame changed and
    /// needs a redraw.
    pub fn apply(&mut self, command: &DisplayCommand) -> bool {
        match command {
            DisplayCommand::LoadUi => replace(&mut self.screen, Screen::Dashboard),
            DisplayCommand::Demo => replace(&mut self.screen, Screen::Demo),
            DisplayCommand::SetIp(ip) => replace(&mut self.ip, ip.clone()),
            DisplayCommand::SetTime(time) => replace(&mut self.time, time.clone()),
            DisplayCommand::SetWeather(weather) => replace(&mut self.weather, weather.clone()),
            DisplayCommand::SetLocation(location) => replace(&mut self.location, location.clone()),
        }
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Dashboard {
            screen: Screen::Boot,
            ip: platform::truncated(UNKNOWN_IP),
            time: TimeData::default(),
            weather: WeatherData::default(),
            location: LocationText::new(),
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}
