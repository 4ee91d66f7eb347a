//! Bus message types.
//!
//! A [`Message`] is either a [`Command`] (a directive for one specific
//! module or driver) or a [`Notification`] (an event broadcast to
//! subscribers). Each variant carries exactly the payload its opcode needs,
//! so a consumer can never read a field the sender did not fill in.
//!
//! All payload strings have a fixed capacity and are truncated when the
//! message is built. Messages are moved or cloned into queues by value; no
//! two queues share a payload.

use heapless::String;

use platform::text::{truncated, IpText};
use platform::{Credentials, TimeInfo};

/// Time payload of `TimeUpdate` and `SetTime`.
pub type TimeData = TimeInfo;

/// Capacity of the location label.
pub const LOCATION_LEN: usize = 32;

/// Location label payload of `SetLocation`.
pub type LocationText = String<LOCATION_LEN>;

/// Capacity of each formatted weather string.
pub const WEATHER_TEXT_LEN: usize = 16;

/// Weather payload of `WeatherUpdate` and `SetWeather`, already formatted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WeatherData {
    /// e.g. `"27 C"`.
    pub temperature: String<WEATHER_TEXT_LEN>,
    /// e.g. `"64 %"`.
    pub humidity: String<WEATHER_TEXT_LEN>,
}

impl WeatherData {
    /// Build a payload, truncating oversized strings.
    pub fn new(temperature: &str, humidity: &str) -> Self {
        Self {
            temperature: truncated(temperature),
            humidity: truncated(humidity),
        }
    }
}

/// Whether a message is a directive or an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageKind {
    /// Directive for one recipient.
    Command,
    /// Event broadcast to subscribers.
    Notification,
}

/// Everything that travels over the bus.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Directive.
    Command(Command),
    /// Event.
    Notification(Notification),
}

impl Message {
    /// Command or notification.
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Command(_) => MessageKind::Command,
            Self::Notification(_) => MessageKind::Notification,
        }
    }

    /// Opcode of the inner variant.
    pub fn opcode(&self) -> u8 {
        match self {
            Self::Command(c) => c.opcode(),
            Self::Notification(n) => n.opcode(),
        }
    }

    /// Variant name for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Command(c) => c.as_str(),
            Self::Notification(n) => n.as_str(),
        }
    }
}

impl From<Command> for Message {
    fn from(c: Command) -> Self {
        Self::Command(c)
    }
}

impl From<Notification> for Message {
    fn from(n: Notification) -> Self {
        Self::Notification(n)
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Directive for a module or driver.
///
/// Opcodes are unique within the command set of the receiving module.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Start provisioning and connecting (app → connectivity).
    Connect,
    /// Radio operation (connectivity → WiFi driver).
    Wifi(WifiCommand),
    /// Screen update (app → display).
    Display(DisplayCommand),
}

impl Command {
    /// Opcode within the receiver's command set.
    pub fn opcode(&self) -> u8 {
        match self {
            Self::Connect => 0,
            Self::Wifi(c) => c.opcode(),
            Self::Display(c) => c.opcode(),
        }
    }

    /// Variant name for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connect => "Connect",
            Self::Wifi(c) => c.as_str(),
            Self::Display(c) => c.as_str(),
        }
    }
}

/// Operation for the WiFi driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WifiCommand {
    /// Scan for access points.
    Scan,
    /// Start interactive provisioning.
    Smartconfig,
    /// Associate with an access point.
    Connect(Credentials),
    /// Drop the association.
    Disconnect,
}

impl WifiCommand {
    /// Stable opcode.
    pub fn opcode(&self) -> u8 {
        match self {
            Self::Scan => 0,
            Self::Smartconfig => 1,
            Self::Connect(_) => 2,
            Self::Disconnect => 3,
        }
    }

    /// Variant name for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scan => "Scan",
            Self::Smartconfig => "Smartconfig",
            Self::Connect(_) => "WifiConnect",
            Self::Disconnect => "Disconnect",
        }
    }
}

impl From<WifiCommand> for Message {
    fn from(c: WifiCommand) -> Self {
        Self::Command(Command::Wifi(c))
    }
}

/// Screen update for the display task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCommand {
    /// Show the dashboard.
    LoadUi,
    /// Show the panel self-test screen.
    Demo,
    /// Update the IP label.
    SetIp(IpText),
    /// Update the clock.
    SetTime(TimeData),
    /// Update the weather widgets.
    SetWeather(WeatherData),
    /// Update the location label.
    SetLocation(LocationText),
}

impl DisplayCommand {
    /// Stable opcode.
    pub fn opcode(&self) -> u8 {
        match self {
            Self::LoadUi => 0,
            Self::Demo => 1,
            Self::SetIp(_) => 2,
            Self::SetTime(_) => 3,
            Self::SetWeather(_) => 4,
            Self::SetLocation(_) => 5,
        }
    }

    /// Variant name for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoadUi => "LoadUi",
            Self::Demo => "Demo",
            Self::SetIp(_) => "SetIp",
            Self::SetTime(_) => "SetTime",
            Self::SetWeather(_) => "SetWeather",
            Self::SetLocation(_) => "SetLocation",
        }
    }

    /// `SetIp` from arbitrary text, truncated to the IP capacity.
    pub fn set_ip(ip: &str) -> Self {
        Self::SetIp(truncated(ip))
    }

    /// `SetLocation` from arbitrary text, truncated to the label capacity.
    pub fn set_location(location: &str) -> Self {
        Self::SetLocation(truncated(location))
    }
}

impl From<DisplayCommand> for Message {
    fn from(c: DisplayCommand) -> Self {
        Self::Command(Command::Display(c))
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// Event broadcast to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Access point scan finished.
    ScanDone,
    /// Associated with the access point.
    Connected,
    /// DHCP lease obtained.
    GotIp(IpText),
    /// DHCP lease lost.
    LostIp,
    /// Association lost.
    Disconnected,
    /// Interactive provisioning delivered credentials.
    SmartconfigGotCredentials(Credentials),
    /// Fresh (or last known) time.
    TimeUpdate(TimeData),
    /// Fresh (or last known) weather.
    WeatherUpdate(WeatherData),
}

impl Notification {
    /// Stable opcode.
    pub fn opcode(&self) -> u8 {
        match self {
            Self::ScanDone => 0,
            Self::Connected => 1,
            Self::GotIp(_) => 2,
            Self::LostIp => 3,
            Self::Disconnected => 4,
            Self::SmartconfigGotCredentials(_) => 5,
            Self::TimeUpdate(_) => 6,
            Self::WeatherUpdate(_) => 7,
        }
    }

    /// Variant name for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ScanDone => "ScanDone",
            Self::Connected => "Connected",
            Self::GotIp(_) => "GotIp",
            Self::LostIp => "LostIp",
            Self::Disconnected => "Disconnected",
            Self::SmartconfigGotCredentials(_) => "SmartconfigGotCredentials",
            Self::TimeUpdate(_) => "TimeUpdate",
            Self::WeatherUpdate(_) => "WeatherUpdate",
        }
    }
}
