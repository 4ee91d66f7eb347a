//! WiFi radio abstraction.
//!
//! The vendor WiFi stack is event driven: calls only start an operation and
//! the outcome arrives later as an event. [`WifiRadio`] mirrors that shape;
//! the firmware's driver task drains [`WifiRadio::poll_event`] and turns the
//! events into bus notifications.

use crate::credentials::Credentials;
use crate::text::IpText;

/// Maximum number of access points kept from one scan.
pub const SCAN_MAX_RESULTS: u8 = 10;

/// Event raised by the WiFi stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WifiEvent {
    /// A scan finished; `ap_count` is capped at [`SCAN_MAX_RESULTS`].
    ScanDone {
        /// Number of access points found.
        ap_count: u8,
    },
    /// Associated with the access point.
    Connected,
    /// Association lost or refused.
    Disconnected,
    /// DHCP lease obtained.
    GotIp(IpText),
    /// DHCP lease lost.
    LostIp,
    /// Smartconfig received SSID and passphrase from the phone app.
    SmartconfigCredentials(Credentials),
    /// Smartconfig acknowledged the phone app; provisioning is complete.
    SmartconfigAckDone,
}

impl WifiEvent {
    /// Event name for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ScanDone { .. } => "ScanDone",
            Self::Connected => "Connected",
            Self::Disconnected => "Disconnected",
            Self::GotIp(_) => "GotIp",
            Self::LostIp => "LostIp",
            Self::SmartconfigCredentials(_) => "SmartconfigCredentials",
            Self::SmartconfigAckDone => "SmartconfigAckDone",
        }
    }
}

/// WiFi driver errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WifiError {
    /// The stack refused the request in its current mode.
    InvalidState,
    /// The stack is out of internal resources.
    NoMemory,
    /// Any other driver failure.
    Internal,
}

#[cfg(feature = "std")]
impl std::error::Error for WifiError {}

impl core::fmt::Display for WifiError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl WifiError {
    /// Short description for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidState => "wifi request invalid in current mode",
            Self::NoMemory => "wifi stack out of memory",
            Self::Internal => "wifi driver failure",
        }
    }
}

/// Station-mode WiFi radio.
pub trait WifiRadio {
    /// Start an access point scan; completion raises [`WifiEvent::ScanDone`].
    fn scan(&mut self) -> Result<(), WifiError>;

    /// Start interactive provisioning.
    fn start_smartconfig(&mut self) -> Result<(), WifiError>;

    /// Stop interactive provisioning.
    fn stop_smartconfig(&mut self) -> Result<(), WifiError>;

    /// Start associating with `credentials`.
    fn connect(&mut self, credentials: &Credentials) -> Result<(), WifiError>;

    /// Drop the current association or attempt.
    fn disconnect(&mut self) -> Result<(), WifiError>;

    /// Next pending event, without blocking.
    fn poll_event(&mut self) -> Option<WifiEvent>;
}
