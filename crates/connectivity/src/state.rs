//! Connectivity states and credential sources.

/// Where the machine is in the provision/connect cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectivityState {
    /// At rest: either never started or connected with an address.
    Idle,
    /// Looking for persisted credentials.
    CheckSavedCredentials,
    /// Looking for compiled-in credentials.
    CheckDefaultCredentials,
    /// About to ask the driver for a scan.
    Scan,
    /// Waiting for the scan to finish.
    Scanning,
    /// Scan finished.
    ScanDone,
    /// About to start interactive provisioning.
    Smartconfig,
    /// Waiting for the user to provision credentials.
    SmartconfigWaiting,
    /// About to ask the driver to connect.
    Connect,
    /// Waiting for association.
    Connecting,
    /// Associated, waiting for an address.
    Connected,
    /// Address obtained.
    GotIp,
    /// Address lost while at rest.
    LostIp,
    /// Association lost while at rest.
    Disconnected,
}

impl ConnectivityState {
    /// Every state, in declaration order.
    pub const ALL: [Self; 14] = [
        Self::Idle,
        Self::CheckSavedCredentials,
        Self::CheckDefaultCredentials,
        Self::Scan,
        Self::Scanning,
        Self::ScanDone,
        Self::Smartconfig,
        Self::SmartconfigWaiting,
        Self::Connect,
        Self::Connecting,
        Self::Connected,
        Self::GotIp,
        Self::LostIp,
        Self::Disconnected,
    ];

    /// State name for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::CheckSavedCredentials => "CheckSavedCredentials",
            Self::CheckDefaultCredentials => "CheckDefaultCredentials",
            Self::Scan => "Scan",
            Self::Scanning => "Scanning",
            Self::ScanDone => "ScanDone",
            Self::Smartconfig => "Smartconfig",
            Self::SmartconfigWaiting => "SmartconfigWaiting",
            Self::Connect => "Connect",
            Self::Connecting => "Connecting",
            Self::Connected => "Connected",
            Self::GotIp => "GotIp",
            Self::LostIp => "LostIp",
            Self::Disconnected => "Disconnected",
        }
    }

    /// States that only leave on an external input (command, notification
    /// or timer). All other states move on by themselves on the next step.
    pub fn is_waiting(self) -> bool {
        matches!(
            self,
            Self::Idle
                | Self::Scanning
                | Self::SmartconfigWaiting
                | Self::Connecting
                | Self::Connected
        )
    }
}

/// Which fallback branch supplied the credentials in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CredentialSource {
    /// Persisted from an earlier successful connection.
    Saved,
    /// Compiled into the firmware.
    Default,
    /// Provisioned interactively by the user.
    Smartconfig,
}

impl CredentialSource {
    /// Source name for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Saved => "saved",
            Self::Default => "default",
            Self::Smartconfig => "smartconfig",
        }
    }
}
