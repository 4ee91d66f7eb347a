//! WiFi credentials and their persistent store.

use heapless::String;

use crate::text::truncated;

/// Maximum SSID length in bytes (802.11).
pub const SSID_MAX_LEN: usize = 32;

/// Maximum WPA2 passphrase length in bytes.
pub const PASSWORD_MAX_LEN: usize = 64;

/// SSID and passphrase for one access point.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    /// Network name.
    pub ssid: String<SSID_MAX_LEN>,
    /// Passphrase; empty for open networks.
    pub password: String<PASSWORD_MAX_LEN>,
}

impl Credentials {
    /// Build credentials, truncating oversized input.
    pub fn new(ssid: &str, password: &str) -> Self {
        Self {
            ssid: truncated(ssid),
            password: truncated(password),
        }
    }

    /// Credentials from build-time values.
    ///
    /// Missing or empty SSID/password both mean "no default", matching how
    /// the compiled-in defaults are treated everywhere else.
    pub fn from_build_env(ssid: Option<&str>, password: Option<&str>) -> Option<Self> {
        match (ssid, password) {
            (Some(s), Some(p)) if !s.is_empty() && !p.is_empty() => Some(Self::new(s, p)),
            _ => None,
        }
    }
}

/// Credential persistence errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Backing store could not be read or written.
    Io,
    /// Stored record is corrupt.
    Corrupt,
    /// No room left in the backing store.
    Full,
}

#[cfg(feature = "std")]
impl std::error::Error for StorageError {}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StorageError {
    /// Short description for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Io => "credential store I/O error",
            Self::Corrupt => "credential store corrupt",
            Self::Full => "credential store full",
        }
    }
}

/// Persisted WiFi credentials (NVS on target).
pub trait CredentialStore {
    /// Saved credentials, if any were provisioned before.
    fn load(&mut self) -> Option<Credentials>;

    /// Persist credentials that have been proven to work.
    fn save(&mut self, credentials: &Credentials) -> Result<(), StorageError>;
}

impl<T: CredentialStore + ?Sized> CredentialStore for &mut T {
    fn load(&mut self) -> Option<Credentials> {
        (**self).load()
    }

    fn save(&mut self, credentials: &Credentials) -> Result<(), StorageError> {
        (**self).save(credentials)
    }
}
