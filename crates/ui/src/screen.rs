//! Screen identifier enum: every top-level screen the panel can show.

/// Every top-level screen the dashboard can switch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Splash shown until the UI is loaded.
    #[default]
    Boot,
    /// Clock, weather and network status.
    Dashboard,
    /// Colour test pattern.
    Demo,
}

impl Screen {
    /// Screen name for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Boot => "boot",
            Self::Dashboard => "dashboard",
            Self::Demo => "demo",
        }
    }
}
