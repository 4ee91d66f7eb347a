//! Static bus wiring.
//!
//! Every endpoint lives for the whole program so drivers and tasks can
//! publish into it from anywhere, interrupt context included. Subscriptions
//! are fixed at startup: the WiFi driver notifies connectivity, polling and
//! the app; polling notifies the app.
//!
//! ```text
//!  app ──Connect──▶ WIFI_MODULE ──WifiCommand──▶ WIFI_DRIVER
//!                                                   │ notifications
//!                    ┌──────────────┬───────────────┤
//!                    ▼              ▼               ▼
//!               WIFI_MODULE      POLLING           APP ──Display──▶ DISPLAY
//!                                   │ updates       ▲
//!                                   └───────────────┘
//! ```

use bus::{Endpoint, FanOut, MessageSink};
use platform::config::{
    APP_QUEUE, DISPLAY_QUEUE, POLLING_NOTIFY_TARGETS, POLLING_QUEUE, WIFI_DRIVER_QUEUE,
    WIFI_MODULE_QUEUE, WIFI_NOTIFY_TARGETS,
};

use crate::display::DisplaySync;

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// Connectivity module inbox: `Connect` plus WiFi notifications.
pub static WIFI_MODULE: Endpoint<WIFI_MODULE_QUEUE> = Endpoint::new("wifi");

/// WiFi driver inbox: `WifiCommand`s.
pub static WIFI_DRIVER: Endpoint<WIFI_DRIVER_QUEUE> = Endpoint::new("wifi-driver");

/// Polling module inbox: WiFi notifications.
pub static POLLING: Endpoint<POLLING_QUEUE> = Endpoint::new("polling");

/// App inbox: WiFi notifications and data updates.
pub static APP: Endpoint<APP_QUEUE> = Endpoint::new("app");

/// Display inbox: `DisplayCommand`s.
pub static DISPLAY: Endpoint<DISPLAY_QUEUE> = Endpoint::new("display");

/// Frame sync primitives, signalled from the panel interrupts.
pub static DISPLAY_SYNC: DisplaySync = DisplaySync::new();

// ---------------------------------------------------------------------------
// Fan-out
// ---------------------------------------------------------------------------

/// Subscribers of the WiFi driver, in registration order.
pub fn wifi_subscribers() -> FanOut<'static, WIFI_NOTIFY_TARGETS> {
    let mut fanout = FanOut::new(WIFI_DRIVER.name());
    let targets: [&'static dyn MessageSink; WIFI_NOTIFY_TARGETS] = [&WIFI_MODULE, &POLLING, &APP];
    for target in targets {
        fanout.add_target(target);
    }
    fanout
}

/// Subscribers of the polling module.
pub fn polling_subscribers() -> FanOut<'static, POLLING_NOTIFY_TARGETS> {
    let mut fanout = FanOut::new(POLLING.name());
    fanout.add_target(&APP);
    fanout
}
