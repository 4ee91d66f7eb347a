//! Cooperative tasks. Each owns one endpoint, drains it on `tick`, and
//! sleeps `TASK_TICK` between iterations in `run`.

pub mod connectivity;
pub mod polling;
pub mod router;
pub mod wifi_driver;

pub use connectivity::ConnectivityTask;
pub use polling::PollingTask;
pub use router::{route, AppRouter};
pub use wifi_driver::WifiDriverTask;
