//! Desktop emulator.
//!
//! Runs every firmware task against simulated hardware: a radio that
//! provisions itself through smartconfig, the host clock for time, and a
//! canned weather report. The panel is kept in memory and can be saved as a
//! PPM image when the run ends.
//!
//! Environment:
//!
//! - `RUST_LOG` - log filter (default `info`)
//! - `SKY_CLOCK_SECONDS` - run time in seconds (default 75)
//! - `SKY_CLOCK_DROP_AT` - drop the WiFi link after this many seconds
//! - `SKY_CLOCK_SCREENSHOT` - write the final frame to this path
//!
//! Run with: `cargo run -p firmware --bin emulator --features emulator`

#![allow(missing_docs)]
#![allow(clippy::print_stdout)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Instant, Timer};
use static_cell::StaticCell;
use tracing_subscriber::EnvFilter;

use connectivity::ConnectivityMachine;
use firmware::sim::{self, SimDataSource, SimRadio};
use firmware::wiring::{
    polling_subscribers, wifi_subscribers, APP, DISPLAY, DISPLAY_SYNC, POLLING, WIFI_DRIVER,
    WIFI_MODULE,
};
use firmware::{
    AppRouter, ConnectivityTask, DisplayTask, PollingTask, StripBuffer, WifiDriverTask, BAND_PIXELS,
};
use platform::config::{
    ConnectivityConfig, DisplayConfig, PollingConfig, APP_NAME, APP_VERSION, TASK_TICK,
};
use platform::display::{PANEL_HEIGHT, PANEL_WIDTH};
use platform::mocks::{MemoryCredentialStore, MockPanel};
use platform::Credentials;

static STRIP: StaticCell<StripBuffer<BAND_PIXELS>> = StaticCell::new();

struct Options {
    seconds: u64,
    drop_at: Option<u64>,
    screenshot: Option<PathBuf>,
}

impl Options {
    fn from_env() -> Result<Self> {
        let seconds = read_secs("SKY_CLOCK_SECONDS")?.unwrap_or(75);
        let drop_at = read_secs("SKY_CLOCK_DROP_AT")?;
        let screenshot = std::env::var_os("SKY_CLOCK_SCREENSHOT").map(PathBuf::from);
        Ok(Self {
            seconds,
            drop_at,
            screenshot,
        })
    }
}

fn read_secs(name: &str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .with_context(|| format!("{name} must be a whole number of seconds, got '{value}'")),
        Err(_) => Ok(None),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let options = Options::from_env()?;
    let seconds = options.seconds;
    platform::info!("{} {} emulator, {} s", APP_NAME, APP_VERSION, seconds);

    let network = Credentials::new("sky-clock-sim", "simulated");
    let machine =
        ConnectivityMachine::new(MemoryCredentialStore::new(), ConnectivityConfig::default());
    let mut driver = WifiDriverTask::new(SimRadio::new(network), &WIFI_DRIVER, wifi_subscribers());
    let mut connectivity = ConnectivityTask::new(machine, &WIFI_MODULE, &WIFI_DRIVER);
    let mut polling = PollingTask::new(
        SimDataSource::new(Duration::from_millis(120)),
        &POLLING,
        polling_subscribers(),
        PollingConfig::default(),
    );
    let router = AppRouter::new(&APP, &DISPLAY, &WIFI_MODULE);
    let strip = STRIP.init_with(|| StripBuffer::new(PANEL_WIDTH, PANEL_HEIGHT));
    let mut display = DisplayTask::new(
        MockPanel::new(),
        &DISPLAY,
        &DISPLAY_SYNC,
        strip,
        DisplayConfig::default(),
    );

    display
        .init()
        .await
        .map_err(|e| anyhow::anyhow!("panel init failed: {e}"))?;

    let started = Instant::now();
    let run_for = Duration::from_secs(options.seconds);
    let drop_at = options.drop_at.map(Duration::from_secs);

    let scheduler = async {
        router.boot();
        let mut dropped = false;
        while started.elapsed() < run_for {
            if drop_at.is_some_and(|at| !dropped && started.elapsed() >= at) {
                platform::info!("sim: access point gone");
                driver.radio_mut().drop_link();
                dropped = true;
            }
            let now = Instant::now();
            driver.tick();
            connectivity.tick(now);
            polling.tick(now).await;
            router.tick();
            display.tick().await;
            Timer::after(TASK_TICK).await;
        }
    };
    if let Either::Second(()) = select(scheduler, sim::vsync_ticker(&DISPLAY_SYNC)).await {
        anyhow::bail!("vsync ticker stopped");
    }

    let stats = DISPLAY_SYNC.stats();
    let dashboard = display.dashboard();
    println!("frames   {}", display.frames());
    let (swaps, timeouts) = (stats.swaps, stats.timeouts);
    println!("swaps    {} ({} vsync timeouts)", swaps, timeouts);
    println!("wifi     {}", connectivity.machine().state().as_str());
    println!("ip       {}", dashboard.ip.as_str());
    println!(
        "time     {} {} {}",
        dashboard.time.time.as_str(),
        dashboard.time.am_pm.as_str(),
        dashboard.time.date.as_str()
    );
    println!(
        "weather  {} / {}",
        dashboard.weather.temperature.as_str(),
        dashboard.weather.humidity.as_str()
    );

    if let Some(path) = options.screenshot {
        sim::write_ppm(display.panel(), &path)
            .with_context(|| format!("writing screenshot to {}", path.display()))?;
        println!("frame    {}", path.display());
    }
    Ok(())
}
