//! Display task: applies display commands to the dashboard and redraws the
//! panel band by band through the frame sync protocol.

pub mod strip;
pub mod sync;

pub use strip::StripBuffer;
pub use sync::{DisplaySync, SyncStats};

use embassy_time::Timer;

use bus::{Command, Endpoint, Message};
use platform::config::{DisplayConfig, TASK_TICK};
use platform::{DisplayError, DisplayPanel};
use ui::{Dashboard, DashboardRenderer};

/// Panel lines rendered per band.
pub const BAND_LINES: u32 = 40;

/// Render buffer size for one band (800 × 40).
pub const BAND_PIXELS: usize = 32_000;

/// Owns the panel and the dashboard; consumes `Command::Display` messages.
pub struct DisplayTask<'a, P: DisplayPanel, const N: usize, const PIXELS: usize> {
    panel: P,
    inbox: &'a Endpoint<N>,
    sync: &'a DisplaySync,
    strip: &'a mut StripBuffer<PIXELS>,
    dashboard: Dashboard,
    renderer: DashboardRenderer,
    config: DisplayConfig,
    dirty: bool,
    frames: u32,
}

impl<'a, P: DisplayPanel, const N: usize, const PIXELS: usize> DisplayTask<'a, P, N, PIXELS> {
    /// Task over `panel`, reading commands from `inbox`.
    pub fn new(
        panel: P,
        inbox: &'a Endpoint<N>,
        sync: &'a DisplaySync,
        strip: &'a mut StripBuffer<PIXELS>,
        config: DisplayConfig,
    ) -> Self {
        Self {
            panel,
            inbox,
            sync,
            strip,
            dashboard: Dashboard::default(),
            renderer: DashboardRenderer,
            config,
            dirty: true,
            frames: 0,
        }
    }

    /// Reset and initialise the panel. Failure here is fatal for the caller.
    pub async fn init(&mut self) -> Result<(), DisplayError> {
        self.panel.reset().await?;
        self.panel.init().await?;
        platform::info!("display: panel ready");
        Ok(())
    }

    /// Current view model.
    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// The panel, for inspection.
    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// Frames presented so far.
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Apply every queued display command. Returns how many were applied.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0usize;
        while let Some(message) = self.inbox.try_dequeue() {
            match message {
                Message::Command(Command::Display(command)) => {
                    platform::debug!("display: {}", command.as_str());
                    if self.dashboard.apply(&command) {
                        self.dirty = true;
                    }
                    applied = applied.saturating_add(1);
                }
                other => platform::warn!("display: unexpected {}", other.as_str()),
            }
        }
        applied
    }

    /// One loop iteration: apply commands, redraw if anything changed.
    pub async fn tick(&mut self) {
        self.drain();
        if self.dirty {
            self.redraw().await;
        }
    }

    /// Render and flush the whole frame. Panel errors are logged per band.
    pub async fn redraw(&mut self) {
        let bands = self.strip.band_count();
        let mut failed = 0u32;
        for band in 0..bands {
            self.strip.set_band(band);
            if let Err(never) = self.renderer.render(&self.dashboard, &mut *self.strip) {
                match never {}
            }
            let last = band.saturating_add(1) == bands;
            let area = self.strip.area();
            let pixels = self.strip.pixels();
            let result = self
                .sync
                .flush(&mut self.panel, area, pixels, last, &self.config)
                .await;
            if let Err(e) = result {
                failed = failed.saturating_add(1);
                platform::warn!("display: band {} flush failed: {}", band, e.as_str());
            }
        }
        self.dirty = false;
        self.frames = self.frames.wrapping_add(1);
        platform::debug!(
            "display: frame {} ({}) presented, {} band errors",
            self.frames,
            self.dashboard.screen.as_str(),
            failed
        );
    }

    /// Task loop.
    pub async fn run(mut self) {
        loop {
            self.tick().await;
            Timer::after(TASK_TICK).await;
        }
    }
}
