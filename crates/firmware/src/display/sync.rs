//! Frame sync between the panel interrupts and the display task.
//!
//! Two handoffs cross the interrupt boundary, both as [`Signal`]s:
//!
//! - **vsync**: raised once per panel refresh. In [`FlushMode::VsyncSwap`]
//!   the last band of a frame waits for it before drawing and swapping, so
//!   the front buffer is never replaced mid-scanout.
//! - **transfer done**: raised when the panel has copied a bitmap out of the
//!   render buffer. In [`FlushMode::TransferComplete`] every band waits for it
//!   before the buffer is reused.
//!
//! Interrupt handlers only call [`DisplaySync::on_vsync`] and
//! [`DisplaySync::on_transfer_done`]; both are non-blocking. Every wait is
//! bounded by [`DisplayConfig::vsync_wait`]. A timeout is logged and counted,
//! then the flush carries on: one stale frame is better than a stuck UI.
//!
//! A `Signal` holds at most one pending token, so several vsyncs between two
//! flushes collapse into one, like a binary semaphore.

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::with_timeout;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::primitives::Rectangle;

use platform::config::{DisplayConfig, FlushMode};
use platform::{DisplayError, DisplayPanel};

/// Counters for the sync handoffs, for logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncStats {
    /// Vsync interrupts seen.
    pub vsyncs: u32,
    /// Transfer-complete interrupts seen.
    pub transfers: u32,
    /// Bounded waits that ran out.
    pub timeouts: u32,
    /// Buffer swaps issued.
    pub swaps: u32,
}

/// Interrupt-to-task handoff for frame presentation.
pub struct DisplaySync {
    vsync: Signal<CriticalSectionRawMutex, ()>,
    transfer: Signal<CriticalSectionRawMutex, ()>,
    vsyncs: AtomicU32,
    transfers: AtomicU32,
    timeouts: AtomicU32,
    swaps: AtomicU32,
}

impl DisplaySync {
    /// Fresh sync state with no pending tokens. `const` so it can be a `static`.
    pub const fn new() -> Self {
        Self {
            vsync: Signal::new(),
            transfer: Signal::new(),
            vsyncs: AtomicU32::new(0),
            transfers: AtomicU32::new(0),
            timeouts: AtomicU32::new(0),
            swaps: AtomicU32::new(0),
        }
    }

    /// Vsync interrupt entry point.
    pub fn on_vsync(&self) {
        self.vsyncs.fetch_add(1, Ordering::Relaxed);
        self.vsync.signal(());
    }

    /// Colour-transfer-complete interrupt entry point.
    pub fn on_transfer_done(&self) {
        self.transfers.fetch_add(1, Ordering::Relaxed);
        self.transfer.signal(());
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> SyncStats {
        SyncStats {
            vsyncs: self.vsyncs.load(Ordering::Relaxed),
            transfers: self.transfers.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            swaps: self.swaps.load(Ordering::Relaxed),
        }
    }

    /// Hand one band of rendered pixels to the panel.
    ///
    /// `last` marks the final band of a frame. In `VsyncSwap` mode earlier
    /// bands go straight into the back buffer; the last one waits for vsync,
    /// draws, and swaps exactly once even when the wait timed out or the draw
    /// failed. In `TransferComplete` mode every band draws and then waits for
    /// the transfer to finish.
    ///
    /// Returns the first panel error. Timeouts are not errors.
    pub async fn flush<P: DisplayPanel>(
        &self,
        panel: &mut P,
        area: Rectangle,
        pixels: &[Rgb565],
        last: bool,
        config: &DisplayConfig,
    ) -> Result<(), DisplayError> {
        match config.mode {
            FlushMode::VsyncSwap => {
                if !last {
                    return panel.draw_bitmap(area, pixels);
                }
                let vsync = with_timeout(config.vsync_wait, self.vsync.wait()).await;
                if vsync.is_err() {
                    self.timed_out("vsync", config);
                }
                let drawn = panel.draw_bitmap(area, pixels);
                let swapped = panel.swap_buffers();
                self.swaps.fetch_add(1, Ordering::Relaxed);
                drawn.and(swapped)
            }
            FlushMode::TransferComplete => {
                panel.draw_bitmap(area, pixels)?;
                let done = with_timeout(config.vsync_wait, self.transfer.wait()).await;
                if done.is_err() {
                    self.timed_out("transfer", config);
                }
                Ok(())
            }
        }
    }

    fn timed_out(&self, what: &str, config: &DisplayConfig) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
        platform::warn!(
            "display: {} wait timed out after {} ms, flushing anyway",
            what,
            config.vsync_wait.as_millis()
        );
    }
}

impl Default for DisplaySync {
    fn default() -> Self {
        Self::new()
    }
}
