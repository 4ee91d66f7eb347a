//! Desktop stand-ins for the board: a radio that answers like an access
//! point would, a data source backed by the host clock, and a vsync ticker.

#![allow(clippy::arithmetic_side_effects)]

pub mod clock;
pub mod radio;
pub mod source;

pub use radio::SimRadio;
pub use source::SimDataSource;

use std::io::Write;
use std::path::Path;

use embassy_time::{Duration, Timer};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::RgbColor;

use platform::display::{PANEL_HEIGHT, PANEL_WIDTH};
use platform::mocks::MockPanel;

use crate::display::DisplaySync;

/// 60 Hz refresh.
pub const VSYNC_PERIOD: Duration = Duration::from_micros(16_667);

/// Signal vsync forever, the way the panel's frame-end interrupt would.
pub async fn vsync_ticker(sync: &DisplaySync) {
    loop {
        Timer::after(VSYNC_PERIOD).await;
        sync.on_vsync();
    }
}

/// Write the panel's back buffer as a binary PPM image.
pub fn write_ppm(panel: &MockPanel, path: &Path) -> std::io::Result<()> {
    let mut out = std::io::BufWriter::new(std::fs::File::create(path)?);
    write!(out, "P6\n{PANEL_WIDTH} {PANEL_HEIGHT}\n255\n")?;
    for y in 0..PANEL_HEIGHT {
        for x in 0..PANEL_WIDTH {
            let c = panel.pixel(x, y).unwrap_or(Rgb565::BLACK);
            out.write_all(&[expand(c.r(), 5), expand(c.g(), 6), expand(c.b(), 5)])?;
        }
    }
    out.flush()
}

/// Scale a `bits`-wide channel to 8 bits.
fn expand(value: u8, bits: u32) -> u8 {
    let max = (1u16 << bits) - 1;
    u8::try_from(u16::from(value) * 255 / max).unwrap_or(u8::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_expansion() {
        assert_eq!(expand(0, 5), 0);
        assert_eq!(expand(31, 5), 255);
        assert_eq!(expand(63, 6), 255);
        assert_eq!(expand(16, 5), 131);
    }

    #[test]
    fn test_ppm_has_header_and_full_frame() {
        let path = std::env::temp_dir().join(format!("sky-clock-{}.ppm", std::process::id()));
        write_ppm(&MockPanel::new(), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let header = b"P6\n800 480\n255\n";
        assert!(bytes.starts_with(header));
        assert_eq!(bytes.len(), header.len() + 800 * 480 * 3);
    }
}
