//! Display panel abstraction

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::primitives::Rectangle;

/// Native panel width in pixels.
pub const PANEL_WIDTH: u32 = 800;

/// Native panel height in pixels.
pub const PANEL_HEIGHT: u32 = 480;

/// RGB panel with two frame buffers.
///
/// Bring-up (clocks, timings, pins) belongs to the vendor driver; the core
/// only needs these four calls. `draw_bitmap` and `swap_buffers` are called
/// from task context, after the vsync gate has been passed.
pub trait DisplayPanel {
    /// Hardware reset.
    async fn reset(&mut self) -> Result<(), DisplayError>;

    /// Initialise the controller after reset.
    async fn init(&mut self) -> Result<(), DisplayError>;

    /// Copy `pixels` (row-major, `area.size.width * area.size.height` long)
    /// into the back buffer at `area`.
    fn draw_bitmap(&mut self, area: Rectangle, pixels: &[Rgb565]) -> Result<(), DisplayError>;

    /// Present the back buffer.
    fn swap_buffers(&mut self) -> Result<(), DisplayError>;
}

/// Display errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error
    Communication,
    /// Display busy
    Busy,
    /// Area outside the panel, or pixel count does not match the area
    OutOfBounds,
    /// Timeout
    Timeout,
}

#[cfg(feature = "std")]
impl std::error::Error for DisplayError {}

impl core::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DisplayError {
    /// Short description for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Communication => "display communication error",
            Self::Busy => "display is busy",
            Self::OutOfBounds => "bitmap outside panel",
            Self::Timeout => "display operation timeout",
        }
    }
}

/// Check that `area` lies on the panel and `pixels` covers it exactly.
pub fn check_bitmap(area: &Rectangle, pixel_count: usize) -> Result<(), DisplayError> {
    let right = u32::try_from(area.top_left.x)
        .ok()
        .and_then(|x| x.checked_add(area.size.width));
    let bottom = u32::try_from(area.top_left.y)
        .ok()
        .and_then(|y| y.checked_add(area.size.height));
    match (right, bottom) {
        (Some(r), Some(b)) if r <= PANEL_WIDTH && b <= PANEL_HEIGHT => {}
        _ => return Err(DisplayError::OutOfBounds),
    }
    let expected = u64::from(area.size.width)
        .checked_mul(u64::from(area.size.height))
        .and_then(|n| usize::try_from(n).ok());
    if expected == Some(pixel_count) {
        Ok(())
    } else {
        Err(DisplayError::OutOfBounds)
    }
}
