//! Partial render buffer covering a horizontal band of the panel.
//!
//! A full 800×480 RGB565 frame is 750 KiB; the render buffer only holds
//! `PIXELS / width` full-width lines. The display task moves the window down
//! the panel band by band, renders into it, and flushes each band.
//!
//! To the renderer the buffer looks like the whole panel: its bounding box is
//! the full panel and drawing outside the current band is clipped.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Band-sized render target.
pub struct StripBuffer<const PIXELS: usize> {
    pixels: [Rgb565; PIXELS],
    panel: Size,
    window: Rectangle,
}

impl<const PIXELS: usize> StripBuffer<PIXELS> {
    /// Buffer for a `width` × `height` panel, windowed on the first band.
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: [Rgb565::BLACK; PIXELS],
            panel: Size::new(width, height),
            window: Rectangle::new(Point::zero(), Size::zero()),
        }
    }

    /// Full-width lines that fit in the buffer.
    pub fn lines(&self) -> u32 {
        let width = usize::try_from(self.panel.width).unwrap_or(usize::MAX);
        PIXELS
            .checked_div(width)
            .and_then(|lines| u32::try_from(lines).ok())
            .unwrap_or(0)
            .min(self.panel.height)
    }

    /// Number of bands a full frame takes.
    pub fn band_count(&self) -> u32 {
        let lines = self.lines();
        match self.panel.height.checked_div(lines) {
            Some(full) if self.panel.height.checked_rem(lines) == Some(0) => full,
            Some(full) => full.saturating_add(1),
            None => 0,
        }
    }

    /// Move the window to band `index` and return its area. Bands past the
    /// end of the panel give an empty area.
    pub fn set_band(&mut self, index: u32) -> Rectangle {
        let lines = self.lines();
        let top = index.saturating_mul(lines).min(self.panel.height);
        let bottom = top.saturating_add(lines).min(self.panel.height);
        self.window = Rectangle::new(
            Point::new(0, i32::try_from(top).unwrap_or(i32::MAX)),
            Size::new(self.panel.width, bottom.saturating_sub(top)),
        );
        self.window
    }

    /// Area of the current band.
    pub fn area(&self) -> Rectangle {
        self.window
    }

    /// Pixels of the current band, row-major.
    pub fn pixels(&self) -> &[Rgb565] {
        let len = usize::try_from(self.window.size.width)
            .ok()
            .zip(usize::try_from(self.window.size.height).ok())
            .and_then(|(w, h)| w.checked_mul(h))
            .unwrap_or(0);
        self.pixels.get(..len).unwrap_or(&[])
    }

    fn index(&self, point: Point) -> Option<usize> {
        if !self.window.contains(point) {
            return None;
        }
        let x = usize::try_from(point.x).ok()?;
        let row = usize::try_from(point.y.checked_sub(self.window.top_left.y)?).ok()?;
        let width = usize::try_from(self.window.size.width).ok()?;
        row.checked_mul(width)?.checked_add(x)
    }
}

impl<const PIXELS: usize> OriginDimensions for StripBuffer<PIXELS> {
    fn size(&self) -> Size {
        self.panel
    }
}

impl<const PIXELS: usize> DrawTarget for StripBuffer<PIXELS> {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(slot) = self.index(point).and_then(|i| self.pixels.get_mut(i)) {
                *slot = color;
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let visible = area.intersection(&self.window);
        for point in visible.points() {
            if let Some(slot) = self.index(point).and_then(|i| self.pixels.get_mut(i)) {
                *slot = color;
            }
        }
        Ok(())
    }
}
