//! Dashboard renderer: draws a [`Dashboard`] onto any RGB565 draw target.
//!
//! The renderer is stateless and draws the whole frame every call. Targets
//! that only cover part of the panel (e.g. a band buffer) clip on their own,
//! so the same call renders a full frame or one band of it.

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;

use crate::dashboard::Dashboard;
use crate::screen::Screen;

/// Frame background.
pub const BACKGROUND: Rgb565 = Rgb565::BLACK;
/// Header bar fill.
pub const HEADER: Rgb565 = Rgb565::new(4, 8, 12);
/// Primary text.
pub const FOREGROUND: Rgb565 = Rgb565::WHITE;
/// Secondary text.
pub const ACCENT: Rgb565 = Rgb565::new(31, 40, 0);

/// Header bar height in pixels.
pub const HEADER_HEIGHT: u32 = 48;

/// Demo screen bar colours, left to right.
pub const DEMO_BARS: [Rgb565; 8] = [
    Rgb565::WHITE,
    Rgb565::YELLOW,
    Rgb565::CYAN,
    Rgb565::GREEN,
    Rgb565::MAGENTA,
    Rgb565::RED,
    Rgb565::BLUE,
    Rgb565::BLACK,
];

/// Draws dashboards.
#[derive(Debug, Clone, Copy, Default)]
pub struct DashboardRenderer;

impl DashboardRenderer {
    /// Draw `dashboard` onto `target`.
    pub fn render<D>(&self, dashboard: &Dashboard, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        match dashboard.screen {
            Screen::Boot => render_boot(target),
            Screen::Dashboard => render_dashboard(dashboard, target),
            Screen::Demo => render_demo(target),
        }
    }
}

fn render_boot<D>(target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    target.clear(BACKGROUND)?;
    let title = MonoTextStyle::new(&FONT_10X20, FOREGROUND);
    let small = MonoTextStyle::new(&FONT_6X10, ACCENT);
    Text::new(platform::config::APP_NAME, Point::new(340, 230), title).draw(target)?;
    Text::new("starting...", Point::new(367, 256), small).draw(target)?;
    Ok(())
}

fn render_dashboard<D>(dashboard: &Dashboard, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    target.clear(BACKGROUND)?;
    let width = target.bounding_box().size.width;

    // Header: location on the left, address on the right.
    Rectangle::new(Point::zero(), Size::new(width, HEADER_HEIGHT))
        .into_styled(PrimitiveStyle::with_fill(HEADER))
        .draw(target)?;
    let header = MonoTextStyle::new(&FONT_10X20, FOREGROUND);
    Text::new(dashboard.location.as_str(), Point::new(20, 31), header).draw(target)?;
    let label = MonoTextStyle::new(&FONT_10X20, ACCENT);
    Text::new("IP", Point::new(560, 31), label).draw(target)?;
    Text::new(dashboard.ip.as_str(), Point::new(600, 31), header).draw(target)?;

    // Clock
    let big = MonoTextStyle::new(&FONT_10X20, FOREGROUND);
    let time = &dashboard.time;
    let after_time = Text::new(time.time.as_str(), Point::new(60, 150), big).draw(target)?;
    let am_pm = Point::new(after_time.x.saturating_add(10), after_time.y);
    Text::new(time.am_pm.as_str(), am_pm, label).draw(target)?;
    Text::new(time.date.as_str(), Point::new(60, 190), label).draw(target)?;

    // Weather
    Text::new("Temperature", Point::new(60, 300), label).draw(target)?;
    let weather = &dashboard.weather;
    Text::new(weather.temperature.as_str(), Point::new(240, 300), big).draw(target)?;
    Text::new("Humidity", Point::new(60, 340), label).draw(target)?;
    Text::new(weather.humidity.as_str(), Point::new(240, 340), big).draw(target)?;

    Ok(())
}

fn render_demo<D>(target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let size = target.bounding_box().size;
    let bar_width = size.width / 8;
    let mut x = 0i32;
    for color in DEMO_BARS {
        Rectangle::new(Point::new(x, 0), Size::new(bar_width, size.height))
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(target)?;
        x = x.saturating_add(i32::try_from(bar_width).unwrap_or(i32::MAX));
    }
    Ok(())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;
    use bus::{DisplayCommand, TimeData, WeatherData};
    use core::convert::Infallible;
    use platform::display::{PANEL_HEIGHT, PANEL_WIDTH};

    /// Full-size host framebuffer.
    struct Frame {
        size: Size,
        pixels: Vec<Rgb565>,
    }

    impl Frame {
        fn new(width: u32, height: u32) -> Self {
            Self {
                size: Size::new(width, height),
                pixels: vec![Rgb565::new(1, 2, 3); (width * height) as usize],
            }
        }

        fn pixel(&self, x: u32, y: u32) -> Rgb565 {
            self.pixels[(y * self.size.width + x) as usize]
        }

        fn count_in(&self, area: Rectangle, color: Rgb565) -> usize {
            area.points()
                .filter(|p| self.pixel(p.x as u32, p.y as u32) == color)
                .count()
        }
    }

    impl OriginDimensions for Frame {
        fn size(&self) -> Size {
            self.size
        }
    }

    impl DrawTarget for Frame {
        type Color = Rgb565;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Infallible>
        where
            I: IntoIterator<Item = Pixel<Rgb565>>,
        {
            for Pixel(p, c) in pixels {
                if p.x >= 0
                    && p.y >= 0
                    && (p.x as u32) < self.size.width
                    && (p.y as u32) < self.size.height
                {
                    let i = (p.y as u32 * self.size.width + p.x as u32) as usize;
                    self.pixels[i] = c;
                }
            }
            Ok(())
        }
    }

    fn panel() -> Frame {
        Frame::new(PANEL_WIDTH, PANEL_HEIGHT)
    }

    fn loaded() -> Dashboard {
        let mut d = Dashboard::default();
        d.apply(&DisplayCommand::LoadUi);
        d.apply(&DisplayCommand::set_location("Bengaluru,IN"));
        d.apply(&DisplayCommand::set_ip("192.168.1.20"));
        d
    }

    #[test]
    fn test_boot_screen_clears_and_draws_title() {
        let mut frame = panel();
        let boot = Dashboard::default();
        DashboardRenderer.render(&boot, &mut frame).unwrap();
        assert_eq!(frame.pixel(0, 0), BACKGROUND);
        let title = Rectangle::new(Point::new(340, 210), Size::new(100, 25));
        assert!(frame.count_in(title, FOREGROUND) > 0);
    }

    #[test]
    fn test_dashboard_draws_header_bar() {
        let mut frame = panel();
        DashboardRenderer.render(&loaded(), &mut frame).unwrap();
        assert_eq!(frame.pixel(799, 0), HEADER);
        assert_eq!(frame.pixel(799, HEADER_HEIGHT), BACKGROUND);
    }

    #[test]
    fn test_time_text_appears_after_set_time() {
        let clock = Rectangle::new(Point::new(60, 130), Size::new(200, 25));

        let mut d = loaded();
        let mut frame = panel();
        DashboardRenderer.render(&d, &mut frame).unwrap();
        assert_eq!(frame.count_in(clock, FOREGROUND), 0);

        d.apply(&DisplayCommand::SetTime(TimeData::new(1, "10:42", "AM", "Tue")));
        DashboardRenderer.render(&d, &mut frame).unwrap();
        assert!(frame.count_in(clock, FOREGROUND) > 0);
    }

    #[test]
    fn test_weather_text_appears_after_set_weather() {
        let temp = Rectangle::new(Point::new(240, 280), Size::new(100, 25));

        let mut d = loaded();
        d.apply(&DisplayCommand::SetWeather(WeatherData::new("27 C", "64 %")));
        let mut frame = panel();
        DashboardRenderer.render(&d, &mut frame).unwrap();
        assert!(frame.count_in(temp, FOREGROUND) > 0);
    }

    #[test]
    fn test_render_is_deterministic() {
        let d = loaded();
        let mut a = panel();
        let mut b = panel();
        DashboardRenderer.render(&d, &mut a).unwrap();
        DashboardRenderer.render(&d, &mut b).unwrap();
        assert!(a.pixels == b.pixels);
    }

    #[test]
    fn test_demo_draws_colour_bars() {
        let mut d = Dashboard::default();
        d.apply(&DisplayCommand::Demo);
        let mut frame = panel();
        DashboardRenderer.render(&d, &mut frame).unwrap();
        for (i, color) in DEMO_BARS.iter().enumerate() {
            assert_eq!(frame.pixel(i as u32 * 100 + 50, 240), *color);
        }
    }
}
