//! Mock implementations for testing
//!
//! In-memory stand-ins for every collaborator trait, used by unit tests,
//! integration tests and the desktop emulator.

#![cfg(any(test, feature = "std"))]
#![allow(clippy::arithmetic_side_effects, clippy::indexing_slicing)]

use std::collections::VecDeque;
use std::vec::Vec;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::RgbColor;
use embedded_graphics::primitives::Rectangle;

use crate::display::{check_bitmap, PANEL_HEIGHT, PANEL_WIDTH};
use crate::*;

// ---------------------------------------------------------------------------
// Panel
// ---------------------------------------------------------------------------

/// Mock panel: keeps a full frame in memory and counts calls.
pub struct MockPanel {
    frame: Vec<Rgb565>,
    resets: usize,
    inits: usize,
    draws: Vec<Rectangle>,
    swaps: usize,
    fail_draw: Option<DisplayError>,
}

impl MockPanel {
    /// Panel of the native size, cleared to black.
    pub fn new() -> Self {
        let len = usize::try_from(PANEL_WIDTH * PANEL_HEIGHT).unwrap_or(0);
        Self {
            frame: std::vec![Rgb565::BLACK; len],
            resets: 0,
            inits: 0,
            draws: Vec::new(),
            swaps: 0,
            fail_draw: None,
        }
    }

    /// Make every following `draw_bitmap` fail with `err`.
    pub fn fail_draws_with(&mut self, err: DisplayError) {
        self.fail_draw = Some(err);
    }

    /// Areas passed to `draw_bitmap`, in call order.
    pub fn draws(&self) -> &[Rectangle] {
        &self.draws
    }

    /// Number of `swap_buffers` calls.
    pub fn swap_count(&self) -> usize {
        self.swaps
    }

    /// Number of `reset` calls.
    pub fn reset_count(&self) -> usize {
        self.resets
    }

    /// Number of `init` calls.
    pub fn init_count(&self) -> usize {
        self.inits
    }

    /// Pixel at `(x, y)` in the back buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb565> {
        let idx = usize::try_from(y.checked_mul(PANEL_WIDTH)?.checked_add(x)?).ok()?;
        self.frame.get(idx).copied()
    }
}

impl Default for MockPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPanel for MockPanel {
    async fn reset(&mut self) -> Result<(), DisplayError> {
        self.resets += 1;
        Ok(())
    }

    async fn init(&mut self) -> Result<(), DisplayError> {
        self.inits += 1;
        Ok(())
    }

    fn draw_bitmap(&mut self, area: Rectangle, pixels: &[Rgb565]) -> Result<(), DisplayError> {
        if let Some(err) = self.fail_draw {
            return Err(err);
        }
        check_bitmap(&area, pixels.len())?;
        self.draws.push(area);

        let width = usize::try_from(area.size.width).unwrap_or(0);
        if width == 0 {
            return Ok(());
        }
        let x0 = usize::try_from(area.top_left.x).unwrap_or(0);
        let y0 = usize::try_from(area.top_left.y).unwrap_or(0);
        let panel_width = usize::try_from(PANEL_WIDTH).unwrap_or(0);
        for (row, line) in pixels.chunks(width).enumerate() {
            let start = (y0 + row) * panel_width + x0;
            if let Some(dst) = self.frame.get_mut(start..start + line.len()) {
                dst.copy_from_slice(line);
            }
        }
        Ok(())
    }

    fn swap_buffers(&mut self) -> Result<(), DisplayError> {
        self.swaps += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Radio
// ---------------------------------------------------------------------------

/// Call recorded by [`MockRadio`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadioCall {
    /// `scan()`
    Scan,
    /// `start_smartconfig()`
    StartSmartconfig,
    /// `stop_smartconfig()`
    StopSmartconfig,
    /// `connect(credentials)`
    Connect(Credentials),
    /// `disconnect()`
    Disconnect,
}

/// Mock radio: records calls, replays queued events.
#[derive(Default)]
pub struct MockRadio {
    calls: Vec<RadioCall>,
    events: VecDeque<WifiEvent>,
    fail: Option<WifiError>,
}

impl MockRadio {
    /// Radio with no pending events.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event for `poll_event`.
    pub fn push_event(&mut self, event: WifiEvent) {
        self.events.push_back(event);
    }

    /// Make every following call fail with `err`.
    pub fn fail_with(&mut self, err: WifiError) {
        self.fail = Some(err);
    }

    /// Calls made so far.
    pub fn calls(&self) -> &[RadioCall] {
        &self.calls
    }

    fn record(&mut self, call: RadioCall) -> Result<(), WifiError> {
        self.calls.push(call);
        match self.fail {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl WifiRadio for MockRadio {
    fn scan(&mut self) -> Result<(), WifiError> {
        self.record(RadioCall::Scan)
    }

    fn start_smartconfig(&mut self) -> Result<(), WifiError> {
        self.record(RadioCall::StartSmartconfig)
    }

    fn stop_smartconfig(&mut self) -> Result<(), WifiError> {
        self.record(RadioCall::StopSmartconfig)
    }

    fn connect(&mut self, credentials: &Credentials) -> Result<(), WifiError> {
        self.record(RadioCall::Connect(credentials.clone()))
    }

    fn disconnect(&mut self) -> Result<(), WifiError> {
        self.record(RadioCall::Disconnect)
    }

    fn poll_event(&mut self) -> Option<WifiEvent> {
        self.events.pop_front()
    }
}

// ---------------------------------------------------------------------------
// Data source
// ---------------------------------------------------------------------------

/// Mock data source: replays queued results, then reports transport errors.
#[derive(Default)]
pub struct MockDataSource {
    times: VecDeque<Result<TimeInfo, FetchError>>,
    weather: VecDeque<Result<WeatherInfo, FetchError>>,
    time_calls: usize,
    weather_calls: usize,
}

impl MockDataSource {
    /// Source with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of the next `fetch_time`.
    pub fn push_time(&mut self, result: Result<TimeInfo, FetchError>) {
        self.times.push_back(result);
    }

    /// Queue the result of the next `fetch_weather`.
    pub fn push_weather(&mut self, result: Result<WeatherInfo, FetchError>) {
        self.weather.push_back(result);
    }

    /// Number of `fetch_time` calls.
    pub fn time_calls(&self) -> usize {
        self.time_calls
    }

    /// Number of `fetch_weather` calls.
    pub fn weather_calls(&self) -> usize {
        self.weather_calls
    }
}

impl DataSource for MockDataSource {
    async fn fetch_time(&mut self) -> Result<TimeInfo, FetchError> {
        self.time_calls += 1;
        self.times.pop_front().unwrap_or(Err(FetchError::Transport))
    }

    async fn fetch_weather(&mut self) -> Result<WeatherInfo, FetchError> {
        self.weather_calls += 1;
        let next = self.weather.pop_front();
        next.unwrap_or(Err(FetchError::Transport))
    }
}

// ---------------------------------------------------------------------------
// Credential store
// ---------------------------------------------------------------------------

/// In-memory credential store.
#[derive(Default)]
pub struct MemoryCredentialStore {
    saved: Option<Credentials>,
    saves: usize,
    fail_save: Option<StorageError>,
}

impl MemoryCredentialStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that already holds `credentials`.
    pub fn with(credentials: Credentials) -> Self {
        Self {
            saved: Some(credentials),
            ..Self::default()
        }
    }

    /// Make every following `save` fail with `err`.
    pub fn fail_saves_with(&mut self, err: StorageError) {
        self.fail_save = Some(err);
    }

    /// Currently stored credentials.
    pub fn saved(&self) -> Option<&Credentials> {
        self.saved.as_ref()
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&mut self) -> Option<Credentials> {
        self.saved.clone()
    }

    fn save(&mut self, credentials: &Credentials) -> Result<(), StorageError> {
        if let Some(err) = self.fail_save {
            return Err(err);
        }
        self.saved = Some(credentials.clone());
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use embedded_graphics::prelude::{Point, Size};

    #[tokio::test]
    async fn test_mock_panel_counts_calls() {
        let mut panel = MockPanel::new();
        panel.reset().await.unwrap();
        panel.init().await.unwrap();
        panel.swap_buffers().unwrap();
        assert_eq!(panel.reset_count(), 1);
        assert_eq!(panel.init_count(), 1);
        assert_eq!(panel.swap_count(), 1);
    }

    #[test]
    fn test_mock_panel_copies_bitmap() {
        let mut panel = MockPanel::new();
        let area = Rectangle::new(Point::new(2, 3), Size::new(2, 2));
        let pixels = [Rgb565::RED, Rgb565::GREEN, Rgb565::BLUE, Rgb565::WHITE];
        panel.draw_bitmap(area, &pixels).unwrap();
        assert_eq!(panel.pixel(2, 3), Some(Rgb565::RED));
        assert_eq!(panel.pixel(3, 3), Some(Rgb565::GREEN));
        assert_eq!(panel.pixel(2, 4), Some(Rgb565::BLUE));
        assert_eq!(panel.pixel(3, 4), Some(Rgb565::WHITE));
        assert_eq!(panel.draws(), &[area]);
    }

    #[test]
    fn test_mock_panel_rejects_bad_length() {
        let mut panel = MockPanel::new();
        let area = Rectangle::new(Point::zero(), Size::new(2, 2));
        assert_eq!(
            panel.draw_bitmap(area, &[Rgb565::RED]),
            Err(DisplayError::OutOfBounds)
        );
        assert!(panel.draws().is_empty());
    }

    #[test]
    fn test_mock_radio_replays_events_in_order() {
        let mut radio = MockRadio::new();
        radio.push_event(WifiEvent::Connected);
        radio.push_event(WifiEvent::LostIp);
        assert_eq!(radio.poll_event(), Some(WifiEvent::Connected));
        assert_eq!(radio.poll_event(), Some(WifiEvent::LostIp));
        assert_eq!(radio.poll_event(), None);
    }

    #[tokio::test]
    async fn test_mock_data_source_defaults_to_transport_error() {
        let mut source = MockDataSource::new();
        assert_eq!(source.fetch_time().await, Err(FetchError::Transport));
        assert_eq!(source.time_calls(), 1);
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryCredentialStore::new();
        assert!(store.load().is_none());
        let creds = Credentials::new("home", "secret");
        store.save(&creds).unwrap();
        assert_eq!(store.load(), Some(creds));
        assert_eq!(store.save_count(), 1);
    }
}
