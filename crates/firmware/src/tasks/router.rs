//! App router: boots the UI and turns notifications into display commands.

use embassy_time::Timer;

use bus::{Command, DisplayCommand, Endpoint, Message, MessageSink, Notification};
use platform::config::{DEFAULT_LOCATION, TASK_TICK};
use platform::text::UNKNOWN_IP;

/// Display command for a notification, if the dashboard shows it.
pub fn route(notification: &Notification) -> Option<DisplayCommand> {
    match notification {
        Notification::GotIp(ip) => Some(DisplayCommand::SetIp(ip.clone())),
        Notification::LostIp | Notification::Disconnected => {
            Some(DisplayCommand::set_ip(UNKNOWN_IP))
        }
        Notification::TimeUpdate(time) => Some(DisplayCommand::SetTime(time.clone())),
        Notification::WeatherUpdate(weather) => Some(DisplayCommand::SetWeather(weather.clone())),
        Notification::ScanDone
        | Notification::Connected
        | Notification::SmartconfigGotCredentials(_) => None,
    }
}

/// Owns the app endpoint.
pub struct AppRouter<'a, const N: usize> {
    inbox: &'a Endpoint<N>,
    display: &'a dyn MessageSink,
    wifi: &'a dyn MessageSink,
}

impl<'a, const N: usize> AppRouter<'a, N> {
    /// Router draining `inbox` into `display`; `wifi` receives the boot `Connect`.
    pub fn new(
        inbox: &'a Endpoint<N>,
        display: &'a dyn MessageSink,
        wifi: &'a dyn MessageSink,
    ) -> Self {
        Self { inbox, display, wifi }
    }

    /// Load the dashboard, label it, then ask for a network.
    pub fn boot(&self) {
        platform::info!("app: boot");
        self.display.publish(DisplayCommand::LoadUi.into());
        self.display
            .publish(DisplayCommand::set_location(DEFAULT_LOCATION).into());
        self.wifi.publish(Message::Command(Command::Connect));
    }

    /// Route every queued notification. Returns how many reached the display.
    pub fn tick(&self) -> usize {
        let mut routed = 0usize;
        while let Some(message) = self.inbox.try_dequeue() {
            let notification = match message {
                Message::Notification(notification) => notification,
                other => {
                    platform::warn!("app: unexpected {}", other.as_str());
                    continue;
                }
            };
            match route(&notification) {
                Some(command) => {
                    platform::debug!("app: {} -> {}", notification.as_str(), command.as_str());
                    if self.display.publish(command.into()) {
                        routed = routed.saturating_add(1);
                    }
                }
                None => platform::trace!("app: ignoring {}", notification.as_str()),
            }
        }
        routed
    }

    /// Boot, then route forever.
    pub async fn run(self) {
        self.boot();
        loop {
            self.tick();
            Timer::after(TASK_TICK).await;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use bus::{TimeData, WeatherData};
    use platform::Credentials;

    #[test]
    fn test_boot_sequence() {
        let inbox: Endpoint<4> = Endpoint::new("app");
        let display: Endpoint<4> = Endpoint::new("display");
        let wifi: Endpoint<2> = Endpoint::new("wifi");
        let router = AppRouter::new(&inbox, &display, &wifi);

        router.boot();

        assert_eq!(
            display.try_dequeue(),
            Some(Message::from(DisplayCommand::LoadUi))
        );
        assert_eq!(
            display.try_dequeue(),
            Some(Message::from(DisplayCommand::set_location("Bengaluru,IN")))
        );
        assert_eq!(display.try_dequeue(), None);
        assert_eq!(wifi.try_dequeue(), Some(Message::Command(Command::Connect)));
    }

    #[test]
    fn test_route_table() {
        let ip = platform::truncated("192.168.1.20");
        assert_eq!(
            route(&Notification::GotIp(ip.clone())),
            Some(DisplayCommand::SetIp(ip))
        );
        assert_eq!(
            route(&Notification::LostIp),
            Some(DisplayCommand::set_ip("????"))
        );
        assert_eq!(
            route(&Notification::Disconnected),
            Some(DisplayCommand::set_ip("????"))
        );
        assert_eq!(route(&Notification::Connected), None);
        assert_eq!(route(&Notification::ScanDone), None);
        assert_eq!(
            route(&Notification::SmartconfigGotCredentials(Credentials::new("a", "b"))),
            None
        );
    }

    #[test]
    fn test_payloads_are_copied_unchanged() {
        let time = TimeData::new(1_700_000_000, "03:05", "PM", "Tue, 14 Nov 2023");
        let weather = WeatherData::new("27 C", "64 %");
        assert_eq!(
            route(&Notification::TimeUpdate(time.clone())),
            Some(DisplayCommand::SetTime(time))
        );
        assert_eq!(
            route(&Notification::WeatherUpdate(weather.clone())),
            Some(DisplayCommand::SetWeather(weather))
        );
    }

    #[test]
    fn test_tick_forwards_in_order_and_skips_commands() {
        let inbox: Endpoint<4> = Endpoint::new("app");
        let display: Endpoint<4> = Endpoint::new("display");
        let wifi: Endpoint<2> = Endpoint::new("wifi");
        let router = AppRouter::new(&inbox, &display, &wifi);

        inbox.publish(Notification::Connected.into());
        inbox.publish(Notification::GotIp(platform::truncated("10.0.0.5")).into());
        inbox.publish(Message::Command(Command::Connect));
        inbox.publish(Notification::LostIp.into());

        assert_eq!(router.tick(), 2);
        assert_eq!(
            display.try_dequeue(),
            Some(Message::from(DisplayCommand::set_ip("10.0.0.5")))
        );
        assert_eq!(
            display.try_dequeue(),
            Some(Message::from(DisplayCommand::set_ip("????")))
        );
        assert_eq!(display.try_dequeue(), None);
        assert_eq!(wifi.try_dequeue(), None);
    }

    #[test]
    fn test_full_display_queue_is_not_counted() {
        let inbox: Endpoint<4> = Endpoint::new("app");
        let display: Endpoint<1> = Endpoint::new("display");
        let wifi: Endpoint<2> = Endpoint::new("wifi");
        let router = AppRouter::new(&inbox, &display, &wifi);

        inbox.publish(Notification::LostIp.into());
        inbox.publish(Notification::Disconnected.into());

        assert_eq!(router.tick(), 1);
    }
}
