//! WiFi driver bridge: radio commands in, radio events out as notifications.

use embassy_time::Timer;

use bus::{Command, Endpoint, FanOut, Message, Notification, WifiCommand};
use platform::config::{TASK_TICK, WIFI_NOTIFY_TARGETS};
use platform::wifi::SCAN_MAX_RESULTS;
use platform::{WifiEvent, WifiRadio};

/// Owns the radio; executes `WifiCommand`s and broadcasts its events.
pub struct WifiDriverTask<'a, R: WifiRadio, const N: usize> {
    radio: R,
    inbox: &'a Endpoint<N>,
    notify: FanOut<'a, WIFI_NOTIFY_TARGETS>,
}

impl<'a, R: WifiRadio, const N: usize> WifiDriverTask<'a, R, N> {
    /// Bridge over `radio`. `notify` should already hold its subscribers.
    pub fn new(
        radio: R,
        inbox: &'a Endpoint<N>,
        notify: FanOut<'a, WIFI_NOTIFY_TARGETS>,
    ) -> Self {
        Self {
            radio,
            inbox,
            notify,
        }
    }

    /// The radio, for inspection.
    pub fn radio(&self) -> &R {
        &self.radio
    }

    /// The radio, for scripting events in the emulator and tests.
    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }

    /// Execute queued commands, then forward pending radio events.
    pub fn tick(&mut self) {
        while let Some(message) = self.inbox.try_dequeue() {
            match message {
                Message::Command(Command::Wifi(command)) => self.execute(&command),
                other => platform::warn!("wifi-driver: unexpected {}", other.as_str()),
            }
        }
        while let Some(event) = self.radio.poll_event() {
            self.forward(event);
        }
    }

    fn execute(&mut self, command: &WifiCommand) {
        platform::debug!("wifi-driver: {}", command.as_str());
        let result = match command {
            WifiCommand::Scan => self.radio.scan(),
            WifiCommand::Smartconfig => self.radio.start_smartconfig(),
            WifiCommand::Connect(credentials) => {
                platform::info!("wifi-driver: connecting to {}", credentials.ssid.as_str());
                self.radio.connect(credentials)
            }
            WifiCommand::Disconnect => self.radio.disconnect(),
        };
        if let Err(e) = result {
            platform::warn!("wifi-driver: {} failed: {}", command.as_str(), e.as_str());
        }
    }

    fn forward(&mut self, event: WifiEvent) {
        let notification = match event {
            WifiEvent::ScanDone { ap_count } => {
                platform::info!(
                    "wifi-driver: scan found {} access points (max {})",
                    ap_count,
                    SCAN_MAX_RESULTS
                );
                Notification::ScanDone
            }
            WifiEvent::Connected => Notification::Connected,
            WifiEvent::Disconnected => Notification::Disconnected,
            WifiEvent::GotIp(ip) => {
                platform::info!("wifi-driver: got ip {}", ip.as_str());
                Notification::GotIp(ip)
            }
            WifiEvent::LostIp => Notification::LostIp,
            WifiEvent::SmartconfigCredentials(credentials) => {
                let ssid = credentials.ssid.as_str();
                platform::info!("wifi-driver: smartconfig sent ssid {}", ssid);
                Notification::SmartconfigGotCredentials(credentials)
            }
            WifiEvent::SmartconfigAckDone => {
                if let Err(e) = self.radio.stop_smartconfig() {
                    platform::warn!("wifi-driver: stop smartconfig failed: {}", e.as_str());
                }
                return;
            }
        };
        self.notify.broadcast(&Message::Notification(notification));
    }

    /// Task loop.
    pub async fn run(mut self) {
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
    use bus::MessageSink;
    use platform::mocks::{MockRadio, RadioCall};
    use platform::{Credentials, WifiError};

    fn fanout<'a>(targets: &[&'a dyn MessageSink]) -> FanOut<'a, WIFI_NOTIFY_TARGETS> {
        let mut f = FanOut::new("wifi-driver");
        for t in targets {
            assert!(f.add_target(*t));
        }
        f
    }

    #[test]
    fn test_commands_reach_the_radio() {
        let inbox: Endpoint<4> = Endpoint::new("wifi-driver");
        let mut task = WifiDriverTask::new(MockRadio::new(), &inbox, fanout(&[]));
        let creds = Credentials::new("home", "secret");

        inbox.publish(WifiCommand::Scan.into());
        inbox.publish(WifiCommand::Connect(creds.clone()).into());
        inbox.publish(WifiCommand::Disconnect.into());
        inbox.publish(WifiCommand::Smartconfig.into());
        task.tick();

        assert_eq!(
            task.radio().calls(),
            &[
                RadioCall::Scan,
                RadioCall::Connect(creds),
                RadioCall::Disconnect,
                RadioCall::StartSmartconfig,
            ]
        );
    }

    #[test]
    fn test_events_are_broadcast_to_every_subscriber() {
        let inbox: Endpoint<2> = Endpoint::new("wifi-driver");
        let connectivity: Endpoint<4> = Endpoint::new("wifi");
        let polling: Endpoint<4> = Endpoint::new("polling");
        let mut task = WifiDriverTask::new(
            MockRadio::new(),
            &inbox,
            fanout(&[&connectivity, &polling]),
        );

        let ip = platform::truncated("10.0.0.9");
        task.radio_mut().push_event(WifiEvent::Connected);
        task.radio_mut().push_event(WifiEvent::GotIp(ip.clone()));
        task.tick();

        for ep in [&connectivity, &polling] {
            let connected = Message::from(Notification::Connected);
            assert_eq!(ep.try_dequeue(), Some(connected));
            let got_ip = Message::from(Notification::GotIp(ip.clone()));
            assert_eq!(ep.try_dequeue(), Some(got_ip));
            assert_eq!(ep.try_dequeue(), None);
        }
    }

    #[test]
    fn test_event_mapping() {
        let inbox: Endpoint<2> = Endpoint::new("wifi-driver");
        let out: Endpoint<8> = Endpoint::new("wifi");
        let mut task = WifiDriverTask::new(MockRadio::new(), &inbox, fanout(&[&out]));
        let creds = Credentials::new("phone", "pw");

        for event in [
            WifiEvent::ScanDone { ap_count: 7 },
            WifiEvent::LostIp,
            WifiEvent::Disconnected,
            WifiEvent::SmartconfigCredentials(creds.clone()),
        ] {
            task.radio_mut().push_event(event);
        }
        task.tick();

        let got: Vec<_> = core::iter::from_fn(|| out.try_dequeue()).collect();
        assert_eq!(
            got,
            vec![
                Message::from(Notification::ScanDone),
                Message::from(Notification::LostIp),
                Message::from(Notification::Disconnected),
                Message::from(Notification::SmartconfigGotCredentials(creds)),
            ]
        );
    }

    #[test]
    fn test_smartconfig_ack_stops_provisioning_silently() {
        let inbox: Endpoint<2> = Endpoint::new("wifi-driver");
        let out: Endpoint<4> = Endpoint::new("wifi");
        let mut task = WifiDriverTask::new(MockRadio::new(), &inbox, fanout(&[&out]));

        task.radio_mut().push_event(WifiEvent::SmartconfigAckDone);
        task.tick();

        assert_eq!(task.radio().calls(), &[RadioCall::StopSmartconfig]);
        assert_eq!(out.try_dequeue(), None);
    }

    #[test]
    fn test_radio_errors_are_not_fatal() {
        let inbox: Endpoint<2> = Endpoint::new("wifi-driver");
        let out: Endpoint<4> = Endpoint::new("wifi");
        let mut radio = MockRadio::new();
        radio.fail_with(WifiError::InvalidState);
        radio.push_event(WifiEvent::Connected);
        let mut task = WifiDriverTask::new(radio, &inbox, fanout(&[&out]));

        inbox.publish(WifiCommand::Scan.into());
        task.tick();

        assert_eq!(task.radio().calls(), &[RadioCall::Scan]);
        let connected = Message::from(Notification::Connected);
        assert_eq!(out.try_dequeue(), Some(connected));
    }

    #[test]
    fn test_foreign_messages_are_dropped() {
        let inbox: Endpoint<2> = Endpoint::new("wifi-driver");
        let mut task = WifiDriverTask::new(MockRadio::new(), &inbox, fanout(&[]));

        inbox.publish(Message::Notification(Notification::LostIp));
        task.tick();
        assert!(task.radio().calls().is_empty());
    }
}
