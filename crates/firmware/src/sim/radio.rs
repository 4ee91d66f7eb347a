//! Simulated station interface.

use std::collections::VecDeque;

use platform::{Credentials, WifiError, WifiEvent, WifiRadio};

/// Address handed out by the simulated access point.
pub const SIM_IP: &str = "192.168.4.2";

/// Radio answering each request with the events a real access point would
/// produce. Connecting succeeds only with `network`'s credentials; any other
/// attempt stays silent so the connect timeout has something to do.
pub struct SimRadio {
    network: Credentials,
    provisioned: Option<Credentials>,
    events: VecDeque<WifiEvent>,
    connected: bool,
}

impl SimRadio {
    /// Radio near one access point. Smartconfig hands out `network`.
    pub fn new(network: Credentials) -> Self {
        Self {
            network: network.clone(),
            provisioned: Some(network),
            events: VecDeque::new(),
            connected: false,
        }
    }

    /// Drop the link, as if the access point went away.
    pub fn drop_link(&mut self) {
        if self.connected {
            self.connected = false;
            self.events.push_back(WifiEvent::LostIp);
            self.events.push_back(WifiEvent::Disconnected);
        }
    }

    /// Whether the station is associated.
    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

impl WifiRadio for SimRadio {
    fn scan(&mut self) -> Result<(), WifiError> {
        self.events.push_back(WifiEvent::ScanDone { ap_count: 3 });
        Ok(())
    }

    fn start_smartconfig(&mut self) -> Result<(), WifiError> {
        let credentials = self.provisioned.take().ok_or(WifiError::InvalidState)?;
        let event = WifiEvent::SmartconfigCredentials(credentials);
        self.events.push_back(event);
        Ok(())
    }

    fn stop_smartconfig(&mut self) -> Result<(), WifiError> {
        Ok(())
    }

    fn connect(&mut self, credentials: &Credentials) -> Result<(), WifiError> {
        if self.connected {
            return Err(WifiError::InvalidState);
        }
        if *credentials == self.network {
            self.connected = true;
            self.events.push_back(WifiEvent::Connected);
            let ip = platform::truncated(SIM_IP);
            self.events.push_back(WifiEvent::GotIp(ip));
            if self.provisioned.is_none() {
                self.events.push_back(WifiEvent::SmartconfigAckDone);
            }
        }
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), WifiError> {
        if self.connected {
            self.connected = false;
            self.events.push_back(WifiEvent::Disconnected);
        }
        Ok(())
    }

    fn poll_event(&mut self) -> Option<WifiEvent> {
        self.events.pop_front()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn drain(radio: &mut SimRadio) -> Vec<WifiEvent> {
        core::iter::from_fn(|| radio.poll_event()).collect()
    }

    #[test]
    fn test_connect_with_right_credentials() {
        let home = Credentials::new("home", "pw");
        let mut radio = SimRadio::new(home.clone());
        radio.connect(&home).unwrap();
        assert_eq!(
            drain(&mut radio),
            vec![WifiEvent::Connected, WifiEvent::GotIp(platform::truncated(SIM_IP))]
        );
        assert!(radio.is_connected());
    }

    #[test]
    fn test_wrong_credentials_stay_silent() {
        let mut radio = SimRadio::new(Credentials::new("home", "pw"));
        radio.connect(&Credentials::new("home", "nope")).unwrap();
        assert!(drain(&mut radio).is_empty());
        assert!(!radio.is_connected());
    }

    #[test]
    fn test_smartconfig_provisions_once_and_acks_after_join() {
        let home = Credentials::new("home", "pw");
        let mut radio = SimRadio::new(home.clone());
        radio.start_smartconfig().unwrap();
        assert_eq!(
            drain(&mut radio),
            vec![WifiEvent::SmartconfigCredentials(home.clone())]
        );
        assert_eq!(radio.start_smartconfig(), Err(WifiError::InvalidState));

        radio.connect(&home).unwrap();
        assert_eq!(
            drain(&mut radio).last(),
            Some(&WifiEvent::SmartconfigAckDone)
        );
    }

    #[test]
    fn test_link_drop() {
        let home = Credentials::new("home", "pw");
        let mut radio = SimRadio::new(home.clone());
        radio.drop_link();
        assert!(drain(&mut radio).is_empty());

        radio.connect(&home).unwrap();
        drain(&mut radio);
        radio.drop_link();
        assert_eq!(
            drain(&mut radio),
            vec![WifiEvent::LostIp, WifiEvent::Disconnected]
        );
    }
}
