//! Connectivity state machine.
//!
//! `ConnectivityMachine` is a pure, `no_std`, allocation-free state machine
//! that walks the credential fallback chain (saved → default → scan and
//! smartconfig), issues radio commands, and applies the retry/timeout policy.
//!
//! It has **no** I/O. The owning task feeds it bus commands and
//! notifications, calls [`step`](ConnectivityMachine::step) on every tick, and
//! publishes the [`WifiCommand`]s it returns. Time is passed in, so the whole
//! machine is testable on the host without a clock.
//!
//! The connect deadline is checked separately by
//! [`poll_timeout`](ConnectivityMachine::poll_timeout). The task calls it only
//! after its inbox is drained, so a `Connected` or `GotIp` already queued when
//! the deadline passes still wins.
//!
//! # Transitions
//!
//! | State | On step | Next |
//! |---|---|---|
//! | `Idle` | - | `CheckSavedCredentials` on `request_connect` |
//! | `CheckSavedCredentials` | load store | `Connect` / `CheckDefaultCredentials` |
//! | `CheckDefaultCredentials` | use compiled-in defaults | `Connect` / `Scan` |
//! | `Scan` | emit `Scan` | `Scanning` |
//! | `Scanning` | - | `ScanDone` on `ScanDone` |
//! | `ScanDone` | - | `Smartconfig` |
//! | `Smartconfig` | emit `Smartconfig` | `SmartconfigWaiting` |
//! | `SmartconfigWaiting` | - | `Connect` on `SmartconfigGotCredentials` |
//! | `Connect` | emit `Connect`, arm timeout | `Connecting` |
//! | `Connecting` | - | `Connected` on `Connected`, `GotIp` on `GotIp` |
//! | `Connected` | - | `GotIp` on `GotIp` |
//! | `GotIp` | disarm timeout | `Idle` |
//! | `LostIp` / `Disconnected` | disarm timeout | `CheckSavedCredentials` |
//!
//! `LostIp` and `Disconnected` are only accepted in `Idle`: a stale event
//! from an earlier cycle must not abort an attempt in flight.
//!
//! # Retry policy
//!
//! When the connect timer fires in `Connecting`/`Connected`, the machine
//! emits `Disconnect` and, while fewer than `max_retries` retries have been
//! spent on the current source, re-enters `Connect`. After that it falls
//! through to the next source: saved → `CheckDefaultCredentials`, default →
//! `Scan`. Smartconfig credentials have no further fallback; the machine
//! logs a warning and goes back to `Smartconfig` to ask the user again.

use embassy_time::{Duration, Instant};

use bus::{Notification, WifiCommand};
use platform::config::ConnectivityConfig;
use platform::{CredentialStore, Credentials, SoftTimer};

use crate::state::{ConnectivityState, CredentialSource};

/// Upper bound on transitions taken in one [`ConnectivityMachine::settle`].
///
/// The longest automatic chain (`LostIp` to `Scanning`) is four steps.
pub const MAX_STEPS_PER_TICK: usize = 8;

/// WiFi provisioning and connection state machine.
pub struct ConnectivityMachine<S: CredentialStore> {
    state: ConnectivityState,
    previous: ConnectivityState,
    source: Option<CredentialSource>,
    credentials: Option<Credentials>,
    retries: u8,
    max_retries: u8,
    default_credentials: Option<Credentials>,
    connect_timeout: Duration,
    connect_timer: SoftTimer,
    store: S,
}

impl<S: CredentialStore> ConnectivityMachine<S> {
    /// Machine in `Idle`, backed by `store`.
    pub fn new(store: S, config: ConnectivityConfig) -> Self {
        Self {
            state: ConnectivityState::Idle,
            previous: ConnectivityState::Idle,
            source: None,
            credentials: None,
            retries: 0,
            max_retries: config.max_retries,
            default_credentials: config.default_credentials,
            connect_timeout: config.connect_timeout,
            connect_timer: SoftTimer::new(),
            store,
        }
    }

    /// Current state.
    pub fn state(&self) -> ConnectivityState {
        self.state
    }

    /// State before the last transition.
    pub fn previous(&self) -> ConnectivityState {
        self.previous
    }

    /// Source of the credentials in flight.
    pub fn source(&self) -> Option<CredentialSource> {
        self.source
    }

    /// Credentials in flight.
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Retries spent on the current source.
    pub fn retries(&self) -> u8 {
        self.retries
    }

    /// Whether the connect timeout is pending.
    pub fn connect_timer_armed(&self) -> bool {
        self.connect_timer.is_armed()
    }

    /// Whether the machine needs an external input to move on.
    pub fn is_waiting(&self) -> bool {
        self.state.is_waiting()
    }

    /// The credential store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn set_state(&mut self, next: ConnectivityState) {
        self.previous = self.state;
        self.state = next;
        platform::info!("wifi: {} -> {}", self.previous.as_str(), next.as_str());
    }

    /// External Connect command. Accepted only in `Idle`.
    pub fn request_connect(&mut self) -> bool {
        if self.state == ConnectivityState::Idle {
            self.set_state(ConnectivityState::CheckSavedCredentials);
            true
        } else {
            platform::info!("wifi: connect ignored in {}", self.state.as_str());
            false
        }
    }

    /// Apply a driver notification. Returns whether it caused a transition.
    pub fn on_notification(&mut self, notification: &Notification) -> bool {
        use ConnectivityState as S;

        let next = match (self.state, notification) {
            (S::Scanning, Notification::ScanDone) => S::ScanDone,
            (S::SmartconfigWaiting, Notification::SmartconfigGotCredentials(c)) => {
                platform::info!("wifi: provisioned ssid {}", c.ssid.as_str());
                self.begin_attempt(c.clone(), CredentialSource::Smartconfig);
                return true;
            }
            (S::Connecting, Notification::Connected) => S::Connected,
            // Connected may have been dropped by a full queue.
            (S::Connecting | S::Connected, Notification::GotIp(_)) => S::GotIp,
            (S::Idle, Notification::LostIp) => S::LostIp,
            (S::Idle, Notification::Disconnected) => S::Disconnected,
            (state, n) => {
                platform::debug!("wifi: {} ignored in {}", n.as_str(), state.as_str());
                return false;
            }
        };
        self.set_state(next);
        true
    }

    /// Fire the connect timeout if its deadline has passed at `now`.
    ///
    /// Only `Connecting` and `Connected` have a deadline. Returns the
    /// `Disconnect` abandoning the attempt; the retry or fallback state is
    /// left for the next [`settle`](Self::settle).
    pub fn poll_timeout(&mut self, now: Instant) -> Option<WifiCommand> {
        use ConnectivityState as S;

        if matches!(self.state, S::Connecting | S::Connected) && self.connect_timer.poll(now) {
            Some(self.on_connect_timeout())
        } else {
            None
        }
    }

    /// Run the current state's action once.
    ///
    /// Returns the radio command to publish, if the action produced one.
    /// Never fires the connect timeout.
    pub fn step(&mut self, now: Instant) -> Option<WifiCommand> {
        use ConnectivityState as S;

        match self.state {
            S::Idle | S::Scanning | S::SmartconfigWaiting | S::Connecting | S::Connected => None,
            S::CheckSavedCredentials => {
                if let Some(c) = self.store.load() {
                    platform::info!("wifi: saved credentials found");
                    self.begin_attempt(c, CredentialSource::Saved);
                } else {
                    platform::info!("wifi: no saved credentials");
                    self.set_state(S::CheckDefaultCredentials);
                }
                None
            }
            S::CheckDefaultCredentials => {
                if let Some(c) = self.default_credentials.clone() {
                    platform::info!("wifi: default credentials found, ssid {}", c.ssid.as_str());
                    self.begin_attempt(c, CredentialSource::Default);
                } else {
                    platform::info!("wifi: no default credentials");
                    self.set_state(S::Scan);
                }
                None
            }
            S::Scan => {
                self.set_state(S::Scanning);
                Some(WifiCommand::Scan)
            }
            S::ScanDone => {
                self.set_state(S::Smartconfig);
                None
            }
            S::Smartconfig => {
                self.set_state(S::SmartconfigWaiting);
                Some(WifiCommand::Smartconfig)
            }
            S::Connect => {
                let Some(c) = self.credentials.clone() else {
                    platform::warn!("wifi: no credentials to connect with");
                    self.set_state(S::Scan);
                    return None;
                };
                self.connect_timer.arm_oneshot(now, self.connect_timeout);
                self.set_state(S::Connecting);
                Some(WifiCommand::Connect(c))
            }
            S::GotIp => {
                self.connect_timer.disarm();
                if self.source == Some(CredentialSource::Smartconfig) {
                    self.persist_credentials();
                }
                self.set_state(S::Idle);
                None
            }
            S::LostIp | S::Disconnected => {
                self.connect_timer.disarm();
                self.end_attempt();
                self.set_state(S::CheckSavedCredentials);
                None
            }
        }
    }

    /// Step until the machine waits for input, passing every command to
    /// `emit`. Always takes at least one step.
    pub fn settle<F: FnMut(WifiCommand)>(&mut self, now: Instant, mut emit: F) {
        for _ in 0..MAX_STEPS_PER_TICK {
            if let Some(cmd) = self.step(now) {
                emit(cmd);
            }
            if self.is_waiting() {
                return;
            }
        }
        platform::warn!("wifi: still in {} after step limit", self.state.as_str());
    }

    fn begin_attempt(&mut self, credentials: Credentials, source: CredentialSource) {
        self.credentials = Some(credentials);
        self.source = Some(source);
        self.retries = 0;
        self.set_state(ConnectivityState::Connect);
    }

    fn end_attempt(&mut self) {
        self.credentials = None;
        self.source = None;
        self.retries = 0;
    }

    fn on_connect_timeout(&mut self) -> WifiCommand {
        use ConnectivityState as S;

        if self.retries < self.max_retries {
            self.retries = self.retries.saturating_add(1);
            platform::warn!(
                "wifi: connect timeout, retry {} of {}",
                self.retries,
                self.max_retries
            );
            self.set_state(S::Connect);
        } else {
            let next = match self.source {
                Some(CredentialSource::Saved) => S::CheckDefaultCredentials,
                Some(CredentialSource::Default) => S::Scan,
                Some(CredentialSource::Smartconfig) | None => {
                    platform::warn!("wifi: provisioned credentials failed, provisioning again");
                    S::Smartconfig
                }
            };
            platform::warn!("wifi: connect timeout, retries exhausted");
            self.end_attempt();
            self.set_state(next);
        }
        WifiCommand::Disconnect
    }

    fn persist_credentials(&mut self) {
        let Some(c) = self.credentials.as_ref() else {
            return;
        };
        match self.store.save(c) {
            Ok(()) => platform::info!("wifi: provisioned credentials saved"),
            Err(e) => platform::warn!("wifi: could not save credentials: {}", e.as_str()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use platform::mocks::MemoryCredentialStore;

    fn config(defaults: Option<Credentials>) -> ConnectivityConfig {
        ConnectivityConfig {
            max_retries: 2,
            connect_timeout: Duration::from_secs(60),
            default_credentials: defaults,
        }
    }

    fn at(secs: u64) -> Instant {
        Instant::from_secs(secs)
    }

    fn settle(
        m: &mut ConnectivityMachine<MemoryCredentialStore>,
        now: Instant,
    ) -> Vec<WifiCommand> {
        let mut out = Vec::new();
        m.settle(now, |c| out.push(c));
        out
    }

    /// Check the deadline, then settle, as the task does at the end of a tick.
    fn expire(
        m: &mut ConnectivityMachine<MemoryCredentialStore>,
        now: Instant,
    ) -> Vec<WifiCommand> {
        let mut out: Vec<WifiCommand> = m.poll_timeout(now).into_iter().collect();
        m.settle(now, |c| out.push(c));
        out
    }

    #[test]
    fn test_starts_idle() {
        let m = ConnectivityMachine::new(MemoryCredentialStore::new(), config(None));
        assert_eq!(m.state(), ConnectivityState::Idle);
        assert!(m.source().is_none());
        assert!(!m.connect_timer_armed());
    }

    #[test]
    fn test_idle_does_nothing_without_connect() {
        let mut m = ConnectivityMachine::new(MemoryCredentialStore::new(), config(None));
        assert_eq!(m.step(at(0)), None);
        assert_eq!(m.state(), ConnectivityState::Idle);
    }

    #[test]
    fn test_connect_only_accepted_in_idle() {
        let mut m = ConnectivityMachine::new(MemoryCredentialStore::new(), config(None));
        assert!(m.request_connect());
        assert_eq!(m.state(), ConnectivityState::CheckSavedCredentials);
        assert!(!m.request_connect());
    }

    #[test]
    fn test_saved_credentials_connect_first() {
        let saved = Credentials::new("home", "pw");
        let mut m =
            ConnectivityMachine::new(MemoryCredentialStore::with(saved.clone()), config(None));
        m.request_connect();
        assert_eq!(settle(&mut m, at(0)), vec![WifiCommand::Connect(saved)]);
        assert_eq!(m.state(), ConnectivityState::Connecting);
        assert_eq!(m.source(), Some(CredentialSource::Saved));
        assert!(m.connect_timer_armed());
    }

    #[test]
    fn test_default_credentials_when_nothing_saved() {
        let default = Credentials::new("factory", "pw");
        let mut m =
            ConnectivityMachine::new(MemoryCredentialStore::new(), config(Some(default.clone())));
        m.request_connect();
        assert_eq!(settle(&mut m, at(0)), vec![WifiCommand::Connect(default)]);
        assert_eq!(m.source(), Some(CredentialSource::Default));
    }

    #[test]
    fn test_scan_then_smartconfig_without_credentials() {
        let mut m = ConnectivityMachine::new(MemoryCredentialStore::new(), config(None));
        m.request_connect();
        assert_eq!(settle(&mut m, at(0)), vec![WifiCommand::Scan]);
        assert_eq!(m.state(), ConnectivityState::Scanning);

        assert!(m.on_notification(&Notification::ScanDone));
        assert_eq!(settle(&mut m, at(1)), vec![WifiCommand::Smartconfig]);
        assert_eq!(m.state(), ConnectivityState::SmartconfigWaiting);
    }

    #[test]
    fn test_smartconfig_credentials_saved_after_got_ip() {
        let mut m = ConnectivityMachine::new(MemoryCredentialStore::new(), config(None));
        m.request_connect();
        settle(&mut m, at(0));
        m.on_notification(&Notification::ScanDone);
        settle(&mut m, at(1));

        let provisioned = Credentials::new("phone-ap", "pw");
        assert!(m.on_notification(&Notification::SmartconfigGotCredentials(
            provisioned.clone()
        )));
        assert_eq!(
            settle(&mut m, at(2)),
            vec![WifiCommand::Connect(provisioned.clone())]
        );
        assert!(m.store().saved().is_none());

        assert!(m.on_notification(&Notification::Connected));
        assert!(m.on_notification(&Notification::GotIp(platform::truncated("10.0.0.2"))));
        settle(&mut m, at(3));
        assert_eq!(m.state(), ConnectivityState::Idle);
        assert_eq!(m.store().saved(), Some(&provisioned));
    }

    #[test]
    fn test_save_failure_is_not_fatal() {
        let mut store = MemoryCredentialStore::new();
        store.fail_saves_with(platform::StorageError::Io);
        let mut m = ConnectivityMachine::new(store, config(None));
        m.request_connect();
        settle(&mut m, at(0));
        m.on_notification(&Notification::ScanDone);
        settle(&mut m, at(1));
        m.on_notification(&Notification::SmartconfigGotCredentials(Credentials::new("a", "b")));
        settle(&mut m, at(2));
        m.on_notification(&Notification::GotIp(platform::truncated("10.0.0.2")));
        settle(&mut m, at(3));
        assert_eq!(m.state(), ConnectivityState::Idle);
    }

    #[test]
    fn test_got_ip_disarms_timer_and_rests() {
        let mut m = ConnectivityMachine::new(
            MemoryCredentialStore::with(Credentials::new("home", "pw")),
            config(None),
        );
        m.request_connect();
        settle(&mut m, at(0));
        m.on_notification(&Notification::Connected);
        m.on_notification(&Notification::GotIp(platform::truncated("10.0.0.9")));
        settle(&mut m, at(1));
        assert_eq!(m.state(), ConnectivityState::Idle);
        assert_eq!(m.previous(), ConnectivityState::GotIp);
        assert!(!m.connect_timer_armed());
        // The old deadline passing later changes nothing.
        assert_eq!(m.poll_timeout(at(120)), None);
        assert_eq!(m.state(), ConnectivityState::Idle);
    }

    #[test]
    fn test_got_ip_accepted_without_connected() {
        let mut m = ConnectivityMachine::new(
            MemoryCredentialStore::with(Credentials::new("home", "pw")),
            config(None),
        );
        m.request_connect();
        settle(&mut m, at(0));
        assert!(m.on_notification(&Notification::GotIp(platform::truncated("10.0.0.9"))));
        assert_eq!(m.state(), ConnectivityState::GotIp);
    }

    #[test]
    fn test_lost_ip_ignored_while_connecting() {
        let mut m = ConnectivityMachine::new(
            MemoryCredentialStore::with(Credentials::new("home", "pw")),
            config(None),
        );
        m.request_connect();
        settle(&mut m, at(0));
        assert_eq!(m.state(), ConnectivityState::Connecting);

        assert!(!m.on_notification(&Notification::LostIp));
        assert!(!m.on_notification(&Notification::Disconnected));
        assert_eq!(m.state(), ConnectivityState::Connecting);
    }

    #[test]
    fn test_lost_ip_in_idle_restarts_chain() {
        let saved = Credentials::new("home", "pw");
        let mut m =
            ConnectivityMachine::new(MemoryCredentialStore::with(saved.clone()), config(None));
        m.request_connect();
        settle(&mut m, at(0));
        m.on_notification(&Notification::GotIp(platform::truncated("10.0.0.9")));
        settle(&mut m, at(1));

        assert!(m.on_notification(&Notification::LostIp));
        assert_eq!(m.state(), ConnectivityState::LostIp);
        assert_eq!(settle(&mut m, at(2)), vec![WifiCommand::Connect(saved)]);
        assert_eq!(m.state(), ConnectivityState::Connecting);
    }

    #[test]
    fn test_timeout_retries_then_falls_back_to_defaults() {
        let saved = Credentials::new("home", "pw");
        let mut m = ConnectivityMachine::new(
            MemoryCredentialStore::with(saved.clone()),
            config(Some(Credentials::new("factory", "pw"))),
        );
        m.request_connect();
        settle(&mut m, at(0));

        // Two retries re-enter Connect with the same credentials.
        assert_eq!(
            expire(&mut m, at(60)),
            vec![WifiCommand::Disconnect, WifiCommand::Connect(saved.clone())]
        );
        assert_eq!(m.retries(), 1);
        assert_eq!(
            expire(&mut m, at(120)),
            vec![WifiCommand::Disconnect, WifiCommand::Connect(saved)]
        );
        assert_eq!(m.retries(), 2);

        // The third firing exhausts the budget.
        assert_eq!(m.poll_timeout(at(180)), Some(WifiCommand::Disconnect));
        assert_eq!(m.state(), ConnectivityState::CheckDefaultCredentials);
        assert!(m.source().is_none());
    }

    #[test]
    fn test_default_exhaustion_falls_back_to_scan() {
        let mut m = ConnectivityMachine::new(
            MemoryCredentialStore::new(),
            config(Some(Credentials::new("factory", "pw"))),
        );
        m.request_connect();
        settle(&mut m, at(0));
        expire(&mut m, at(60));
        expire(&mut m, at(120));
        assert_eq!(
            expire(&mut m, at(180)),
            vec![WifiCommand::Disconnect, WifiCommand::Scan]
        );
        assert_eq!(m.state(), ConnectivityState::Scanning);
    }

    #[test]
    fn test_smartconfig_exhaustion_provisions_again() {
        let mut m = ConnectivityMachine::new(MemoryCredentialStore::new(), config(None));
        m.request_connect();
        settle(&mut m, at(0));
        m.on_notification(&Notification::ScanDone);
        settle(&mut m, at(0));
        m.on_notification(&Notification::SmartconfigGotCredentials(Credentials::new("x", "y")));
        settle(&mut m, at(0));
        expire(&mut m, at(60));
        expire(&mut m, at(120));
        assert_eq!(
            expire(&mut m, at(180)),
            vec![WifiCommand::Disconnect, WifiCommand::Smartconfig]
        );
        assert_eq!(m.state(), ConnectivityState::SmartconfigWaiting);
        assert!(m.store().saved().is_none());
    }

    #[test]
    fn test_timer_not_polled_before_deadline() {
        let mut m = ConnectivityMachine::new(
            MemoryCredentialStore::with(Credentials::new("home", "pw")),
            config(None),
        );
        m.request_connect();
        settle(&mut m, at(0));
        assert!(expire(&mut m, at(59)).is_empty());
        assert_eq!(m.state(), ConnectivityState::Connecting);
    }

    #[test]
    fn test_step_leaves_the_deadline_to_poll_timeout() {
        let mut m = ConnectivityMachine::new(
            MemoryCredentialStore::with(Credentials::new("home", "pw")),
            config(None),
        );
        m.request_connect();
        settle(&mut m, at(0));

        assert!(settle(&mut m, at(60)).is_empty());
        assert_eq!(m.state(), ConnectivityState::Connecting);
        assert!(m.connect_timer_armed());

        // The link came up in time: the expired deadline no longer applies.
        m.on_notification(&Notification::GotIp(platform::truncated("10.0.0.9")));
        settle(&mut m, at(60));
        assert_eq!(m.poll_timeout(at(60)), None);
        assert_eq!(m.state(), ConnectivityState::Idle);
        assert_eq!(m.retries(), 0);
    }
}
