//! Property tests for the connectivity state machine.
//!
//! Random interleavings of commands, driver notifications and clock jumps
//! must keep the machine inside its declared behaviour: every settle ends in
//! a wait state, the retry counter stays within budget, and the connect timer
//! is only pending while an attempt is in flight.
//!
//! Run with: cargo test -p connectivity --test state_proptest
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing
)]

use connectivity::{ConnectivityMachine, ConnectivityState, CredentialSource};
use embassy_time::{Duration, Instant};
use platform::config::ConnectivityConfig;
use platform::mocks::MemoryCredentialStore;
use platform::Credentials;
use proptest::prelude::*;

use bus::Notification;

const MAX_RETRIES: u8 = 2;

#[derive(Debug, Clone)]
enum Input {
    Connect,
    Notify(u8),
    Advance(u64),
}

fn input() -> impl Strategy<Value = Input> {
    prop_oneof![
        Just(Input::Connect),
        (0u8..7).prop_map(Input::Notify),
        (0u64..90).prop_map(Input::Advance),
    ]
}

fn notification(tag: u8) -> Notification {
    match tag {
        0 => Notification::ScanDone,
        1 => Notification::Connected,
        2 => Notification::GotIp(platform::truncated("10.0.0.3")),
        3 => Notification::LostIp,
        4 => Notification::Disconnected,
        _ => Notification::SmartconfigGotCredentials(Credentials::new("phone", "pw")),
    }
}

fn machine(saved: bool, defaults: bool) -> ConnectivityMachine<MemoryCredentialStore> {
    let store = if saved {
        MemoryCredentialStore::with(Credentials::new("home", "pw"))
    } else {
        MemoryCredentialStore::new()
    };
    ConnectivityMachine::new(
        store,
        ConnectivityConfig {
            max_retries: MAX_RETRIES,
            connect_timeout: Duration::from_secs(60),
            default_credentials: defaults.then(|| Credentials::new("factory", "pw")),
        },
    )
}

proptest! {
    #[test]
    fn machine_invariants_hold(
        saved in any::<bool>(),
        defaults in any::<bool>(),
        inputs in proptest::collection::vec(input(), 0..80),
    ) {
        let mut m = machine(saved, defaults);
        let mut now = Instant::from_secs(0);

        for i in inputs {
            match i {
                Input::Connect => {
                    let was_idle = m.state() == ConnectivityState::Idle;
                    prop_assert_eq!(m.request_connect(), was_idle);
                }
                Input::Notify(tag) => {
                    let before = m.state();
                    let n = notification(tag);
                    let moved = m.on_notification(&n);
                    if matches!(n, Notification::LostIp | Notification::Disconnected) {
                        prop_assert_eq!(moved, before == ConnectivityState::Idle);
                    }
                    if !moved {
                        prop_assert_eq!(m.state(), before);
                    }
                }
                Input::Advance(secs) => {
                    now = now.checked_add(Duration::from_secs(secs)).unwrap();
                }
            }

            m.settle(now, |_| {});
            if m.poll_timeout(now).is_some() {
                m.settle(now, |_| {});
            }

            prop_assert!(m.is_waiting(), "settled in {}", m.state().as_str());
            prop_assert!(ConnectivityState::ALL.contains(&m.state()));
            prop_assert!(m.retries() <= MAX_RETRIES);
            if m.connect_timer_armed() {
                prop_assert!(matches!(
                    m.state(),
                    ConnectivityState::Connecting | ConnectivityState::Connected
                ));
            }
            if m.credentials().is_some() {
                prop_assert!(m.source().is_some());
            }
            if m.state() == ConnectivityState::SmartconfigWaiting {
                prop_assert_ne!(m.source(), Some(CredentialSource::Saved));
            }
        }
    }
}

#[test]
fn test_exactly_max_retry_plus_one_timeouts_reach_default_check() {
    let mut m = machine(true, true);
    m.request_connect();
    m.settle(Instant::from_secs(0), |_| {});
    assert_eq!(m.source(), Some(CredentialSource::Saved));

    let mut connects = 1;
    for firing in 1..=u64::from(MAX_RETRIES) + 1 {
        let now = Instant::from_secs(60 * firing);
        let _ = m.poll_timeout(now);
        if m.state() == ConnectivityState::Connect {
            connects += 1;
            m.step(now);
        }
    }

    assert_eq!(m.state(), ConnectivityState::CheckDefaultCredentials);
    assert_eq!(connects, usize::from(MAX_RETRIES) + 1);
}
