//! Connectivity task: feeds the connectivity machine from its endpoint and
//! publishes the radio commands it emits.

use embassy_time::{Instant, Timer};

use bus::{Command, Endpoint, Message, MessageSink};
use connectivity::ConnectivityMachine;
use platform::config::TASK_TICK;
use platform::CredentialStore;

/// Owns the connectivity machine.
pub struct ConnectivityTask<'a, S: CredentialStore, const N: usize> {
    machine: ConnectivityMachine<S>,
    inbox: &'a Endpoint<N>,
    driver: &'a dyn MessageSink,
}

impl<'a, S: CredentialStore, const N: usize> ConnectivityTask<'a, S, N> {
    /// Task reading `inbox` and commanding the radio through `driver`.
    pub fn new(
        machine: ConnectivityMachine<S>,
        inbox: &'a Endpoint<N>,
        driver: &'a dyn MessageSink,
    ) -> Self {
        Self {
            machine,
            inbox,
            driver,
        }
    }

    /// The machine, for inspection.
    pub fn machine(&self) -> &ConnectivityMachine<S> {
        &self.machine
    }

    /// One loop iteration at time `now`.
    ///
    /// The machine is settled before the first message and after each one,
    /// so every message meets it in a wait state. The connect deadline is
    /// checked last: a link that came up before it passed is already applied.
    pub fn tick(&mut self, now: Instant) {
        self.settle(now);
        while let Some(message) = self.inbox.try_dequeue() {
            match message {
                Message::Command(Command::Connect) => {
                    self.machine.request_connect();
                }
                Message::Notification(notification) => {
                    self.machine.on_notification(&notification);
                }
                other => platform::warn!("wifi: unexpected {}", other.as_str()),
            }
            self.settle(now);
        }
        if let Some(command) = self.machine.poll_timeout(now) {
            self.driver.publish(Message::from(command));
            self.settle(now);
        }
    }

    fn settle(&mut self, now: Instant) {
        let driver = self.driver;
        self.machine.settle(now, |command| {
            driver.publish(Message::from(command));
        });
    }

    /// Task loop.
    pub async fn run(mut self) {
        loop {
            self.tick(Instant::now());
            Timer::after(TASK_TICK).await;
        }
    }
}
