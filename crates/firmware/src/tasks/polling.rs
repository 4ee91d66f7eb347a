//! Polling task: runs the refresh cycle against a data source.

use embassy_time::{with_timeout, Duration, Instant, Timer};

use bus::{Endpoint, FanOut, Message};
use platform::config::{PollingConfig, POLLING_NOTIFY_TARGETS, TASK_TICK};
use platform::{DataSource, FetchError};
use polling::{FetchRequest, PollingMachine};

/// Owns the polling machine and the data source.
pub struct PollingTask<'a, D: DataSource, const N: usize> {
    machine: PollingMachine,
    source: D,
    inbox: &'a Endpoint<N>,
    notify: FanOut<'a, POLLING_NOTIFY_TARGETS>,
    fetch_timeout: Duration,
}

impl<'a, D: DataSource, const N: usize> PollingTask<'a, D, N> {
    /// Task fetching from `source`; updates go to `notify`.
    pub fn new(
        source: D,
        inbox: &'a Endpoint<N>,
        notify: FanOut<'a, POLLING_NOTIFY_TARGETS>,
        config: PollingConfig,
    ) -> Self {
        let fetch_timeout = config.fetch_timeout;
        Self {
            machine: PollingMachine::new(config),
            source,
            inbox,
            notify,
            fetch_timeout,
        }
    }

    /// The machine, for inspection.
    pub fn machine(&self) -> &PollingMachine {
        &self.machine
    }

    /// The data source, for inspection.
    pub fn source(&self) -> &D {
        &self.source
    }

    /// One loop iteration at time `now`: apply connectivity notifications,
    /// check the timer, and run any due lookups to completion.
    pub async fn tick(&mut self, now: Instant) {
        while let Some(message) = self.inbox.try_dequeue() {
            match message {
                Message::Notification(notification) => {
                    self.machine.on_notification(&notification, now);
                }
                other => platform::warn!("api: unexpected {}", other.as_str()),
            }
        }
        self.machine.poll_timer(now);

        while let Some(request) = self.machine.pending_fetch() {
            let notification = match request {
                FetchRequest::Time => {
                    let result = bounded(self.fetch_timeout, self.source.fetch_time()).await;
                    self.machine.complete_time(result)
                }
                FetchRequest::Weather => {
                    let result = bounded(self.fetch_timeout, self.source.fetch_weather()).await;
                    self.machine.complete_weather(result)
                }
            };
            self.notify.broadcast(&Message::Notification(notification));
        }
    }

    /// Task loop.
    pub async fn run(mut self) {
        loop {
            self.tick(Instant::now()).await;
            Timer::after(TASK_TICK).await;
        }
    }
}

async fn bounded<T>(
    limit: Duration,
    fetch: impl core::future::Future<Output = Result<T, FetchError>>,
) -> Result<T, FetchError> {
    match with_timeout(limit, fetch).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout),
    }
}
