//! Notification fan-out registry.
//!
//! A publisher owns one [`FanOut`] and registers its subscribers' endpoints
//! while the system is being wired. Registration takes `&mut self`, so once
//! the owning task runs the target list can no longer change.
//!
//! Delivery is at-most-once and best-effort per target: a full subscriber
//! queue costs that subscriber one update and nothing else. There is no
//! retry and no rollback of targets that did accept.
//!
//! [`FanOut::broadcast`] never waits and is the one driver callbacks use.
//! Task context may use [`FanOut::broadcast_within`] to give each full
//! subscriber a bounded time to make room.

use core::future::poll_fn;

use embassy_time::{with_timeout, Duration};
use heapless::Vec;

use crate::endpoint::MessageSink;
use crate::message::Message;

/// Up to `MAX` subscriber endpoints of one publisher.
pub struct FanOut<'a, const MAX: usize> {
    owner: &'static str,
    targets: Vec<&'a dyn MessageSink, MAX>,
}

impl<'a, const MAX: usize> FanOut<'a, MAX> {
    /// Empty registry; `owner` names the publisher in logs.
    pub const fn new(owner: &'static str) -> Self {
        Self {
            owner,
            targets: Vec::new(),
        }
    }

    /// Register a subscriber.
    ///
    /// Returns `false` once `MAX` targets are registered.
    pub fn add_target(&mut self, target: &'a dyn MessageSink) -> bool {
        if self.targets.push(target).is_ok() {
            platform::debug!("{}: added target {}", self.owner, target.name());
            true
        } else {
            platform::warn!(
                "{}: target limit reached, {} not added",
                self.owner,
                target.name()
            );
            false
        }
    }

    /// Number of registered targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether no target is registered.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Copy `message` into every target.
    ///
    /// Returns how many targets accepted it. Each failed target is logged
    /// and skipped; the remaining targets are still tried.
    pub fn broadcast(&self, message: &Message) -> usize {
        let mut delivered: usize = 0;
        for target in &self.targets {
            if target.publish(message.clone()) {
                delivered = delivered.saturating_add(1);
            } else {
                platform::warn!(
                    "{}: {} not delivered to {}",
                    self.owner,
                    message.as_str(),
                    target.name()
                );
            }
        }
        delivered
    }

    /// Copy `message` into every target, waiting up to `max_wait` per full
    /// target.
    ///
    /// Targets are served in registration order, so a slow subscriber
    /// delays the ones after it by at most `max_wait` each. A zero
    /// `max_wait` is the same as [`broadcast`](Self::broadcast). Task
    /// context only.
    pub async fn broadcast_within(&self, message: &Message, max_wait: Duration) -> usize {
        if max_wait.as_ticks() == 0 {
            return self.broadcast(message);
        }
        let mut delivered: usize = 0;
        for target in &self.targets {
            let send = deliver(*target, message.clone());
            if with_timeout(max_wait, send).await.is_ok() {
                delivered = delivered.saturating_add(1);
            } else {
                platform::warn!(
                    "{}: {} not delivered to {} after wait",
                    self.owner,
                    message.as_str(),
                    target.name()
                );
            }
        }
        delivered
    }
}

/// Wait for room in `target`, then enqueue. Another producer can take the
/// freed slot first, so readiness is re-checked until the send succeeds.
async fn deliver(target: &dyn MessageSink, message: Message) {
    let mut pending = message;
    loop {
        poll_fn(|cx| target.poll_ready(cx)).await;
        match target.try_publish(pending) {
            Ok(()) => return,
            Err(back) => pending = back,
        }
    }
}
