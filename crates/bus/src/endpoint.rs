//! Bounded bus endpoints.
//!
//! # Architecture
//!
//! An [`Endpoint`] is a small static FIFO owned by exactly one consuming
//! task. Producers only hold `&'static` references (directly or through the
//! [`MessageSink`] trait object kept by a fan-out registry).
//!
//! # Overflow handling
//!
//! [`Endpoint::publish`] never blocks. If the consumer stalls and the queue
//! reaches capacity, the newest message is dropped and a warning is logged.
//! Endpoints carry control events, not data, so a full queue means a stuck
//! consumer; growing the queue would only hide that.

use core::task::{Context, Poll};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use embassy_time::{with_timeout, Duration};

use crate::message::Message;

// CriticalSectionRawMutex: publish() is called from interrupt-driven driver
// callbacks as well as from tasks. Each queue operation is a short copy of one
// message, so the critical section stays brief.

/// Bounded FIFO of [`Message`]s with capacity `N`.
pub struct Endpoint<const N: usize> {
    name: &'static str,
    channel: Channel<CriticalSectionRawMutex, Message, N>,
}

impl<const N: usize> Endpoint<N> {
    /// Number of messages the endpoint holds before dropping.
    pub const CAPACITY: usize = N;

    /// Empty endpoint; `name` identifies it in logs.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            channel: Channel::new(),
        }
    }

    /// Name used in logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Enqueue without blocking.
    ///
    /// Returns `false` and logs a warning when the endpoint is full; the
    /// message is dropped. Safe to call from interrupt context.
    pub fn publish(&self, message: Message) -> bool {
        let opcode = message.opcode();
        match self.channel.try_send(message) {
            Ok(()) => true,
            Err(_) => {
                platform::warn!("{} queue full, dropped opcode {}", self.name, opcode);
                false
            }
        }
    }

    /// Enqueue, waiting at most `max_wait` for space.
    ///
    /// A zero `max_wait` is the same as [`publish`](Self::publish). Task
    /// context only.
    pub async fn publish_within(&self, message: Message, max_wait: Duration) -> bool {
        if max_wait.as_ticks() == 0 {
            return self.publish(message);
        }
        let opcode = message.opcode();
        let sent = with_timeout(max_wait, self.channel.send(message)).await;
        if sent.is_ok() {
            true
        } else {
            platform::warn!(
                "{} queue full after wait, dropped opcode {}",
                self.name,
                opcode
            );
            false
        }
    }

    /// Oldest message, if any, without blocking.
    pub fn try_dequeue(&self) -> Option<Message> {
        // Empty is the only error: endpoints never close.
        self.channel.try_receive().ok()
    }

    /// Oldest message, waiting until one arrives.
    pub async fn dequeue(&self) -> Message {
        self.channel.receive().await
    }
}

/// Producer-side handle to an endpoint of any capacity.
pub trait MessageSink {
    /// Endpoint name for logs.
    fn name(&self) -> &'static str;

    /// Enqueue without blocking; `false` if the message was dropped.
    fn publish(&self, message: Message) -> bool;

    /// Enqueue without blocking or logging; a full queue hands the message back.
    fn try_publish(&self, message: Message) -> Result<(), Message>;

    /// Ready once the queue has room; registers `cx` for wake-up otherwise.
    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<()>;
}

impl<const N: usize> MessageSink for Endpoint<N> {
    fn name(&self) -> &'static str {
        Endpoint::name(self)
    }

    fn publish(&self, message: Message) -> bool {
        Endpoint::publish(self, message)
    }

    fn try_publish(&self, message: Message) -> Result<(), Message> {
        self.channel
            .try_send(message)
            .map_err(|TrySendError::Full(m)| m)
    }

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<()> {
        self.channel.poll_ready_to_send(cx)
    }
}
