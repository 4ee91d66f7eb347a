//! Property tests for endpoint capacity and ordering.
//!
//! Run with: cargo test -p bus --test endpoint_proptest
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing
)]

use bus::{Endpoint, Message, Notification};
use proptest::prelude::*;

fn notification(tag: u8) -> Message {
    match tag % 5 {
        0 => Notification::ScanDone,
        1 => Notification::Connected,
        2 => Notification::LostIp,
        3 => Notification::Disconnected,
        _ => Notification::GotIp(platform::truncated("10.1.2.3")),
    }
    .into()
}

proptest! {
    /// Interleaved publish/dequeue never holds more than N messages and
    /// dequeues exactly the accepted messages, in order.
    #[test]
    fn endpoint_behaves_like_bounded_fifo(ops in proptest::collection::vec(any::<(bool, u8)>(), 0..64)) {
        let ep: Endpoint<3> = Endpoint::new("prop");
        let mut model: std::collections::VecDeque<Message> = std::collections::VecDeque::new();

        for (is_publish, tag) in ops {
            if is_publish {
                let msg = notification(tag);
                let accepted = ep.publish(msg.clone());
                prop_assert_eq!(accepted, model.len() < 3);
                if accepted {
                    model.push_back(msg);
                }
            } else {
                prop_assert_eq!(ep.try_dequeue(), model.pop_front());
            }
        }

        while let Some(expected) = model.pop_front() {
            prop_assert_eq!(ep.try_dequeue(), Some(expected));
        }
        prop_assert!(ep.try_dequeue().is_none());
    }
}
