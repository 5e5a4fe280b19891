//! Event Channel - Topic-based publish/subscribe between unrelated components.
//!
//! The channel is an ordinary value: the root of the tree creates one and
//! hands clones to whichever components publish or subscribe. Clones share
//! the same subscriber registry.
//!
//! # Dispatch Rules
//!
//! - Handlers for a topic run synchronously, in subscription order.
//! - The subscriber list is snapshotted when a publish starts, so handlers
//!   may subscribe or unsubscribe without disturbing the traversal.
//! - A handler that returns `Err` or panics is recorded as a
//!   [`DispatchFailure`] and skipped; the remaining handlers still run and
//!   the publisher never sees the failure.
//! - Publishing to a topic with no subscribers does nothing.
//!
//! # Example
//!
//! ```ignore
//! use spark_storefront::state::EventChannel;
//! use serde_json::json;
//!
//! let channel = EventChannel::new();
//! let handle = channel.subscribe("review-submitted", |payload| {
//!     println!("got {payload}");
//!     Ok(())
//! });
//!
//! channel.publish("review-submitted", &json!({ "name": "Ada" }));
//! channel.unsubscribe(handle);
//! ```

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, warn};

// =============================================================================
// TYPES
// =============================================================================

/// Subscriber callback. Errors are isolated, never propagated.
pub type ChannelHandler = Rc<dyn Fn(&Value) -> anyhow::Result<()>>;

/// Returned by [`EventChannel::subscribe`]; pass back to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionHandle(u64);

impl fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// A handler that failed during a publish.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchFailure {
    pub topic: String,
    pub subscription: SubscriptionHandle,
    pub reason: String,
}

// =============================================================================
// REGISTRY
// =============================================================================

#[derive(Default)]
struct ChannelRegistry {
    topics: HashMap<String, Vec<(SubscriptionHandle, ChannelHandler)>>,
    failures: Vec<DispatchFailure>,
    next_id: u64,
}

impl ChannelRegistry {
    fn next_handle(&mut self) -> SubscriptionHandle {
        let handle = SubscriptionHandle(self.next_id);
        self.next_id += 1;
        handle
    }
}

// =============================================================================
// EVENT CHANNEL
// =============================================================================

#[derive(Clone, Default)]
pub struct EventChannel {
    registry: Rc<RefCell<ChannelRegistry>>,
}

impl fmt::Debug for EventChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reg = self.registry.borrow();
        let mut topics: Vec<_> = reg.topics.iter().map(|(t, h)| (t.as_str(), h.len())).collect();
        topics.sort_unstable();
        f.debug_struct("EventChannel")
            .field("topics", &topics)
            .field("failures", &reg.failures.len())
            .finish()
    }
}

impl EventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `handler` to the end of `topic`'s subscriber list.
    pub fn subscribe<F>(&self, topic: &str, handler: F) -> SubscriptionHandle
    where
        F: Fn(&Value) -> anyhow::Result<()> + 'static,
    {
        let mut reg = self.registry.borrow_mut();
        let handle = reg.next_handle();
        reg.topics
            .entry(topic.to_string())
            .or_default()
            .push((handle, Rc::new(handler)));
        debug!(topic, subscription = %handle, "subscribed");
        handle
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        let mut reg = self.registry.borrow_mut();
        let mut removed = false;
        reg.topics.retain(|_, handlers| {
            let before = handlers.len();
            handlers.retain(|(id, _)| *id != handle);
            removed |= handlers.len() != before;
            !handlers.is_empty()
        });
        if removed {
            debug!(subscription = %handle, "unsubscribed");
        }
        removed
    }

    /// Deliver `payload` to every current subscriber of `topic`.
    ///
    /// Returns how many handlers completed without failing.
    pub fn publish(&self, topic: &str, payload: &Value) -> usize {
        let handlers: Vec<(SubscriptionHandle, ChannelHandler)> = {
            let reg = self.registry.borrow();
            match reg.topics.get(topic) {
                Some(handlers) => handlers.clone(),
                None => return 0,
            }
        };

        debug!(topic, subscribers = handlers.len(), "publish");

        let mut delivered = 0;
        for (handle, handler) in handlers {
            let outcome = catch_unwind(AssertUnwindSafe(|| handler(payload)));
            let reason = match outcome {
                Ok(Ok(())) => {
                    delivered += 1;
                    continue;
                }
                Ok(Err(err)) => format!("{err:#}"),
                Err(panic) => panic_message(panic.as_ref()),
            };

            warn!(topic, subscription = %handle, %reason, "subscriber failed");
            self.registry.borrow_mut().failures.push(DispatchFailure {
                topic: topic.to_string(),
                subscription: handle,
                reason,
            });
        }
        delivered
    }

    /// Live subscriptions on `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.registry
            .borrow()
            .topics
            .get(topic)
            .map_or(0, Vec::len)
    }

    /// Failures recorded so far, oldest first.
    pub fn failures(&self) -> Vec<DispatchFailure> {
        self.registry.borrow().failures.clone()
    }

    /// Drain the failure log.
    pub fn take_failures(&self) -> Vec<DispatchFailure> {
        std::mem::take(&mut self.registry.borrow_mut().failures)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        format!("panicked: {msg}")
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        format!("panicked: {msg}")
    } else {
        "panicked".to_string()
    }
}

// =============================================================================
// TESTS
// =============================================================================
