//! Login state publish/subscribe
//!
//! Each subscriber owns an unbounded channel. The current value is queued
//! at subscription time under the same lock as `publish`, so a subscriber
//! never misses or duplicates a change and sees values in publish order.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};

use futures_util::Stream;
use parking_lot::Mutex;
use tokio::sync::mpsc;

struct HubInner {
    current: bool,
    next_id: u64,
    subscribers: HashMap<u64, mpsc::UnboundedSender<bool>>,
}

/// Replay-latest multicast channel for the login flag
pub struct LoginStateHub {
    inner: Arc<Mutex<HubInner>>,
}

impl LoginStateHub {
    pub fn new(initial: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HubInner {
                current: initial,
                next_id: 0,
                subscribers: HashMap::new(),
            })),
        }
    }

    pub fn current(&self) -> bool {
        self.inner.lock().current
    }

    /// Set the flag and deliver it to every live subscriber
    pub fn publish(&self, value: bool) {
        let mut inner = self.inner.lock();
        inner.current = value;
        inner.subscribers.retain(|_, tx| tx.send(value).is_ok());

        tracing::debug!(
            logged_in = value,
            subscribers = inner.subscribers.len(),
            "Published login state"
        );
    }

    pub fn subscribe(&self) -> LoginStateSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock();

        // Receiver is alive, send cannot fail
        let _ = tx.send(inner.current);

        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.insert(id, tx);

        LoginStateSubscription {
            id,
            rx,
            hub: Arc::downgrade(&self.inner),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }
}

impl Clone for LoginStateHub {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Handle on the login state stream.
///
/// Yields the value current at subscription time, then every later change.
/// Ends once the hub is gone. Dropping the handle unsubscribes.
pub struct LoginStateSubscription {
    id: u64,
    rx: mpsc::UnboundedReceiver<bool>,
    hub: Weak<Mutex<HubInner>>,
}

impl LoginStateSubscription {
    pub async fn recv(&mut self) -> Option<bool> {
        self.rx.recv().await
    }

    /// Next queued value, without waiting
    pub fn try_recv(&mut self) -> Option<bool> {
        self.rx.try_recv().ok()
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Stream for LoginStateSubscription {
    type Item = bool;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<bool>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

impl Drop for LoginStateSubscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.lock().subscribers.remove(&self.id);
        }
    }
}

impl std::fmt::Debug for LoginStateSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginStateSubscription")
            .field("id", &self.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[test]
    fn test_subscriber_gets_current_value_first() {
        let hub = LoginStateHub::new(true);
        let mut sub = hub.subscribe();

        assert_eq!(sub.try_recv(), Some(true));
        assert_eq!(sub.try_recv(), None);
    }

    #[test]
    fn test_every_change_delivered_in_order() {
        let hub = LoginStateHub::new(false);
        let mut sub = hub.subscribe();

        hub.publish(true);
        hub.publish(false);
        hub.publish(false);

        let received: Vec<bool> = std::iter::from_fn(|| sub.try_recv()).collect();
        assert_eq!(received, vec![false, true, false, false]);
    }

    #[test]
    fn test_late_subscriber_sees_latest_only() {
        let hub = LoginStateHub::new(false);
        hub.publish(true);

        let mut late = hub.subscribe();
        assert_eq!(late.try_recv(), Some(true));
        assert_eq!(late.try_recv(), None);
    }

    #[test]
    fn test_unsubscribe_removes_subscriber() {
        let hub = LoginStateHub::new(false);
        let first = hub.subscribe();
        let second = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 2);

        first.unsubscribe();
        assert_eq!(hub.subscriber_count(), 1);

        drop(second);
        assert_eq!(hub.subscriber_count(), 0);

        // Publishing with nobody listening is fine
        hub.publish(true);
        assert!(hub.current());
    }

    #[tokio::test]
    async fn test_stream_ends_when_hub_dropped() {
        let hub = LoginStateHub::new(false);
        let sub = hub.subscribe();
        hub.publish(true);
        drop(hub);

        let received: Vec<bool> = sub.collect().await;
        assert_eq!(received, vec![false, true]);
    }

    #[tokio::test]
    async fn test_recv_waits_for_publish() {
        let hub = LoginStateHub::new(false);
        let mut sub = hub.subscribe();
        assert_eq!(sub.recv().await, Some(false));

        let publisher = hub.clone();
        tokio::spawn(async move {
            publisher.publish(true);
        });

        assert_eq!(sub.recv().await, Some(true));
    }
}
