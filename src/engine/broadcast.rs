//! Multi-subscriber broadcast with optional replay of the latest value.
//!
//! A [`Broadcaster`] keeps the current value and a list of subscriber
//! channels. Every subscriber sees every value published after it subscribed;
//! nothing is coalesced for slow readers. Dropping a [`Subscription`] closes
//! its channel, and the next publish prunes it.

use futures_util::Stream;
use std::pin::Pin;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use tokio::sync::mpsc;

struct Inner<T> {
    latest: Option<T>,
    subscribers: Vec<mpsc::UnboundedSender<T>>,
}

/// Observer registry for one output stream.
pub struct Broadcaster<T> {
    inner: Mutex<Inner<T>>,
    replay_latest: bool,
    distinct: bool,
}

impl<T: Clone + PartialEq> Broadcaster<T> {
    /// Stream that hands new subscribers `initial` (or the latest value) and
    /// never emits the same value twice in a row.
    #[must_use]
    pub fn replaying(initial: T) -> Self {
        Self {
            inner: Mutex::new(Inner {
                latest: Some(initial),
                subscribers: Vec::new(),
            }),
            replay_latest: true,
            distinct: true,
        }
    }

    /// Stream without replay or de-duplication; subscribers only see values
    /// published after they subscribed.
    #[must_use]
    pub fn transient() -> Self {
        Self {
            inner: Mutex::new(Inner {
                latest: None,
                subscribers: Vec::new(),
            }),
            replay_latest: false,
            distinct: false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a subscriber.
    pub fn subscribe(&self) -> Subscription<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.lock();
        if self.replay_latest {
            if let Some(latest) = &inner.latest {
                let _ = tx.send(latest.clone());
            }
        }
        inner.subscribers.push(tx);
        Subscription { rx }
    }

    /// Sends `value` to every live subscriber.
    ///
    /// Returns `false` when the value was suppressed as a repeat of the
    /// latest one.
    pub fn publish(&self, value: T) -> bool {
        let mut inner = self.lock();
        if self.distinct && inner.latest.as_ref() == Some(&value) {
            return false;
        }

        inner.subscribers.retain(|tx| tx.send(value.clone()).is_ok());
        inner.latest = Some(value);
        true
    }

    /// Most recently published value.
    pub fn latest(&self) -> Option<T> {
        self.lock().latest.clone()
    }

    /// Number of subscribers still attached.
    pub fn subscriber_count(&self) -> usize {
        let mut inner = self.lock();
        inner.subscribers.retain(|tx| !tx.is_closed());
        inner.subscribers.len()
    }
}

impl<T> std::fmt::Debug for Broadcaster<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcaster")
            .field("replay_latest", &self.replay_latest)
            .field("distinct", &self.distinct)
            .finish_non_exhaustive()
    }
}

/// Receiving end of a [`Broadcaster`].
///
/// Implements [`Stream`]; it ends once the broadcaster is dropped and all
/// buffered values have been read.
#[derive(Debug)]
pub struct Subscription<T> {
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> Subscription<T> {
    /// Waits for the next value.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Returns a buffered value without waiting.
    pub fn try_recv(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }
}

impl<T> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[test]
    fn replaying_stream_hands_latest_to_new_subscribers() {
        let b = Broadcaster::replaying(0);
        b.publish(1);
        let mut sub = b.subscribe();
        assert_eq!(sub.try_recv(), Some(1));
        assert_eq!(sub.try_recv(), None);
    }

    #[test]
    fn consecutive_duplicates_are_suppressed() {
        let b = Broadcaster::replaying(0);
        let mut sub = b.subscribe();
        assert!(b.publish(1));
        assert!(!b.publish(1));
        assert!(b.publish(0));

        let seen: Vec<_> = std::iter::from_fn(|| sub.try_recv()).collect();
        assert_eq!(seen, vec![0, 1, 0]);
    }

    #[test]
    fn transient_stream_has_no_replay_and_keeps_repeats() {
        let b = Broadcaster::transient();
        b.publish("early");
        let mut sub = b.subscribe();
        assert_eq!(sub.try_recv(), None);

        b.publish("x");
        b.publish("x");
        assert_eq!(sub.try_recv(), Some("x"));
        assert_eq!(sub.try_recv(), Some("x"));
    }

    #[test]
    fn dropped_subscribers_are_pruned_without_affecting_others() {
        let b = Broadcaster::replaying(0);
        let first = b.subscribe();
        let mut second = b.subscribe();
        assert_eq!(b.subscriber_count(), 2);

        drop(first);
        b.publish(5);
        assert_eq!(b.subscriber_count(), 1);
        assert_eq!(second.try_recv(), Some(0));
        assert_eq!(second.try_recv(), Some(5));
    }

    #[tokio::test]
    async fn subscription_is_a_stream_that_ends_with_the_broadcaster() {
        let b = Broadcaster::replaying(1);
        let sub = b.subscribe();
        b.publish(2);
        drop(b);

        let all: Vec<_> = sub.collect().await;
        assert_eq!(all, vec![1, 2]);
    }
}
