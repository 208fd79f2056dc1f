//! # Subscribers
//!
//! A [`Subscriber`] is anything that wants to hear about events: typically an
//! RPC session forwarding them to a remote client. It is attached to a
//! [`Dispatcher`](super::dispatcher::Dispatcher) together with a [`KindFilter`].

use std::{collections::HashSet, fmt, panic, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::{sync::mpsc, task};
use uuid::Uuid;

use super::types::{Event, EventKind};

/// Failure reported by a subscriber callback.
///
/// Never reaches the publisher; the dispatcher logs it and reports it on its
/// failure channel.
#[derive(Error, Debug)]
pub enum SubscriberError {
    #[error("{0}")]
    Failed(String),

    #[error("Subscriber channel closed: {0}")]
    Closed(String),

    #[error("Subscriber error: {0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl SubscriberError {
    pub fn failed<S: Into<String>>(message: S) -> Self {
        SubscriberError::Failed(message.into())
    }
}

/// Receives published events.
///
/// Callbacks for one event run concurrently across subscribers and are cut off
/// after the dispatcher's delivery timeout. Panics are caught and reported as
/// failures of this subscriber only.
#[async_trait]
pub trait Subscriber: Send + Sync + 'static {
    async fn on_event(&self, event: &Event) -> Result<(), SubscriberError>;

    /// Name used in logs and failure reports.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Adapts a synchronous closure into a [`Subscriber`].
///
/// The closure runs on Tokio's blocking pool, so it may block (write to a
/// pipe, take a std lock) without stalling the runtime. A closure still
/// running when the delivery times out is detached and runs to completion.
pub struct FnSubscriber<F> {
    name: String,
    callback: Arc<F>,
}

impl<F> FnSubscriber<F>
where
    F: Fn(&Event) -> Result<(), SubscriberError> + Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>, callback: F) -> Self {
        Self {
            name: name.into(),
            callback: Arc::new(callback),
        }
    }
}

#[async_trait]
impl<F> Subscriber for FnSubscriber<F>
where
    F: Fn(&Event) -> Result<(), SubscriberError> + Send + Sync + 'static,
{
    async fn on_event(&self, event: &Event) -> Result<(), SubscriberError> {
        let callback = Arc::clone(&self.callback);
        let event = event.clone();
        match task::spawn_blocking(move || (*callback)(&event)).await {
            Ok(result) => result,
            // Re-raised so the dispatcher reports it as a panic of this subscriber.
            Err(e) if e.is_panic() => panic::resume_unwind(e.into_panic()),
            Err(e) => Err(SubscriberError::failed(e.to_string())),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Forwards events into a bounded channel, e.g. the outbound queue of a client
/// connection.
///
/// A full queue makes the callback wait, which the delivery timeout bounds.
pub struct ChannelSubscriber {
    name: String,
    sender: mpsc::Sender<Arc<Event>>,
}

impl ChannelSubscriber {
    pub fn new(name: impl Into<String>, capacity: usize) -> (Self, mpsc::Receiver<Arc<Event>>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (
            Self {
                name: name.into(),
                sender,
            },
            receiver,
        )
    }
}

#[async_trait]
impl Subscriber for ChannelSubscriber {
    async fn on_event(&self, event: &Event) -> Result<(), SubscriberError> {
        self.sender
            .send(Arc::new(event.clone()))
            .await
            .map_err(|_| SubscriberError::Closed(self.name.clone()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Opaque handle returned by `subscribe`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Which event kinds a subscription wants. An empty set means every kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum KindFilter {
    #[default]
    All,
    Only(HashSet<String>),
}

impl KindFilter {
    /// Filter by kind name. Names that match no kind are kept as-is and simply
    /// never match.
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: HashSet<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            KindFilter::All
        } else {
            KindFilter::Only(names)
        }
    }

    pub fn kinds<I>(kinds: I) -> Self
    where
        I: IntoIterator<Item = EventKind>,
    {
        Self::names(kinds.into_iter().map(EventKind::name))
    }

    pub fn matches(&self, kind_name: &str) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Only(names) => names.is_empty() || names.contains(kind_name),
        }
    }
}

impl From<EventKind> for KindFilter {
    fn from(kind: EventKind) -> Self {
        KindFilter::kinds([kind])
    }
}

impl From<Option<HashSet<String>>> for KindFilter {
    fn from(names: Option<HashSet<String>>) -> Self {
        names.map(KindFilter::names).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = KindFilter::names(Vec::<String>::new());
        assert_eq!(filter, KindFilter::All);
        assert!(filter.matches("SessionStarted"));
        assert!(KindFilter::Only(HashSet::new()).matches("SessionStarted"));
        assert!(KindFilter::from(None).matches("TorrentAdded"));
    }

    #[test]
    fn test_filter_by_kind() {
        let filter = KindFilter::from(EventKind::TorrentFinished);
        assert!(filter.matches("TorrentFinished"));
        assert!(!filter.matches("TorrentRemoved"));

        let filter = KindFilter::names(["TorrentAdded", "NotAKind"]);
        assert!(filter.matches("TorrentAdded"));
        assert!(!filter.matches("TorrentFinished"));
    }

    #[tokio::test]
    async fn test_fn_subscriber() {
        let subscriber = FnSubscriber::new("rejects-plugins", |event: &Event| {
            match event.kind() {
                EventKind::PluginEnabled => Err(SubscriberError::failed("no plugins")),
                _ => Ok(()),
            }
        });
        assert_eq!(subscriber.name(), "rejects-plugins");
        assert!(subscriber.on_event(&Event::SessionPaused).await.is_ok());
        assert!(subscriber
            .on_event(&Event::plugin_enabled("Label"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_channel_subscriber() {
        let (subscriber, mut rx) = ChannelSubscriber::new("session-1", 4);
        subscriber
            .on_event(&Event::torrent_finished("abc"))
            .await
            .unwrap();
        let received = rx.recv().await.unwrap();
        assert_eq!(*received, Event::torrent_finished("abc"));

        drop(rx);
        let err = subscriber.on_event(&Event::SessionPaused).await.unwrap_err();
        assert!(matches!(err, SubscriberError::Closed(_)));
    }
}
