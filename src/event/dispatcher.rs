//! # Dispatcher
//!
//! Fans each published [`Event`] out to every subscriber whose [`KindFilter`]
//! matches it.
//!
//! ## Delivery
//!
//! ```text
//! publish(event)
//!     │  snapshot of matching subscriptions (read lock, released before delivery)
//!     ├──► task: subscriber 1.on_event() ─┐
//!     ├──► task: subscriber 2.on_event() ─┼─ join_all, each bounded by delivery_timeout
//!     └──► task: subscriber N.on_event() ─┘  error / panic / timeout → DeliveryFailure
//! ```
//!
//! ## Rules
//!
//! - The subscriber set seen by a publish is a consistent snapshot; a
//!   subscription added during delivery may or may not see the event.
//! - Each subscriber is invoked at most once per publish.
//! - Every callback runs in its own task. A timed out task is aborted; the
//!   publish and the other subscribers do not wait for it.
//! - Once `unsubscribe` returns, the subscriber is not running and will not be
//!   invoked again. The exception is a call made from a callback of the same
//!   publish: waiting there could deadlock two subscribers that unsubscribe
//!   each other, so it returns without waiting.
//! - A failing, panicking or slow subscriber affects only itself. Failures are
//!   logged and sent on the failure channel, never returned to the publisher.
//! - Publishing with no subscribers is a no-op.

use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
    },
    time::Duration,
};

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tokio::{sync::broadcast, task::JoinHandle, time::timeout};
use tracing::{debug, instrument, trace, warn};

use super::{
    error::{EventError, EventResult},
    subscriber::{FnSubscriber, KindFilter, Subscriber, SubscriberError, SubscriptionId},
    types::{Event, EventKind},
};
use crate::config::DispatcherConfig;

tokio::task_local! {
    // Subscriptions targeted by the publish whose callback runs in this task.
    static PUBLISH_BATCH: Arc<HashSet<SubscriptionId>>;
}

struct Subscription {
    id: SubscriptionId,
    name: String,
    filter: KindFilter,
    subscriber: Arc<dyn Subscriber>,
    active: AtomicBool,
    /// Held for reading by every delivery, taken for writing by unsubscribe.
    gate: tokio::sync::RwLock<()>,
}

/// Why a delivery to one subscriber did not succeed.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureReason {
    Error(String),
    Panicked(String),
    TimedOut(Duration),
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::Error(message) => write!(f, "error: {}", message),
            FailureReason::Panicked(message) => write!(f, "panicked: {}", message),
            FailureReason::TimedOut(after) => write!(f, "timed out after {:?}", after),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeliveryFailure {
    pub subscription_id: SubscriptionId,
    pub subscriber: String,
    pub kind: EventKind,
    pub reason: FailureReason,
    pub occurred_at: DateTime<Utc>,
}

/// Outcome of one publish, for the producer's logs. Never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub kind: EventKind,
    /// Subscriptions whose filter matched at publish time.
    pub matched: usize,
    pub delivered: usize,
    pub failed: usize,
    pub timed_out: usize,
    /// Matched, but unsubscribed before delivery started.
    pub skipped: usize,
}

impl DeliveryReport {
    fn new(kind: EventKind, matched: usize) -> Self {
        Self {
            kind,
            matched,
            delivered: 0,
            failed: 0,
            timed_out: 0,
            skipped: 0,
        }
    }

    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Delivered => self.delivered += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Failed(FailureReason::TimedOut(_)) => self.timed_out += 1,
            Outcome::Failed(_) => self.failed += 1,
        }
    }
}

enum Outcome {
    Delivered,
    Skipped,
    Failed(FailureReason),
}

struct Inner {
    subscriptions: RwLock<HashMap<SubscriptionId, Arc<Subscription>>>,
    failure_sender: broadcast::Sender<DeliveryFailure>,
    delivery_timeout: Duration,
}

/// Publish/subscribe hub for daemon events.
///
/// Cheap to clone; clones share the same subscriber set.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<Inner>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(&DispatcherConfig::default())
    }
}

impl Dispatcher {
    pub fn new(config: &DispatcherConfig) -> Self {
        let (failure_sender, _) = broadcast::channel(config.failure_buffer_size.max(1));
        Self {
            inner: Arc::new(Inner {
                subscriptions: RwLock::new(HashMap::new()),
                failure_sender,
                delivery_timeout: config.delivery_timeout,
            }),
        }
    }

    pub fn delivery_timeout(&self) -> Duration {
        self.inner.delivery_timeout
    }

    /// Attaches `subscriber` to every subsequent publish matching `filter`.
    pub fn subscribe(&self, filter: KindFilter, subscriber: Arc<dyn Subscriber>) -> SubscriptionId {
        let id = SubscriptionId::new();
        let name = subscriber.name().to_string();
        debug!(subscription = %id, subscriber = %name, filter = ?filter, "Subscribed");
        let subscription = Arc::new(Subscription {
            id,
            name,
            filter,
            subscriber,
            active: AtomicBool::new(true),
            gate: tokio::sync::RwLock::new(()),
        });
        self.write_subscriptions().insert(id, subscription);
        id
    }

    /// Shorthand for subscribing a synchronous closure.
    pub fn subscribe_fn<F>(&self, filter: KindFilter, name: &str, callback: F) -> SubscriptionId
    where
        F: Fn(&Event) -> Result<(), SubscriberError> + Send + Sync + 'static,
    {
        self.subscribe(filter, Arc::new(FnSubscriber::new(name, callback)))
    }

    /// Detaches a subscription. Unknown or already removed ids are a no-op.
    ///
    /// Waits for deliveries to this subscription that are already running.
    /// When called from a callback of a publish that also targets this
    /// subscription (its own callback included) it returns without waiting.
    ///
    /// Returns whether the id was subscribed.
    pub async fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.write_subscriptions().remove(&id);
        match removed {
            Some(subscription) => {
                Self::retire(&subscription).await;
                debug!(subscription = %id, subscriber = %subscription.name, "Unsubscribed");
                true
            }
            None => {
                trace!(subscription = %id, "Unsubscribe of unknown subscription ignored");
                false
            }
        }
    }

    /// Detaches every subscription, returning how many there were.
    pub async fn unsubscribe_all(&self) -> usize {
        let removed: Vec<Arc<Subscription>> = self
            .write_subscriptions()
            .drain()
            .map(|(_, subscription)| subscription)
            .collect();
        for subscription in &removed {
            Self::retire(subscription).await;
        }
        debug!("Unsubscribed all {} subscriptions", removed.len());
        removed.len()
    }

    async fn retire(subscription: &Subscription) {
        subscription.active.store(false, Ordering::Release);
        let same_publish = PUBLISH_BATCH
            .try_with(|batch| batch.contains(&subscription.id))
            .unwrap_or(false);
        if !same_publish {
            // Deliveries hold the read side until their callback returns.
            drop(subscription.gate.write().await);
        }
    }

    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.read_subscriptions().contains_key(&id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.read_subscriptions().len()
    }

    /// Receiver of delivery failures published from now on.
    pub fn failures(&self) -> FailureReceiver {
        FailureReceiver::new(self.inner.failure_sender.subscribe())
    }

    /// Delivers `event` to every matching subscriber and waits for all of them
    /// to finish, fail or time out.
    #[instrument(level = "trace", skip_all, fields(kind = event.kind_name()))]
    pub async fn publish(&self, event: Event) -> DeliveryReport {
        debug_event("Publishing", &event);
        let kind = event.kind();
        let targets = self.matching(kind.name());
        let mut report = DeliveryReport::new(kind, targets.len());
        if targets.is_empty() {
            trace!("No subscribers for {}", kind);
            return report;
        }

        let event = Arc::new(event);
        let batch: Arc<HashSet<SubscriptionId>> =
            Arc::new(targets.iter().map(|subscription| subscription.id).collect());
        let outcomes = join_all(
            targets
                .iter()
                .map(|subscription| self.deliver(subscription, &event, &batch)),
        )
        .await;

        for (subscription, outcome) in targets.iter().zip(outcomes) {
            report.record(&outcome);
            if let Outcome::Failed(reason) = outcome {
                self.report_failure(subscription, kind, reason);
            }
        }
        report
    }

    /// Publishes from a spawned task so the caller does not wait for delivery.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn_publish(&self, event: Event) -> JoinHandle<DeliveryReport> {
        let dispatcher = self.clone();
        tokio::spawn(async move { dispatcher.publish(event).await })
    }

    fn matching(&self, kind_name: &str) -> Vec<Arc<Subscription>> {
        self.read_subscriptions()
            .values()
            .filter(|subscription| subscription.filter.matches(kind_name))
            .cloned()
            .collect()
    }

    async fn deliver(
        &self,
        subscription: &Subscription,
        event: &Arc<Event>,
        batch: &Arc<HashSet<SubscriptionId>>,
    ) -> Outcome {
        let _gate = subscription.gate.read().await;
        if !subscription.active.load(Ordering::Acquire) {
            return Outcome::Skipped;
        }

        let subscriber = Arc::clone(&subscription.subscriber);
        let event = Arc::clone(event);
        let call = PUBLISH_BATCH.scope(Arc::clone(batch), async move {
            subscriber.on_event(&event).await
        });
        // One task per callback: a callback blocking its thread holds up only itself.
        let mut task = tokio::spawn(call);
        let limit = self.delivery_timeout();
        match timeout(limit, &mut task).await {
            Ok(Ok(Ok(()))) => Outcome::Delivered,
            Ok(Ok(Err(e))) => Outcome::Failed(FailureReason::Error(e.to_string())),
            Ok(Err(e)) if e.is_panic() => {
                Outcome::Failed(FailureReason::Panicked(panic_message(e.into_panic())))
            }
            Ok(Err(e)) => Outcome::Failed(FailureReason::Error(e.to_string())),
            Err(_) => {
                task.abort();
                Outcome::Failed(FailureReason::TimedOut(limit))
            }
        }
    }

    fn report_failure(&self, subscription: &Subscription, kind: EventKind, reason: FailureReason) {
        warn!(
            subscription = %subscription.id,
            subscriber = %subscription.name,
            "Delivery of {} failed: {}",
            kind,
            reason
        );
        let failure = DeliveryFailure {
            subscription_id: subscription.id,
            subscriber: subscription.name.clone(),
            kind,
            reason,
            occurred_at: Utc::now(),
        };
        // Err only means nobody is listening for failures.
        let _ = self.inner.failure_sender.send(failure);
    }

    fn read_subscriptions(
        &self,
    ) -> RwLockReadGuard<'_, HashMap<SubscriptionId, Arc<Subscription>>> {
        self.inner
            .subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_subscriptions(
        &self,
    ) -> RwLockWriteGuard<'_, HashMap<SubscriptionId, Arc<Subscription>>> {
        self.inner
            .subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

pub fn debug_event(prefix: &str, event: &Event) {
    match event.kind() {
        EventKind::CreateTorrentProgress => trace!("{} Event: {:?}", prefix, event),
        _ => debug!("{} Event: {:?}", prefix, event),
    }
}

pub struct FailureReceiver {
    receiver: broadcast::Receiver<DeliveryFailure>,
}

impl FailureReceiver {
    fn new(receiver: broadcast::Receiver<DeliveryFailure>) -> Self {
        Self { receiver }
    }

    /// 失敗通知を受信する。Laggedの場合は取りこぼした件数をエラーで返し、次のrecvから続きを受け取れる。
    pub async fn recv(&mut self) -> EventResult<DeliveryFailure> {
        self.receiver.recv().await.map_err(|e| match e {
            broadcast::error::RecvError::Lagged(count) => EventError::Lagged { count },
            broadcast::error::RecvError::Closed => EventError::ReceiveFailed {
                message: e.to_string(),
            },
        })
    }

    pub fn try_recv(&mut self) -> Option<DeliveryFailure> {
        self.receiver.try_recv().ok()
    }
}
