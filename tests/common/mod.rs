use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use deluge_events::{Dispatcher, Event, KindFilter, SubscriptionId};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[ctor::ctor]
fn init_tests() {
    // テストバイナリごとに一度だけtracingを初期化する
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Subscribes a closure that records every event it receives.
#[allow(dead_code)]
pub fn recording(
    dispatcher: &Dispatcher,
    filter: KindFilter,
) -> (SubscriptionId, Arc<Mutex<Vec<Event>>>) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();
    let id = dispatcher.subscribe_fn(filter, "recorder", move |event| {
        sink.lock().unwrap().push(event.clone());
        Ok(())
    });
    (id, received)
}

#[allow(dead_code)]
pub fn counting(dispatcher: &Dispatcher, filter: KindFilter) -> (SubscriptionId, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let seen = count.clone();
    let id = dispatcher.subscribe_fn(filter, "counter", move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    (id, count)
}
