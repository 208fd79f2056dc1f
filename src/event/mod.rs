//! # Event system
//!
//! The daemon tells interested parties about state transitions (torrents added
//! or removed, state changes, renames, session lifecycle, config and plugin
//! changes) by publishing events. Producers never know who is listening.
//!
//! ## Components
//!
//! - **Event**: closed set of event kinds, each with an ordered, typed payload
//! - **EventRegistry**: catalog of kind names and their argument shapes, used
//!   for introspection and for validating wire data
//! - **Dispatcher**: publish/subscribe hub delivering events to filtered subscribers
//!
//! ## Event Flow
//!
//! ```text
//! ┌──────────┐  publish  ┌────────────┐  on_event  ┌──────────┐
//! │ Producer │──────────▶│ Dispatcher │───────────▶│Subscriber│──▶ (kind_name, args) on the wire
//! └──────────┘           └────────────┘            └──────────┘
//!                              ╎ describes
//!                        ┌─────────────┐
//!                        │EventRegistry│
//!                        └─────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! # use deluge_events::event::{Dispatcher, Event, KindFilter, EventKind};
//! # async fn example() {
//! let dispatcher = Dispatcher::default();
//! dispatcher.subscribe_fn(KindFilter::from(EventKind::TorrentFinished), "notifier", |event| {
//!     println!("{:?}", event.to_wire());
//!     Ok(())
//! });
//! dispatcher.publish(Event::torrent_finished("abc123")).await;
//! # }
//! ```

pub mod dispatcher;
pub mod error;
pub mod event_registry;
pub mod subscriber;
pub mod types;
pub mod value;

pub use dispatcher::{
    DeliveryFailure, DeliveryReport, Dispatcher, FailureReason, FailureReceiver,
};
pub use error::{EventError, EventResult};
pub use event_registry::{registry, EventRegistry, EventSchema};
pub use subscriber::{
    ChannelSubscriber, FnSubscriber, KindFilter, Subscriber, SubscriberError, SubscriptionId,
};
pub use types::{Event, EventKind, FieldSchema, ParameterType, WireEvent};
pub use value::Value;
