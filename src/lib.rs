//! # deluge-events
//!
//! Event-type registry and dispatch for a long-running torrent daemon.
//!
//! - [`event::Event`]: every notification the daemon can raise, each with a
//!   fixed, ordered payload
//! - [`event::EventRegistry`]: process-wide catalog of kind names and argument
//!   shapes
//! - [`event::Dispatcher`]: delivers published events to filtered subscribers,
//!   isolating their failures from the producer and from each other
//!
//! On the wire an event is the pair `(kind_name, args)`, see
//! [`event::WireEvent`].

pub mod config;
pub mod error;
pub mod event;

// Re-exports
pub use error::*;
pub use event::*;

#[cfg(test)]
mod tests {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    #[ctor::ctor]
    fn init_tests() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
    }
}
