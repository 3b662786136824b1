//! Logging handed to each component instead of a process-wide subscriber.
//!
//! A `Logger` owns a `tracing::Dispatch`. Events emitted inside
//! [`Logger::scope`] go to that dispatch only, under a span carrying the
//! component's name.
use std::fmt;
use std::io;

use tracing::level_filters::LevelFilter;
use tracing::{dispatcher, Dispatch};
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
    component: &'static str,
}

impl Logger {
    pub fn new(dispatch: Dispatch) -> Logger {
        Logger {
            dispatch,
            component: "main",
        }
    }

    /// Drops every event.
    pub fn silent() -> Logger {
        Logger::new(Dispatch::none())
    }

    /// Human readable events on stderr. `debug` lowers the default level
    /// from INFO to DEBUG; `RUST_LOG` overrides both.
    pub fn stderr(debug: bool) -> Logger {
        let level = if debug {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        };

        let filter = EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy();

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_target(false)
            .finish();

        Logger::new(Dispatch::new(subscriber))
    }

    /// The same destination, reported under another component name.
    pub fn named(&self, component: &'static str) -> Logger {
        Logger {
            dispatch: self.dispatch.clone(),
            component,
        }
    }

    pub fn component(&self) -> &'static str {
        self.component
    }

    pub fn scope<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        dispatcher::with_default(&self.dispatch, || {
            let span = tracing::info_span!("component", name = self.component);
            let _entered = span.enter();

            f()
        })
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("component", &self.component)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Logger;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing::span::{Attributes, Id, Record};
    use tracing::{Dispatch, Event, Metadata, Subscriber};

    struct Counter(Arc<AtomicUsize>);

    impl Subscriber for Counter {
        fn enabled(&self, _: &Metadata<'_>) -> bool {
            true
        }

        fn new_span(&self, _: &Attributes<'_>) -> Id {
            Id::from_u64(1)
        }

        fn record(&self, _: &Id, _: &Record<'_>) {}

        fn record_follows_from(&self, _: &Id, _: &Id) {}

        fn event(&self, _: &Event<'_>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }

        fn enter(&self, _: &Id) {}

        fn exit(&self, _: &Id) {}
    }

    #[test]
    fn events_reach_the_injected_dispatch_only() {
        let count = Arc::new(AtomicUsize::new(0));
        let log = Logger::new(Dispatch::new(Counter(Arc::clone(&count))));

        log.named("processor").scope(|| tracing::info!("reading"));
        tracing::info!("outside any scope");
        Logger::silent().scope(|| tracing::info!("dropped"));

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn named_keeps_destination() {
        let log = Logger::silent().named("processor");

        assert_eq!(log.component(), "processor");
        assert_eq!(log.scope(|| 7), 7);
    }
}
