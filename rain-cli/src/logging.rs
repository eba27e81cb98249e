use rain_core::Verbosity;
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;

/// Filter directives for a verbosity level. `RUST_LOG` wins when set.
pub fn filter_for(verbosity: Verbosity) -> EnvFilter {
    let default = match verbosity {
        Verbosity::Normal => "info",
        Verbosity::Debug => "rain_core=debug,will_it_rain=debug,info",
    };

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// A subscriber meant to be attached to a single invocation with
/// `WithSubscriber`, not installed globally.
pub fn subscriber(verbosity: Verbosity) -> impl Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_env_filter(filter_for(verbosity))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish()
}
