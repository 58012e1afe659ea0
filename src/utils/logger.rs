use tracing::Subscriber;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("lotkeeper=debug,info")
        } else {
            EnvFilter::new("lotkeeper=info")
        }
    })
}

/// Compact human-readable lines on stderr; stdout is left to command output.
pub fn cli_subscriber(verbose: bool) -> impl Subscriber + Send + Sync {
    tracing_subscriber::registry().with(default_filter(verbose)).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact(),
    )
}

/// One JSON object per event on stderr, for log collectors.
pub fn json_subscriber(verbose: bool) -> impl Subscriber + Send + Sync {
    tracing_subscriber::registry().with(default_filter(verbose)).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .json()
            .with_current_span(false),
    )
}

pub fn init_cli_logger(verbose: bool) {
    cli_subscriber(verbose).init();
}

pub fn init_json_logger(verbose: bool) {
    json_subscriber(verbose).init();
}
