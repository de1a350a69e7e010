use tracing_subscriber::{
    prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use tracing::{instrument, trace};

pub const DEFAULT_FILTER: &str = "wordsquare=info";

fn env_filter(rust_log: Option<&str>, filter: &str) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(filter).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// `RUST_LOG` wins over `filter` when it's set. Logs go to stderr so they
/// never mix with a game on stdout.
#[instrument]
pub fn init_tracing(filter: &str) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(env_filter(rust_log.as_deref(), filter))
        .init();

    trace!("finished");
}
