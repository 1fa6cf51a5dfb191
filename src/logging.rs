use tracing::Subscriber;
use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output settings shared by the proxy and the CLI commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOptions {
    pub debug: bool,
    pub json: bool,
}

impl LogOptions {
    fn default_filter(&self) -> &'static str {
        if self.debug {
            "movie_explorer=debug,tower_http=debug"
        } else {
            "movie_explorer=info,tower_http=info"
        }
    }
}

/// Build the subscriber, writing every record to `writer` in both the text
/// and the JSON format.
pub fn subscriber<W>(
    options: LogOptions,
    filter: EnvFilter,
    writer: W,
) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let registry = tracing_subscriber::registry().with(filter);
    if options.json {
        Box::new(registry.with(tracing_subscriber::fmt::layer().json().with_writer(writer)))
    } else {
        Box::new(registry.with(tracing_subscriber::fmt::layer().with_writer(writer)))
    }
}

/// Install the global subscriber. Logs go to stderr: stdout carries the
/// rendered command output.
pub fn init(options: LogOptions) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| options.default_filter().into());

    subscriber(options, filter, std::io::stderr).init();

    tracing::debug!(json = options.json, "logging initialized");
}
