use crate::{Error, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_DIRECTIVES: &str = "info";

/// Installs the global subscriber writing to stderr.
///
/// `directives` takes precedence over `RUST_LOG`; stdout is reserved for command output.
pub fn init(directives: Option<&str>) -> Result<()> {
    let directives = directives
        .map(ToOwned::to_owned)
        .or_else(|| std::env::var(EnvFilter::DEFAULT_ENV).ok())
        .unwrap_or_else(|| DEFAULT_DIRECTIVES.to_string());

    let filter = EnvFilter::try_new(&directives).map_err(|err| Error::LogFilter(err.to_string()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|err| Error::LogFilter(err.to_string()))
}
