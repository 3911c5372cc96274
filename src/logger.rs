use std::result::Result;

use snafu::ResultExt;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{registry, EnvFilter};

use crate::config::Config;
use crate::error::{ApplicationError, InitializeLoggerSnafu};

const LOG_FILE: &str = "viewrank.log";

/// Used when `RUST_LOG` is unset or does not parse.
const DEFAULT_DIRECTIVES: &str = "info,tower_http=debug";

/// Pretty logs on stdout and JSON logs in a daily rolling file under `log_dir`.
///
/// Keep the returned guard alive for as long as the file logs should be flushed.
pub fn init(config: &Config) -> Result<WorkerGuard, ApplicationError> {
    let rolling = tracing_appender::rolling::daily(&config.log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(rolling);

    let subscriber = registry()
        .with(filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with(layer().pretty().with_writer(std::io::stdout))
        .with(
            layer()
                .json()
                .with_ansi(false)
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(writer),
        );
    tracing::subscriber::set_global_default(subscriber).context(InitializeLoggerSnafu)?;

    Ok(guard)
}

fn filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

#[cfg(test)]
mod tests {
    use tracing::level_filters::LevelFilter;

    use super::*;

    #[test]
    fn rust_log_wins_when_it_parses() {
        assert_eq!(filter(Some("warn")).max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn falls_back_to_the_defaults() {
        assert_eq!(filter(None).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(filter(Some("viewrank=loud")).max_level_hint(), Some(LevelFilter::DEBUG));
    }
}
