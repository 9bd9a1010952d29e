//! Process-wide tracing setup.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, EnvFilter};

pub const DEFAULT_FILTER: &str = "info,kubeagent_core=debug,tower_http=info";
const LOG_FILE_PREFIX: &str = "kubeagent.log";

/// Install the global subscriber. Logs go to a daily rolling file when a
/// directory is configured, stdout otherwise. Keep the guard alive for the
/// life of the process or buffered lines are lost.
pub fn init_tracing(log_dir: Option<&Path>) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (writer, guard) = match log_dir {
        Some(dir) => tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX)),
        None => tracing_appender::non_blocking(std::io::stdout()),
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(log_dir.is_none())
        .with_target(true)
        .init();

    guard
}
