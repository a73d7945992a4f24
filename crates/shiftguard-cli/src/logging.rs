//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Reports go to stdout; logs always go to stderr so `--json` output stays
//! machine-readable.
//!
//! # Log Levels
//!
//! - `warn`: low-confidence layouts, failed pipelines (default)
//! - `info`: pipeline stage progress, summary counts (`-v`)
//! - `debug`: heuristic decisions and skipped rows (`-vv`)
//! - `trace`: everything (`-vvv`)

use std::io::{self, IsTerminal};

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level for our crates.
    pub level: Level,
    /// Whether to use ANSI colors in output.
    pub with_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            with_ansi: io::stderr().is_terminal(),
        }
    }
}

impl LogConfig {
    /// Create a `LogConfig` from CLI verbosity count.
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            ..Default::default()
        }
    }
}

/// Initialize the global tracing subscriber. Call once at startup.
pub fn init_logging(config: &LogConfig) {
    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(config.with_ansi)
        .with_target(false)
        .without_time();

    tracing_subscriber::registry()
        .with(build_env_filter(config.level))
        .with(layer)
        .init();
}

/// Build an `EnvFilter` from the given level; `RUST_LOG` overrides it.
fn build_env_filter(level: Level) -> EnvFilter {
    let level = level.as_str().to_lowercase();

    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,shiftguard={level},shiftguard_cli={level}",
            level = level
        ))
    })
}
