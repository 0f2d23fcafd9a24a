//! Logging setup for timeframe.
//!
//! Diagnostics go to stderr through `tracing`, so stdout only ever carries
//! resolved ranges and can be piped safely. At the default level only
//! warnings (bad config files, ignored env vars) are shown; `-v` reports the
//! rule that resolved each expression and `-vv` adds fallback parser
//! rejections.
//!
//! ```rust
//! use timeframe::logging::{init_logging, LogConfig};
//!
//! let logging = init_logging(&LogConfig::from_flags(false, 1, false));
//! tracing::debug!("resolver ready");
//! logging.set_level(tracing_subscriber::filter::LevelFilter::ERROR);
//! ```
//!
//! The subscriber starts from the CLI flags before any config file is read,
//! so config problems are reported. Settings that only become known later
//! (`output.quiet`) are applied through [`LogHandle`].

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

/// Logging configuration derived from the global CLI flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogConfig {
    /// Maximum level emitted for the `timeframe` target.
    pub level: LevelFilter,
    /// Add timestamps, targets and source locations to each event.
    pub detailed: bool,
    /// Enable ANSI colors.
    pub colors: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::WARN,
            detailed: false,
            colors: true,
        }
    }
}

impl LogConfig {
    /// Pick a configuration from `-q` and the `-v` count; `quiet` wins.
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8, colors: bool) -> Self {
        let (level, detailed) = match (quiet, verbose) {
            (true, _) => (LevelFilter::ERROR, false),
            (false, 0) => (LevelFilter::WARN, false),
            (false, 1) => (LevelFilter::DEBUG, false),
            (false, _) => (LevelFilter::TRACE, true),
        };
        Self {
            level,
            detailed,
            colors,
        }
    }

    /// Filter directive used when `RUST_LOG` is unset.
    #[must_use]
    pub fn directive(&self) -> String {
        directive(self.level)
    }
}

fn directive(level: LevelFilter) -> String {
    format!("timeframe={}", level.to_string().to_lowercase())
}

/// Adjusts the active filter after startup.
pub struct LogHandle {
    filter: Option<reload::Handle<EnvFilter, Registry>>,
}

impl LogHandle {
    /// Replace the `timeframe` level. Ignored when `RUST_LOG` is set.
    pub fn set_level(&self, level: LevelFilter) {
        if let Some(handle) = &self.filter {
            if let Err(e) = handle.reload(EnvFilter::new(directive(level))) {
                tracing::debug!(error = %e, "Could not change log level");
            }
        }
    }
}

/// Initialize the global subscriber. Later calls are ignored.
///
/// `RUST_LOG`, when set, replaces the configured level entirely.
pub fn init_logging(config: &LogConfig) -> LogHandle {
    let from_env = std::env::var("RUST_LOG").is_ok();
    let env_filter = if from_env {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(config.directive())
    };

    let detailed = config.detailed.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(config.colors)
            .with_file(true)
            .with_line_number(true)
    });
    let compact = (!config.detailed).then(|| {
        fmt::layer()
            .compact()
            .without_time()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_ansi(config.colors)
    });

    let (filter, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(filter)
        .with(detailed)
        .with(compact)
        .try_init()
        .ok();

    LogHandle {
        filter: (!from_env).then_some(handle),
    }
}
