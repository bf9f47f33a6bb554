//! Logger setup for the command-line tool.
//!
//! The library itself only talks to the `log` facade.

use std::sync::Once;

/// `env_filter` uses `env_logger` filter syntax ("debug", "view2lua=info").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// `--verbose` turns on debug output for this crate.
    pub fn verbose(verbose: bool) -> Self {
        Self {
            env_filter: verbose.then(|| "debug".to_string()),
            ..Self::default()
        }
    }
}

static INIT: Once = Once::new();

/// Install the global logger. Later calls are ignored.
///
/// Filter precedence: explicit config, then `RUST_LOG`, then `warn`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Warn);
        }

        builder.write_style(config.write_style);
        builder.format_timestamp(None);

        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized");
    });
}
