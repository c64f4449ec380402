//! Logger setup.
//!
//! The crate only ever logs through the `log` facade; this installs
//! `env_logger` as the backend for binaries that want one.

use std::sync::Once;

/// `filter` uses `env_logger` syntax (`"info"`, `"vindr=debug,wgpu=warn"`).
/// When `None`, `RUST_LOG` is honoured, falling back to `info`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            filter: Some(filter.into()),
            ..Default::default()
        }
    }
}

static INIT: Once = Once::new();

/// Install the global logger. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        match config.filter {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => match std::env::var("RUST_LOG") {
                Ok(filter) => {
                    builder.parse_filters(&filter);
                }
                Err(_) => {
                    builder.filter_level(log::LevelFilter::Info);
                }
            },
        }
        builder.write_style(config.write_style);
        if builder.try_init().is_err() {
            log::warn!("A logger was already installed; keeping it");
            return;
        }
        log::debug!("Logging initialized");
    });
}
