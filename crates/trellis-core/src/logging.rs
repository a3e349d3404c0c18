//! Logger setup shared by binaries and tests.

use std::sync::Once;

/// Global logger options.
///
/// `filter` uses `env_logger` directive syntax, e.g. `"info"` or
/// `"trellis_reflect=debug,trellis_ui=info"`. When unset, `RUST_LOG`
/// decides, with `info` as the fallback level. `plain` disables ANSI
/// coloring regardless of terminal detection.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub filter: Option<String>,
    pub plain: bool,
}

impl LoggingConfig {
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self { filter: Some(filter.into()), plain: false }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Idempotent; call it early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        let directives = config
            .filter
            .or_else(|| std::env::var("RUST_LOG").ok());
        match directives {
            Some(spec) => {
                builder.parse_filters(&spec);
            }
            None => {
                builder.filter_level(log::LevelFilter::Info);
            }
        }

        if config.plain {
            builder.write_style(env_logger::WriteStyle::Never);
        }

        builder.init();
        log::debug!("logging initialized");
    });
}
