use std::sync::Once;

/// Where `hatet` log lines come from and how they look.
///
/// `env_filter` takes `env_logger` directives such as `debug` or
/// `hatet_markup=trace`. When unset, `RUST_LOG` is consulted, then
/// [`LoggingConfig::default_filter`].
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { env_filter: None, write_style: env_logger::WriteStyle::Auto }
    }
}

impl LoggingConfig {
    /// Block failures (warn) and the per-run summary (info) from the hatet
    /// crates; only warnings from anything else.
    pub fn default_filter(&self) -> &'static str {
        "warn,hatet_engine=info,hatet_markup=info"
    }

    fn filter(&self) -> String {
        self.env_filter
            .clone()
            .or_else(|| std::env::var("RUST_LOG").ok().filter(|f| !f.trim().is_empty()))
            .unwrap_or_else(|| self.default_filter().to_string())
    }
}

static INIT: Once = Once::new();

/// Install the `env_logger` backend. Later calls do nothing.
///
/// Everything goes to stderr: the transpiled document may be on stdout.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = config.filter();

        env_logger::Builder::new()
            .parse_filters(&filter)
            .write_style(config.write_style)
            .target(env_logger::Target::Stderr)
            .format_timestamp(None)
            .init();

        log::debug!("logging to stderr with filter {filter:?}");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        let config = LoggingConfig { env_filter: Some("hatet_markup=trace".into()), ..LoggingConfig::default() };
        assert_eq!(config.filter(), "hatet_markup=trace");
    }

    #[test]
    fn init_twice_is_harmless() {
        init_logging(LoggingConfig::default());
        init_logging(LoggingConfig { env_filter: Some("trace".into()), ..LoggingConfig::default() });
        log::info!("still one logger");
    }
}
