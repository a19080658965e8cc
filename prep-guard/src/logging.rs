//! Logging utilities and configuration for prep-guard.
//!
//! All events go through `tracing`; analyzers and I/O entry points open
//! spans with `#[instrument]`. Applications install a subscriber with
//! [`setup::init_logging`] or bring their own.

use tracing::Level;

/// Logging configuration for prep-guard.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Base log level for prep-guard components
    pub base_level: Level,
    /// Whether to log per-column analyzer decisions
    pub log_analyzer_details: bool,
    /// Whether to log load/save operations from `prep_guard::sources`
    pub log_data_operations: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            base_level: Level::INFO,
            log_analyzer_details: false,
            log_data_operations: true,
        }
    }
}

impl LogConfig {
    /// Creates a verbose configuration suitable for debugging.
    pub fn verbose() -> Self {
        Self {
            base_level: Level::DEBUG,
            log_analyzer_details: true,
            log_data_operations: true,
        }
    }

    /// Creates a minimal configuration for production with lowest overhead.
    pub fn production() -> Self {
        Self {
            base_level: Level::WARN,
            log_analyzer_details: false,
            log_data_operations: false,
        }
    }

    /// Creates a balanced configuration suitable for most use cases.
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Environment filter directive for prep-guard at this configuration.
    pub fn directive(&self) -> String {
        let level = if self.log_analyzer_details {
            Level::DEBUG.max(self.base_level)
        } else {
            self.base_level
        };
        let mut directive = format!("prep_guard={}", level.as_str().to_lowercase());
        if !self.log_data_operations {
            directive.push_str(",prep_guard::sources=warn");
        }
        directive
    }
}

/// Truncates a string to at most `max_length` bytes, on a character boundary.
pub fn truncate_field(value: &str, max_length: usize) -> String {
    if value.len() <= max_length {
        return value.to_string();
    }
    let mut end = max_length;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...(truncated)", &value[..end])
}

/// Subscriber setup.
pub mod setup {
    use tracing::Level;

    use super::LogConfig;

    /// Configuration for prep-guard's logging setup.
    #[derive(Debug, Clone)]
    pub struct LoggingConfig {
        /// Log level for the application
        pub level: Level,
        /// Log level for prep-guard components specifically
        pub prep_level: Level,
        /// Whether to use JSON output format
        pub json_format: bool,
        /// Environment filter override
        pub env_filter: Option<String>,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            Self {
                level: Level::INFO,
                prep_level: Level::DEBUG,
                json_format: false,
                env_filter: None,
            }
        }
    }

    impl LoggingConfig {
        /// Creates a configuration for production use.
        pub fn production() -> Self {
            Self {
                level: Level::WARN,
                prep_level: Level::INFO,
                json_format: true,
                env_filter: None,
            }
        }

        /// Creates a configuration for development use.
        pub fn development() -> Self {
            Self {
                level: Level::DEBUG,
                prep_level: Level::DEBUG,
                json_format: false,
                env_filter: None,
            }
        }

        /// Derives a setup from a [`LogConfig`] preset.
        pub fn from_log_config(config: &LogConfig) -> Self {
            Self {
                level: config.base_level,
                prep_level: config.base_level,
                json_format: false,
                env_filter: Some(config.directive()),
            }
        }

        /// Sets the log level for the application.
        pub fn with_level(mut self, level: Level) -> Self {
            self.level = level;
            self
        }

        /// Sets the log level for prep-guard components.
        pub fn with_prep_level(mut self, level: Level) -> Self {
            self.prep_level = level;
            self
        }

        /// Sets whether to use JSON output format.
        pub fn with_json_format(mut self, enabled: bool) -> Self {
            self.json_format = enabled;
            self
        }

        /// Sets a custom environment filter.
        pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
            self.env_filter = Some(filter.into());
            self
        }

        /// Builds the environment filter string.
        pub fn env_filter(&self) -> String {
            if let Some(ref filter) = self.env_filter {
                filter.clone()
            } else {
                format!(
                    "{},prep_guard={}",
                    self.level.as_str().to_lowercase(),
                    self.prep_level.as_str().to_lowercase()
                )
            }
        }
    }

    /// Installs a global `tracing` subscriber. `RUST_LOG` takes precedence
    /// over the configured filter.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use prep_guard::logging::setup::{init_logging, LoggingConfig};
    ///
    /// init_logging(LoggingConfig::development().with_json_format(true)).unwrap();
    /// ```
    pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.env_filter()));

        let fmt_layer = if config.json_format {
            tracing_subscriber::fmt::layer().json().boxed()
        } else {
            tracing_subscriber::fmt::layer().boxed()
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::setup::LoggingConfig;
    use super::*;

    #[test]
    fn test_log_config_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.base_level, Level::INFO);
        assert!(!config.log_analyzer_details);
        assert!(config.log_data_operations);
        assert_eq!(config.directive(), "prep_guard=info");
    }

    #[test]
    fn test_log_config_verbose() {
        let config = LogConfig::verbose();
        assert_eq!(config.base_level, Level::DEBUG);
        assert!(config.log_analyzer_details);
        assert_eq!(config.directive(), "prep_guard=debug");
    }

    #[test]
    fn test_log_config_production() {
        let config = LogConfig::production();
        assert_eq!(config.base_level, Level::WARN);
        assert!(!config.log_analyzer_details);
        assert!(!config.log_data_operations);
        assert_eq!(config.directive(), "prep_guard=warn,prep_guard::sources=warn");
    }

    #[test]
    fn test_data_operations_toggle_sources_filter() {
        let quiet = LogConfig {
            log_data_operations: false,
            ..LogConfig::default()
        };
        assert_eq!(quiet.directive(), "prep_guard=info,prep_guard::sources=warn");

        let loud = LogConfig {
            log_data_operations: true,
            ..LogConfig::production()
        };
        assert_eq!(loud.directive(), "prep_guard=warn");
    }

    #[test]
    fn test_truncate_field() {
        assert_eq!(truncate_field("hello", 10), "hello");

        let long_text = "this is a very long text that should be truncated";
        assert_eq!(truncate_field(long_text, 10), "this is a ...(truncated)");

        // 'é' is two bytes; the cut moves back to a boundary
        assert_eq!(truncate_field("café au lait", 4), "caf...(truncated)");
    }

    #[test]
    fn test_env_filter() {
        assert_eq!(LoggingConfig::default().env_filter(), "info,prep_guard=debug");
        assert_eq!(LoggingConfig::production().env_filter(), "warn,prep_guard=info");
        assert_eq!(
            LoggingConfig::default()
                .with_env_filter("prep_guard=trace")
                .env_filter(),
            "prep_guard=trace"
        );
        assert_eq!(
            LoggingConfig::from_log_config(&LogConfig::production()).env_filter(),
            "prep_guard=warn,prep_guard::sources=warn"
        );
    }
}
