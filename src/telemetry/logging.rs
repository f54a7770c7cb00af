//! Logging configuration and initialization
//!
//! Console output is compact text or JSON; an optional log file is written
//! through a non-blocking appender.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use crate::config::Preferences;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "SCENE_COMPOSER_LOG";
/// Environment variable selecting the output format ("json" or "text")
pub const LOG_FORMAT_ENV: &str = "SCENE_COMPOSER_LOG_FORMAT";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Enable console output (default: true)
    pub console_enabled: bool,
    /// Enable file logging (default: false)
    pub file_enabled: bool,
    /// Log file path (default: "scene_composer.log" in the working directory)
    pub file_path: Option<PathBuf>,
    /// Use JSON format for console logs (default: false)
    pub json_format: bool,
    /// Filter used when no environment filter is set (default: "info")
    pub default_level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            console_enabled: true,
            file_enabled: false,
            file_path: None,
            json_format: false,
            default_level: "info".to_string(),
        }
    }
}

impl LogConfig {
    /// Defaults with the level remembered in the user's preferences
    pub fn from_preferences(prefs: &Preferences) -> Self {
        let mut config = Self::default();
        if let Some(level) = prefs.log_level.as_deref().filter(|l| !l.trim().is_empty()) {
            config.default_level = level.to_string();
        }
        config
    }

    /// Log to `path` in addition to the console
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_enabled = true;
        self.file_path = Some(path.into());
        self
    }

    fn log_path(&self) -> PathBuf {
        self.file_path.clone().unwrap_or_else(|| PathBuf::from("scene_composer.log"))
    }

    /// Whether JSON output is selected, with the environment taking precedence
    fn use_json(&self, format_env: Option<&str>) -> bool {
        match format_env {
            Some(value) => value.eq_ignore_ascii_case("json"),
            None => self.json_format,
        }
    }
}

/// Initialize the global subscriber.
///
/// The filter comes from `SCENE_COMPOSER_LOG`, then `RUST_LOG`, then
/// `config.default_level`. The returned guard must be held for the life of
/// the program when file logging is enabled, otherwise buffered lines are lost.
pub fn init_logging(config: &LogConfig) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
        .unwrap_or_else(|_| EnvFilter::new(&config.default_level));

    let format_env = std::env::var(LOG_FORMAT_ENV).ok();
    let use_json = config.use_json(format_env.as_deref());

    let mut file_guard = None;
    let file_layer = if config.file_enabled {
        let log_path = config.log_path();
        let file = std::fs::File::create(&log_path)?;
        let (writer, guard) = tracing_appender::non_blocking(file);
        file_guard = Some(guard);
        eprintln!("Logging to file: {}", log_path.display());
        Some(
            fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false),
        )
    } else {
        None
    };

    let json_layer = (config.console_enabled && use_json).then(|| {
        fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
    });

    let console_layer = (config.console_enabled && !use_json).then(|| {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .compact()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(json_layer)
        .with(console_layer)
        .try_init()?;

    tracing::info!(
        target: "scene_composer",
        version = env!("CARGO_PKG_VERSION"),
        json_format = use_json,
        file_enabled = config.file_enabled,
        "Logging initialized"
    );

    Ok(file_guard)
}

pub use tracing_appender::non_blocking::WorkerGuard as LogGuard;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_default() {
        let config = LogConfig::default();
        assert!(config.console_enabled);
        assert!(!config.file_enabled);
        assert!(!config.json_format);
        assert_eq!(config.default_level, "info");
        assert_eq!(config.log_path(), PathBuf::from("scene_composer.log"));
    }

    #[test]
    fn test_from_preferences() {
        let prefs = Preferences {
            log_level: Some("scene_composer=debug".to_string()),
            ..Default::default()
        };
        assert_eq!(LogConfig::from_preferences(&prefs).default_level, "scene_composer=debug");

        let blank = Preferences {
            log_level: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(LogConfig::from_preferences(&blank).default_level, "info");
    }

    #[test]
    fn test_format_selection() {
        let config = LogConfig::default();
        assert!(!config.use_json(None));
        assert!(config.use_json(Some("JSON")));
        assert!(!config.use_json(Some("text")));

        let json = LogConfig {
            json_format: true,
            ..Default::default()
        };
        assert!(json.use_json(None));
    }

    #[test]
    fn test_with_file() {
        let config = LogConfig::default().with_file("/tmp/composer.log");
        assert!(config.file_enabled);
        assert_eq!(config.log_path(), PathBuf::from("/tmp/composer.log"));
    }
}
