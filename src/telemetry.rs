//! Telemetry and tracing utilities
//!
//! The library only emits `tracing` events; applications decide where they
//! go. This module is a convenience for setting up a `tracing-subscriber`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use llm_envelope::telemetry::{OutputFormat, SubscriberConfig, init_subscriber};
//!
//! # fn main() -> Result<(), llm_envelope::LlmError> {
//! let config = SubscriberConfig::builder()
//!     .log_level(tracing::Level::DEBUG)
//!     .output_format(OutputFormat::Json)
//!     .build();
//! let _guard = init_subscriber(config)?;
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

use crate::error::LlmError;

/// Output format for tracing logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON, one object per line
    Json,
    /// JSON without span context
    JsonCompact,
}

impl std::str::FromStr for OutputFormat {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "json-compact" => Ok(Self::JsonCompact),
            _ => Err(LlmError::ConfigurationError(format!(
                "Invalid log format: {s}. Valid options: text, json, json-compact"
            ))),
        }
    }
}

/// Configuration for tracing subscriber
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    pub log_level: tracing::Level,
    pub output_format: OutputFormat,
    /// Write to stderr, alongside the log file when one is set
    pub enable_console: bool,
    /// Append logs to this file (non-blocking writer)
    pub log_file: Option<PathBuf>,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            log_level: tracing::Level::INFO,
            output_format: OutputFormat::Text,
            enable_console: true,
            log_file: None,
        }
    }
}

impl SubscriberConfig {
    pub fn builder() -> SubscriberConfigBuilder {
        SubscriberConfigBuilder::default()
    }

    pub fn debug() -> Self {
        Self {
            log_level: tracing::Level::DEBUG,
            ..Self::default()
        }
    }

    pub fn production(log_file: PathBuf) -> Self {
        Self {
            log_level: tracing::Level::WARN,
            output_format: OutputFormat::Json,
            enable_console: false,
            log_file: Some(log_file),
        }
    }

    fn filter(&self) -> EnvFilter {
        let level = self.log_level.as_str().to_lowercase();
        EnvFilter::new(format!("llm_envelope={level}"))
    }
}

/// Builder for SubscriberConfig
#[derive(Debug, Default)]
pub struct SubscriberConfigBuilder {
    log_level: Option<tracing::Level>,
    output_format: Option<OutputFormat>,
    enable_console: Option<bool>,
    log_file: Option<PathBuf>,
}

impl SubscriberConfigBuilder {
    pub fn log_level(mut self, level: tracing::Level) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Set the log level from a string (`trace` .. `error`)
    pub fn log_level_str(mut self, level: &str) -> Result<Self, LlmError> {
        let parsed = level.parse::<tracing::Level>().map_err(|_| {
            LlmError::ConfigurationError(format!(
                "Invalid log level: {level}. Valid options: trace, debug, info, warn, error"
            ))
        })?;
        self.log_level = Some(parsed);
        Ok(self)
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn enable_console(mut self, enable: bool) -> Self {
        self.enable_console = Some(enable);
        self
    }

    pub fn log_file(mut self, path: PathBuf) -> Self {
        self.log_file = Some(path);
        self
    }

    pub fn build(self) -> SubscriberConfig {
        SubscriberConfig {
            log_level: self.log_level.unwrap_or(tracing::Level::INFO),
            output_format: self.output_format.unwrap_or_default(),
            enable_console: self.enable_console.unwrap_or(true),
            log_file: self.log_file,
        }
    }
}

/// Pick the output for `config`: the log file, stderr, both, or nothing.
fn make_writer(config: &SubscriberConfig) -> Result<(BoxMakeWriter, Option<WorkerGuard>), LlmError> {
    let output = match &config.log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let file_name = path.file_name().ok_or_else(|| {
                LlmError::ConfigurationError(format!("Invalid log file path: {}", path.display()))
            })?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (file_writer, guard) = tracing_appender::non_blocking(appender);
            let writer = if config.enable_console {
                BoxMakeWriter::new(file_writer.and(std::io::stderr))
            } else {
                BoxMakeWriter::new(file_writer)
            };
            (writer, Some(guard))
        }
        None if config.enable_console => {
            let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
            (BoxMakeWriter::new(writer), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::sink), None),
    };
    Ok(output)
}

/// Install a global tracing subscriber.
///
/// Returns the background writer's guard; keep it alive for the lifetime of
/// the program or buffered lines are lost. With both `log_file` and
/// `enable_console` set, events go to the file and to stderr. Installing a
/// subscriber when one is already set is not an error.
pub fn init_subscriber(config: SubscriberConfig) -> Result<Option<WorkerGuard>, LlmError> {
    let (writer, guard) = make_writer(&config)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.filter())
        .with_writer(writer)
        .with_target(true);

    let init_result = match config.output_format {
        OutputFormat::Json => builder.json().try_init(),
        OutputFormat::JsonCompact => builder.json().with_current_span(false).try_init(),
        OutputFormat::Text => builder.try_init(),
    };

    match init_result {
        Ok(()) => Ok(guard),
        Err(e) if e.to_string().contains("already") => {
            tracing::debug!("tracing subscriber already installed");
            Ok(None)
        }
        Err(e) => Err(LlmError::ConfigurationError(format!(
            "Failed to initialize tracing: {e}"
        ))),
    }
}

pub fn init_default() -> Result<Option<WorkerGuard>, LlmError> {
    init_subscriber(SubscriberConfig::default())
}

pub fn init_debug() -> Result<Option<WorkerGuard>, LlmError> {
    init_subscriber(SubscriberConfig::debug())
}

/// Read subscriber settings from the environment
///
/// - `LLM_ENVELOPE_LOG_LEVEL`: trace, debug, info, warn, error
/// - `LLM_ENVELOPE_LOG_FORMAT`: text, json, json-compact
/// - `LLM_ENVELOPE_LOG_FILE`: log file path
pub fn config_from_env() -> Result<SubscriberConfig, LlmError> {
    let mut builder = SubscriberConfig::builder();

    if let Ok(level) = std::env::var("LLM_ENVELOPE_LOG_LEVEL") {
        builder = builder.log_level_str(&level)?;
    }
    if let Ok(format) = std::env::var("LLM_ENVELOPE_LOG_FORMAT") {
        builder = builder.output_format(format.parse()?);
    }
    if let Ok(file_path) = std::env::var("LLM_ENVELOPE_LOG_FILE") {
        builder = builder.log_file(PathBuf::from(file_path));
    }

    Ok(builder.build())
}

pub fn init_from_env() -> Result<Option<WorkerGuard>, LlmError> {
    init_subscriber(config_from_env()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tracing_subscriber::fmt::MakeWriter;

    #[test]
    fn test_builder_defaults() {
        let config = SubscriberConfig::builder().build();
        assert_eq!(config.log_level, tracing::Level::INFO);
        assert_eq!(config.output_format, OutputFormat::Text);
        assert!(config.enable_console);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_log_level_str() {
        let config = SubscriberConfig::builder()
            .log_level_str("DEBUG")
            .unwrap()
            .build();
        assert_eq!(config.log_level, tracing::Level::DEBUG);

        let err = SubscriberConfig::builder().log_level_str("loud").unwrap_err();
        assert!(matches!(err, LlmError::ConfigurationError(_)));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "JSON-Compact".parse::<OutputFormat>().unwrap(),
            OutputFormat::JsonCompact
        );
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_production_config() {
        let config = SubscriberConfig::production(PathBuf::from("logs/app.log"));
        assert_eq!(config.log_level, tracing::Level::WARN);
        assert_eq!(config.output_format, OutputFormat::Json);
        assert!(!config.enable_console);
    }

    #[test]
    fn test_log_file_and_console_both_receive_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("envelope.log");
        let config = SubscriberConfig::builder()
            .log_file(path.clone())
            .enable_console(true)
            .build();

        let (writer, guard) = make_writer(&config).unwrap();
        writer.make_writer().write_all(b"model call failed\n").unwrap();
        drop(guard);

        assert!(std::fs::read_to_string(&path).unwrap().contains("model call failed"));
    }

    #[test]
    fn test_no_outputs_needs_no_guard() {
        let config = SubscriberConfig::builder().enable_console(false).build();
        let (_writer, guard) = make_writer(&config).unwrap();
        assert!(guard.is_none());
    }

    #[test]
    fn test_log_file_without_name_is_rejected() {
        let config = SubscriberConfig::builder()
            .log_file(PathBuf::from("/"))
            .build();
        let err = init_subscriber(config).unwrap_err();
        assert!(matches!(err, LlmError::ConfigurationError(ref m) if m.contains("Invalid log file path")));
    }
}
