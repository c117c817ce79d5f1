//! Logging System
//!
//! Structured logging using the `tracing` crate. Log options are ordinary
//! cyra values: [`LoggingKeys::define`] declares them as a `[logging]`
//! section on an application's builder, so they live in the same config file
//! as everything else.

use crate::config::Config;
use crate::error::CyraError;
use crate::schema::{Builder, Key};
use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Environment variable overriding the configured filter
pub const LOG_ENV_VAR: &str = "CYRA_LOG";

const LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];
const FORMATS: [&str; 2] = ["text", "json"];
const OUTPUTS: [&str; 2] = ["stdout", "stderr"];

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    pub level: String,

    /// Output format: json, text
    pub format: String,

    /// Output destination: stdout, stderr
    pub output: String,

    /// Enable colored output (text format only)
    pub color: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
            output: "stderr".to_string(),
            color: true,
        }
    }
}

/// Handles to the `[logging]` section values
#[derive(Debug, Clone, Copy)]
pub struct LoggingKeys {
    pub level: Key<String>,
    pub format: Key<String>,
    pub output: Key<String>,
    pub color: Key<bool>,
}

impl LoggingKeys {
    /// Declare the `[logging]` section under the builder's active section
    pub fn define(builder: &mut Builder) -> Result<Self, CyraError> {
        let defaults = LoggingConfig::default();

        builder
            .comment("Log output settings")
            .docstring("Logging is configured here. The `CYRA_LOG` environment variable overrides `level` with a full filter directive.")
            .push("logging")?;

        let level = builder
            .comment("trace, debug, info, warn, error or off")
            .define_validated("level", defaults.level, |v: &String| LEVELS.contains(&v.as_str()))?;
        let format = builder
            .comment("text or json")
            .define_validated("format", defaults.format, |v: &String| FORMATS.contains(&v.as_str()))?;
        let output = builder
            .comment("stdout or stderr")
            .define_validated("output", defaults.output, |v: &String| OUTPUTS.contains(&v.as_str()))?;
        let color = builder
            .comment("Colored text output")
            .define("color", defaults.color)?;

        builder.pop_one()?;
        Ok(Self {
            level,
            format,
            output,
            color,
        })
    }
}

impl LoggingConfig {
    pub fn from_config(config: &Config, keys: &LoggingKeys) -> Result<Self, CyraError> {
        Ok(Self {
            level: config.get(&keys.level)?,
            format: config.get(&keys.format)?,
            output: config.get(&keys.output)?,
            color: config.get(&keys.color)?,
        })
    }
}

/// Initialize the global subscriber
///
/// `CYRA_LOG` takes precedence over the configured level. Fails if a
/// subscriber is already installed.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), CyraError> {
    let defaults = LoggingConfig::default();
    let config = config.unwrap_or(&defaults);

    let filter = build_env_filter(config)?;
    let json = parse_format(&config.format)?;
    let output = parse_output(&config.output)?;

    let writer = match output {
        Output::Stdout => BoxMakeWriter::new(std::io::stdout),
        Output::Stderr => BoxMakeWriter::new(std::io::stderr),
    };

    let registry = Registry::default().with(filter);
    let result = if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(config.color)
                    .with_writer(writer),
            )
            .try_init()
    };

    result.map_err(|e| CyraError::invalid(format!("Failed to install log subscriber: {}", e)))
}

fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, CyraError> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV_VAR) {
        return Ok(filter);
    }

    if !LEVELS.contains(&config.level.as_str()) {
        return Err(CyraError::invalid(format!("Invalid log level: {}", config.level)));
    }
    EnvFilter::try_new(&config.level)
        .map_err(|e| CyraError::invalid(format!("Invalid log directive: {}", e)))
}

/// Whether the format is JSON
fn parse_format(format: &str) -> Result<bool, CyraError> {
    match format {
        "json" => Ok(true),
        "text" => Ok(false),
        _ => Err(CyraError::invalid(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            format
        ))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Stdout,
    Stderr,
}

fn parse_output(output: &str) -> Result<Output, CyraError> {
    match output {
        "stdout" => Ok(Output::Stdout),
        "stderr" => Ok(Output::Stderr),
        _ => Err(CyraError::invalid(format!(
            "Invalid log output: {} (must be 'stdout' or 'stderr')",
            output
        ))),
    }
}
