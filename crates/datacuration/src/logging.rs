//! Subscriber installation for applications embedding the curation crates.
//!
//! Library code only emits `tracing` events. An application installs one
//! global subscriber at startup:
//!
//! - `warn`: unusually wide tables
//! - `info`: row and column counts after ingest, export and dedup
//! - `debug`: operation entry, filter sizes
//! - `trace`: inferred column types and filter values
//!
//! Cell values appear in events only when [`LogConfig::log_data`] is set;
//! otherwise they are replaced with [`REDACTED_VALUE`].
//!
//! ```no_run
//! use datacuration::logging::{LogConfig, init_logging};
//!
//! init_logging(&LogConfig::from_verbosity(1)).unwrap();
//! ```

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;

use thiserror::Error;
use tracing::{Level, Subscriber};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer};

pub use curation_model::redact::{REDACTED_VALUE, log_data_enabled, redact_value};

/// Crates whose events follow [`LogConfig::level`]; everything else logs at warn.
const CURATION_TARGETS: [&str; 5] = [
    "datacuration",
    "curation_core",
    "curation_ingest",
    "curation_model",
    "curation_xpt",
];

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("cannot open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled(#[from] TryInitError),
}

/// Event line layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// The default multi-field `fmt` output.
    #[default]
    Full,
    Compact,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" | "pretty" => Ok(Self::Full),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level applied to the curation crates.
    pub level: Level,
    pub format: LogFormat,
    pub with_timestamps: bool,
    /// Print the module path of each event.
    pub with_target: bool,
    /// Colour output; ignored for JSON.
    pub with_ansi: bool,
    /// Append to this file instead of writing to stderr.
    pub log_file: Option<PathBuf>,
    /// Allow cell values in events.
    pub log_data: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Full,
            with_timestamps: false,
            with_target: false,
            with_ansi: true,
            log_file: None,
            log_data: false,
        }
    }
}

impl LogConfig {
    /// 0 is info, 1 is debug, anything higher is trace.
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = [Level::INFO, Level::DEBUG, Level::TRACE][usize::from(verbosity.min(2))];
        Self {
            level,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_level(self, level: Level) -> Self {
        Self { level, ..self }
    }

    #[must_use]
    pub fn with_format(self, format: LogFormat) -> Self {
        Self { format, ..self }
    }

    #[must_use]
    pub fn with_timestamps(self, with_timestamps: bool) -> Self {
        Self {
            with_timestamps,
            ..self
        }
    }

    #[must_use]
    pub fn with_target(self, with_target: bool) -> Self {
        Self {
            with_target,
            ..self
        }
    }

    #[must_use]
    pub fn with_ansi(self, with_ansi: bool) -> Self {
        Self { with_ansi, ..self }
    }

    #[must_use]
    pub fn with_log_file(self, log_file: impl Into<PathBuf>) -> Self {
        Self {
            log_file: Some(log_file.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_log_data(self, log_data: bool) -> Self {
        Self { log_data, ..self }
    }

    /// Directive string used when `RUST_LOG` is unset.
    fn default_directives(&self) -> String {
        let level = self.level.as_str().to_ascii_lowercase();
        std::iter::once("warn".to_string())
            .chain(
                CURATION_TARGETS
                    .iter()
                    .map(|target| format!("{target}={level}")),
            )
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Install the global subscriber, writing to stderr or [`LogConfig::log_file`].
pub fn init_logging(config: &LogConfig) -> Result<(), LoggingError> {
    let writer = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::LogFile {
                    path: path.clone(),
                    source,
                })?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(io::stderr),
    };
    init_logging_with_writer(config, writer)
}

/// Install the global subscriber with a caller-supplied writer.
pub fn init_logging_with_writer<W>(config: &LogConfig, writer: W) -> Result<(), LoggingError>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    curation_model::redact::set_log_data_enabled(config.log_data);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directives()));

    tracing_subscriber::registry()
        .with(filter)
        .with(format_layer(config, writer))
        .try_init()?;
    Ok(())
}

fn format_layer<S, W>(config: &LogConfig, writer: W) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let base = fmt::layer()
        .with_writer(writer)
        .with_target(config.with_target);
    match (config.format, config.with_timestamps) {
        (LogFormat::Json, true) => base.json().boxed(),
        (LogFormat::Json, false) => base.json().without_time().boxed(),
        (LogFormat::Compact, true) => base.compact().with_ansi(config.with_ansi).boxed(),
        (LogFormat::Compact, false) => base
            .compact()
            .with_ansi(config.with_ansi)
            .without_time()
            .boxed(),
        (LogFormat::Full, true) => base.with_ansi(config.with_ansi).boxed(),
        (LogFormat::Full, false) => base.with_ansi(config.with_ansi).without_time().boxed(),
    }
}
