//! # Logger
//!
//! Installs the global `tracing` subscriber for packhub hosts.
//!
//! * Console output is a compact, ANSI-coloured layer (or JSON with [`LogFormat::Json`]).
//! * File output goes through a non-blocking rolling appender; keep the returned
//!   [`Logger`] alive so buffered lines are flushed on shutdown.
//! * `RUST_LOG` is honoured; [`LoggerBuilder::env_filter`] sets the programmatic default
//!   (e.g. `"packhub_manifest=debug,tower_http=info"`).
//!
//! ## Example
//!
//! ```rust
//! use packhub_logger::{LevelFilter, Logger};
//!
//! let _logger = Logger::builder()
//!     .name("packhub-server")
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use private::Sealed;
use std::fs;
use std::marker::PhantomData;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Line format shared by the console and file layers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug)]
struct FileOptions {
    dir: PathBuf,
    rotation: Rotation,
    max_files: usize,
}

#[derive(Debug)]
struct LoggerConfig {
    console: bool,
    level: LevelFilter,
    format: LogFormat,
    env_filter: Option<String>,
    file: Option<FileOptions>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            console: true,
            level: LevelFilter::INFO,
            format: LogFormat::Compact,
            env_filter: None,
            file: None,
        }
    }
}

#[derive(Debug)]
pub struct NoName;
#[derive(Debug)]
pub struct WithName(String);
#[derive(Debug)]
pub struct NoFile;
#[derive(Debug)]
pub struct WithFile;

mod private {
    pub trait Sealed {}
}
impl Sealed for NoName {}
impl Sealed for WithName {}
impl Sealed for NoFile {}
impl Sealed for WithFile {}

/// Builder for the global subscriber. A name is required before [`LoggerBuilder::init`]
/// becomes available; file-only knobs appear after [`LoggerBuilder::file`].
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = NoName, F: Sealed = NoFile> {
    config: LoggerConfig,
    name: N,
    file_state: PhantomData<F>,
}

impl<F: Sealed> LoggerBuilder<NoName, F> {
    /// Names the service; also used as the rolling file prefix.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName, F> {
        LoggerBuilder { config: self.config, name: WithName(name.into()), file_state: PhantomData }
    }
}

impl<N: Sealed, F: Sealed> LoggerBuilder<N, F> {
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.config.level = level;
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.config.console = enabled;
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn format(mut self, format: LogFormat) -> Self {
        self.config.format = format;
        self
    }

    /// Programmatic default directives; `RUST_LOG` is ignored once this is set.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.env_filter = Some(filter.into());
        self
    }

    /// Adds a rolling file layer writing into `dir`.
    pub fn file(self, dir: impl Into<PathBuf>) -> LoggerBuilder<N, WithFile> {
        let mut config = self.config;
        config.file =
            Some(FileOptions { dir: dir.into(), rotation: Rotation::DAILY, max_files: DEFAULT_MAX_FILES });
        LoggerBuilder { config, name: self.name, file_state: PhantomData }
    }
}

impl<N: Sealed> LoggerBuilder<N, WithFile> {
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        if let Some(file) = self.config.file.as_mut() {
            file.rotation = rotation;
        }
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn max_files(mut self, max: usize) -> Self {
        if let Some(file) = self.config.file.as_mut() {
            file.max_files = max;
        }
        self
    }
}

impl<F: Sealed> LoggerBuilder<WithName, F> {
    /// Installs the subscriber.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`] for an empty name, `max_files == 0`,
    ///   an unparsable filter, or when no layer is enabled.
    /// * [`LoggerError::Appender`] if the log directory cannot host a rolling appender.
    /// * [`LoggerError::Subscriber`] if a global subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let name = self.name.0;
        validate(&self.config, &name)?;

        let filter = env_filter(&self.config)?;
        let mut layers: Vec<BoxedLayer> = Vec::new();

        if self.config.console {
            layers.push(match self.config.format {
                LogFormat::Compact => layer().compact().with_ansi(true).boxed(),
                LogFormat::Json => layer().json().boxed(),
            });
        }

        let guard = match self.config.file {
            Some(options) => {
                let (file_layer, guard) = file_layer(&name, options, self.config.format)?;
                layers.push(file_layer);
                Some(guard)
            },
            None => None,
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No logging layers enabled. Enable console or file output.".into(),
                context: None,
            });
        }

        tracing_subscriber::registry().with(layers).with(filter).try_init()?;
        tracing::debug!(logger = %name, "Tracing subscriber installed");

        Ok(Logger { guard })
    }
}

fn file_layer(
    name: &str,
    options: FileOptions,
    format: LogFormat,
) -> Result<(BoxedLayer, WorkerGuard), LoggerError> {
    fs::create_dir_all(&options.dir).map_err(|e| LoggerError::Internal {
        message: e.to_string().into(),
        context: Some(format!("Failed to create log directory {}", options.dir.display()).into()),
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(options.rotation)
        .filename_prefix(name)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(options.max_files)
        .build(&options.dir)?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = layer().with_writer(writer).with_ansi(false);

    let boxed = match format {
        LogFormat::Compact => file_layer.boxed(),
        LogFormat::Json => file_layer.json().boxed(),
    };
    Ok((boxed, guard))
}

/// Handle to the installed logging system. Holds the file writer guard, if any.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { config: LoggerConfig::default(), name: NoName, file_state: PhantomData }
    }

    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers...");
        }
    }
}

fn validate(config: &LoggerConfig, name: &str) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::InvalidConfiguration {
            message: "Logger name cannot be empty".into(),
            context: None,
        });
    }

    if config.file.as_ref().is_some_and(|file| file.max_files == 0) {
        return Err(LoggerError::InvalidConfiguration {
            message: "max_files must be greater than zero".into(),
            context: None,
        });
    }

    Ok(())
}

fn env_filter(config: &LoggerConfig) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(config.level.into());
    match &config.env_filter {
        None => Ok(builder.from_env_lossy()),
        Some(filter) => builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
            message: format!("Invalid env filter '{filter}': {e}").into(),
            context: None,
        }),
    }
}
