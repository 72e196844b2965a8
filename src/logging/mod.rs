//! Logger setup shim.
//!
//! The crate keeps a process-wide default [`Logger`]. [`basic_config`]
//! configures whichever logger is currently the default, once. [`setup_logger`]
//! temporarily makes a caller-supplied logger the default, configures it, and
//! puts the previous default back on every exit path.
//!
//! A configured logger owns a `tracing` [`Dispatch`]; events emitted inside
//! [`Logger::in_scope`] are rendered with the logger's template.

mod format;

pub use format::{Template, TemplateFormat};

use crate::error::Result;
use once_cell::sync::{Lazy, OnceCell};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::dispatcher::{self, DefaultGuard, Dispatch};
use tracing::{debug, Level};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;

pub const DEFAULT_FORMAT: &str = "{name} {asctime} {levelname:<8} {filename}:{lineno:<4} {message}";
pub const DEFAULT_DATEFMT: &str = "%Y-%m-%d %H:%M:%S";
pub const ROOT_LOGGER_NAME: &str = "root";

/// Minimum severity a configured logger emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    #[default]
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

/// Options applied by [`basic_config`]; unset fields fall back to defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub level: Option<LogLevel>,
    pub format: Option<String>,
    pub datefmt: Option<String>,
}

impl LoggerConfig {
    pub fn level(&self) -> LogLevel {
        self.level.unwrap_or_default()
    }

    pub fn format(&self) -> &str {
        self.format.as_deref().unwrap_or(DEFAULT_FORMAT)
    }

    pub fn datefmt(&self) -> &str {
        self.datefmt.as_deref().unwrap_or(DEFAULT_DATEFMT)
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_datefmt(mut self, datefmt: impl Into<String>) -> Self {
        self.datefmt = Some(datefmt.into());
        self
    }
}

/// A named logger, configured at most once
pub struct Logger {
    name: String,
    writer: Mutex<Option<BoxMakeWriter>>,
    dispatch: OnceCell<Dispatch>,
}

impl Logger {
    /// Create an unconfigured logger writing to stderr once configured
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            writer: Mutex::new(None),
            dispatch: OnceCell::new(),
        }
    }

    /// Route this logger's output to `make_writer` instead of stderr
    pub fn with_writer<W>(self, make_writer: W) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        *self.writer.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(BoxMakeWriter::new(make_writer));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_configured(&self) -> bool {
        self.dispatch.get().is_some()
    }

    pub fn dispatch(&self) -> Option<&Dispatch> {
        self.dispatch.get()
    }

    /// Run `f` with this logger as the thread's tracing dispatcher.
    ///
    /// An unconfigured logger leaves the current dispatcher in place.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        match self.dispatch.get() {
            Some(dispatch) => dispatcher::with_default(dispatch, f),
            None => f(),
        }
    }

    /// Make this logger the thread's tracing dispatcher until the guard drops
    pub fn set_thread_default(&self) -> Option<DefaultGuard> {
        self.dispatch.get().map(dispatcher::set_default)
    }

    /// Configure the logger unless it already is. Returns whether it was configured now.
    fn configure(&self, config: &LoggerConfig) -> Result<bool> {
        if self.is_configured() {
            return Ok(false);
        }

        let template = Template::parse(config.format())?;
        format::validate_datefmt(config.datefmt())?;

        let writer = self
            .writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .unwrap_or_else(|| BoxMakeWriter::new(std::io::stderr));

        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::from(config.level()))
            .with_writer(writer)
            .event_format(TemplateFormat::new(
                self.name.clone(),
                template,
                config.datefmt(),
            ))
            .finish();

        let configured = self.dispatch.set(Dispatch::new(subscriber)).is_ok();
        if configured {
            debug!(logger = %self.name, level = ?config.level(), "Logger configured");
        }
        Ok(configured)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("configured", &self.is_configured())
            .finish()
    }
}

static ROOT: Lazy<RwLock<Arc<Logger>>> =
    Lazy::new(|| RwLock::new(Arc::new(Logger::new(ROOT_LOGGER_NAME))));

/// The current process-wide default logger
pub fn root() -> Arc<Logger> {
    ROOT.read().unwrap_or_else(PoisonError::into_inner).clone()
}

fn replace_root(logger: Arc<Logger>) -> Arc<Logger> {
    let mut slot = ROOT.write().unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *slot, logger)
}

/// Installs a default logger and restores the previous one on drop
#[must_use = "the previous default logger is restored when the guard is dropped"]
pub struct RootGuard {
    previous: Option<Arc<Logger>>,
}

impl RootGuard {
    pub fn install(logger: Arc<Logger>) -> Self {
        Self {
            previous: Some(replace_root(logger)),
        }
    }
}

impl Drop for RootGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            replace_root(previous);
        }
    }
}

/// Configure the current default logger as if for the first time.
///
/// Returns `Ok(false)` when the default logger was already configured.
pub fn basic_config(config: &LoggerConfig) -> Result<bool> {
    root().configure(config)
}

/// Configure `logger` through the default-logger slot, then restore the slot.
///
/// The previous default is put back even when configuration fails.
pub fn setup_logger(logger: &Arc<Logger>, config: &LoggerConfig) -> Result<bool> {
    let _guard = RootGuard::install(Arc::clone(logger));
    basic_config(config)
}
