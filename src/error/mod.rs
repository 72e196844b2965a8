use std::path::PathBuf;
use thiserror::Error;

pub mod codes;

pub use codes::{describe_error_code, ErrorCode};

/// The unified error type for every helper in the crate
#[derive(Error, Debug)]
pub enum Error {
    #[error("[E{code:04}] Empty iterator", code = ErrorCode::ITER_EMPTY_INPUT)]
    EmptyInput,

    #[error(
        "[E{code:04}] Value at position {index} differs from the first value",
        code = ErrorCode::ITER_INCONSISTENT_VALUES
    )]
    InconsistentValues { index: usize },

    #[error(
        "[E{code:04}] Failed to load {shown}: {message}",
        code = ErrorCode::LOADER_LOAD_FAILED,
        shown = .path.display()
    )]
    Load {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error(
        "[E{code:04}] Unit '{name}' not found in {count} search path entries",
        code = ErrorCode::LOADER_NOT_FOUND,
        count = .searched.len()
    )]
    NotFound { name: String, searched: Vec<PathBuf> },

    #[error(
        "[E{code:04}] Path not found: {shown}",
        code = ErrorCode::FILES_PATH_NOT_FOUND,
        shown = .path.display()
    )]
    PathNotFound { path: PathBuf },

    #[error("[E{code:04}] Invalid glob pattern: {0}", code = ErrorCode::FILES_INVALID_PATTERN)]
    Pattern(#[from] glob::PatternError),

    #[error("[E{code:04}] Directory traversal failed: {0}", code = ErrorCode::FILES_WALK_FAILED)]
    Walk(#[from] walkdir::Error),

    #[error("[E{code:04}] Invalid log format: {message}", code = ErrorCode::LOGGING_INVALID_FORMAT)]
    Format { message: String },

    #[error("[E{code:04}] Configuration error: {message}")]
    Config {
        code: u16,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Cache error: {message}", code = ErrorCode::CACHE_POISONED)]
    Cache { message: String },
}

impl Error {
    /// Create a load error without an underlying cause
    pub fn load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Load {
            path: path.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a log format error
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// Create a configuration error with a specific code
    pub fn config_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Config {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Attach an underlying cause to errors that carry one
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        match &mut self {
            Self::Load { source: src, .. } | Self::Config { source: src, .. } => {
                *src = Some(source.into());
            }
            _ => {}
        }
        self
    }

    /// Get the numeric error code
    pub fn code(&self) -> u16 {
        match self {
            Self::EmptyInput => ErrorCode::ITER_EMPTY_INPUT,
            Self::InconsistentValues { .. } => ErrorCode::ITER_INCONSISTENT_VALUES,
            Self::Load { .. } => ErrorCode::LOADER_LOAD_FAILED,
            Self::NotFound { .. } => ErrorCode::LOADER_NOT_FOUND,
            Self::PathNotFound { .. } => ErrorCode::FILES_PATH_NOT_FOUND,
            Self::Pattern(_) => ErrorCode::FILES_INVALID_PATTERN,
            Self::Walk(_) => ErrorCode::FILES_WALK_FAILED,
            Self::Format { .. } => ErrorCode::LOGGING_INVALID_FORMAT,
            Self::Config { code, .. } => *code,
            Self::Cache { .. } => ErrorCode::CACHE_POISONED,
        }
    }

    /// Get a description of the error category
    pub fn describe(&self) -> &'static str {
        describe_error_code(self.code())
    }
}

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;
