//! # commonkit
//!
//! Small helpers that remove boilerplate from everyday programs.
//!
//! ## Modules
//!
//! - `loader` - Load dynamic libraries from a path or by name from a search path
//! - `iter` - `the` (single distinct value) and `group_by_key`
//! - `cproperty` - Per-instance cached properties
//! - `listify` - Collect iterator-producing functions into containers
//! - `logging` - Scoped default-logger setup on top of `tracing`
//! - `files` - List a file or the glob matches under a directory
//! - `mcachew` - Memoization that degrades to identity without the `cache` feature
//! - `config` - TOML settings for the option-taking helpers
//! - `error` - Crate error type with stable error codes
pub mod config;
pub mod cproperty;
pub mod error;
pub mod files;
pub mod iter;
pub mod listify;
pub mod loader;
pub mod logging;
pub mod mcachew;

pub use config::Settings;
pub use cproperty::CProperty;
pub use error::{Error, ErrorCode, Result};
pub use files::get_files;
pub use iter::{group_by_key, the};
pub use loader::{import_file, import_from, LoadSource, Module, SearchPath};
pub use logging::{basic_config, setup_logger, LogLevel, Logger, LoggerConfig};
pub use mcachew::{mcachew, CacheOptions, Decorator, Memoized};
