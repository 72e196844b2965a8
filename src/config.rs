//! TOML settings for the helpers that take options.
//!
//! ```toml
//! search_path = ["/opt/plugins"]
//!
//! [logging]
//! level = "info"
//! format = "{asctime} {levelname} {message}"
//!
//! [cache]
//! capacity = 256
//! ```

use crate::error::{Error, ErrorCode, Result};
use crate::loader::SearchPath;
use crate::logging::LoggerConfig;
use crate::mcachew::CacheOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub logging: LoggerConfig,
    pub cache: CacheOptions,
    pub search_path: Vec<PathBuf>,
}

impl Settings {
    /// Read settings from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config_with_code(
                ErrorCode::CONFIG_READ_FAILED,
                format!("failed to read {}", path.display()),
            )
            .with_source(e)
        })?;
        let settings = Self::from_toml_str(&content)?;
        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            Error::config_with_code(ErrorCode::CONFIG_PARSE_ERROR, "invalid settings").with_source(e)
        })
    }

    /// Append the configured directories to the global search path
    pub fn extend_search_path(&self) {
        let global = SearchPath::global();
        for dir in &self.search_path {
            global.push(dir.clone());
        }
    }
}
