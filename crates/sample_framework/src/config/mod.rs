//! Configuration files
//!
//! Samples build their [`SampleConfig`] in code. A `<binary>.toml` (or
//! `.ron`) file next to the working directory can then adjust it through
//! [`SampleOverrides`]; only the keys present in the file change anything.

mod sample_config;

pub use sample_config::{
    SampleConfig, SampleOverrides, ShaderSearchConfig, WindowConfig, WindowOverrides,
};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read or written
    #[error("Config file {}: {source}", .path.display())]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid for its format
    #[error("Failed to parse {}: {message}", .path.display())]
    Parse {
        /// File involved
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// The value could not be written out
    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    /// Neither `.toml` nor `.ron`
    #[error("Unsupported config format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Values that parse but cannot open a window
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// On-disk formats, picked by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.ron`
    Ron,
}

impl ConfigFormat {
    /// Format for `path`, from its extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(OsStr::to_str) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Serde-backed configuration stored as TOML or RON
pub trait Config: Serialize + DeserializeOwned + Default {
    /// Read and parse `path`
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed = match format {
            ConfigFormat::Toml => toml::from_str(&text).map_err(|e| e.to_string()),
            ConfigFormat::Ron => ron::from_str(&text).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Like [`Config::load_from_file`], but a missing file is `Ok(None)`
    fn load_if_present(path: impl AsRef<Path>) -> Result<Option<Self>, ConfigError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Ok(None);
        }
        Self::load_from_file(path).map(Some)
    }

    /// Serialize to `path` in the format its extension names
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => toml::to_string_pretty(self).map_err(|e| e.to_string()),
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new())
                .map_err(|e| e.to_string()),
        }
        .map_err(ConfigError::Serialize)?;

        fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
