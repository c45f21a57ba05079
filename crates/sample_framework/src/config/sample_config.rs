//! # Sample Configuration
//!
//! Window hints and shader search paths for one sample. Every field has a
//! default, so a config file only needs the values it changes:
//!
//! ```toml
//! [window]
//! title = "Instancing"
//! gl_version = [4, 3]
//! resizable = true
//! ```

use super::{Config, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// # Window Configuration
///
/// Hints applied before the window and its OpenGL context are created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Initial client width in pixels
    pub width: u32,
    /// Initial client height in pixels
    pub height: u32,
    /// MSAA sample count, 0 disables multisampling
    pub samples: u32,
    /// Requested OpenGL context version (major, minor)
    pub gl_version: (u32, u32),
    /// Whether the window can be resized; resize events are tracked only when set
    pub resizable: bool,
    /// Swap on vertical blank
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Hello World".to_string(),
            width: 640,
            height: 480,
            samples: 4,
            gl_version: (3, 3),
            resizable: false,
            vsync: true,
        }
    }
}

impl WindowConfig {
    /// Reject values that cannot produce a window
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        // Core profile with forward compatibility only exists from 3.2 on
        if self.gl_version < (3, 2) {
            return Err(ConfigError::Invalid(format!(
                "OpenGL {}.{} has no core profile",
                self.gl_version.0, self.gl_version.1
            )));
        }
        Ok(())
    }
}

/// Directories searched for GLSL sources, in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderSearchConfig {
    /// Search directories
    pub directories: Vec<PathBuf>,
}

impl Default for ShaderSearchConfig {
    fn default() -> Self {
        Self {
            directories: ["shaders", "samples_app/shaders", "resources/shaders", "../shaders", "."]
                .into_iter()
                .map(PathBuf::from)
                .collect(),
        }
    }
}

impl ShaderSearchConfig {
    /// Put `dir` in front of the search list
    #[must_use]
    pub fn with_priority_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directories.insert(0, dir.into());
        self
    }
}

/// # Complete Sample Configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    /// Window and context hints
    pub window: WindowConfig,
    /// Shader search paths
    pub shaders: ShaderSearchConfig,
}

impl SampleConfig {
    /// Defaults with a custom window title
    pub fn titled(title: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.window.title = title.into();
        config
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.window.validate()
    }
}

impl Config for SampleConfig {}

/// Window keys a config file may change; absent keys keep the built-in value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowOverrides {
    /// Window title
    pub title: Option<String>,
    /// Client width in pixels
    pub width: Option<u32>,
    /// Client height in pixels
    pub height: Option<u32>,
    /// MSAA sample count
    pub samples: Option<u32>,
    /// OpenGL context version
    pub gl_version: Option<(u32, u32)>,
    /// Resizable window
    pub resizable: Option<bool>,
    /// Swap on vertical blank
    pub vsync: Option<bool>,
}

/// Partial [`SampleConfig`] read from a `<binary>.toml` or `.ron` file
///
/// ```toml
/// shader_dirs = ["/opt/my_shaders"]
///
/// [window]
/// width = 1280
/// height = 720
/// vsync = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SampleOverrides {
    /// Window changes
    pub window: WindowOverrides,
    /// Directories searched before the built-in list
    pub shader_dirs: Vec<PathBuf>,
}

impl Config for SampleOverrides {}

impl SampleConfig {
    /// Apply the keys set in `overrides`
    #[must_use]
    pub fn with_overrides(mut self, overrides: SampleOverrides) -> Self {
        let SampleOverrides { window, shader_dirs } = overrides;
        let target = &mut self.window;
        if let Some(title) = window.title {
            target.title = title;
        }
        target.width = window.width.unwrap_or(target.width);
        target.height = window.height.unwrap_or(target.height);
        target.samples = window.samples.unwrap_or(target.samples);
        target.gl_version = window.gl_version.unwrap_or(target.gl_version);
        target.resizable = window.resizable.unwrap_or(target.resizable);
        target.vsync = window.vsync.unwrap_or(target.vsync);

        for dir in shader_dirs.into_iter().rev() {
            self.shaders = self.shaders.with_priority_dir(dir);
        }
        self
    }

    /// Apply the overrides file at `path` if it exists, then validate
    pub fn with_overrides_from(self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = match SampleOverrides::load_if_present(path)? {
            Some(overrides) => {
                log::info!("Applying config overrides from {}", path.display());
                self.with_overrides(overrides)
            }
            None => self,
        };
        config.validate()?;
        Ok(config)
    }
}
