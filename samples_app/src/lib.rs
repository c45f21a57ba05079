//! OpenGL samples built on `sample_framework`
//!
//! Each module in [`contents`] is one self-contained demo; the `main_*.rs`
//! binaries pick one and hand it to [`launch`].

pub mod contents;

use sample_framework::config::ShaderSearchConfig;
use sample_framework::prelude::*;
use std::path::{Path, PathBuf};

/// Shader search list with this crate's `shaders/` directory first
pub fn shader_search() -> ShaderSearchConfig {
    let bundled = Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders");
    ShaderSearchConfig::default().with_priority_dir(bundled)
}

/// `<binary name>.toml` in the working directory
pub fn overrides_path() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let stem = exe.file_stem()?.to_str()?;
    Some(PathBuf::from(format!("{stem}.toml")))
}

/// Resolve a vertex/fragment pair shipped with the samples
pub fn shader_paths(vertex: &str, fragment: &str) -> ShaderPaths {
    ShaderPaths::resolve(&shader_search().directories, vertex, fragment)
}

/// Run `content` in a GLFW window until it closes or Ctrl-C arrives
///
/// `config` is adjusted by the file at [`overrides_path`] when one exists.
/// Teardown is the same on both exits. When the interrupt handler cannot
/// be installed the sample still runs, it just cannot be interrupted cleanly.
pub fn launch<C: ContentModule>(
    config: SampleConfig,
    content: C,
) -> Result<ExitReason, SampleError> {
    let config = match overrides_path() {
        Some(path) => config.with_overrides_from(path)?,
        None => config,
    };
    let shutdown = install_interrupt_handler().unwrap_or_else(|err| {
        log::warn!("{err}");
        ShutdownSignal::new()
    });

    let mut sample = Sample::new(config, Box::new(GlfwPlatform), content).with_shutdown(shutdown);
    sample.init()?;
    let reason = sample.run();
    sample.destroy();
    reason
}
