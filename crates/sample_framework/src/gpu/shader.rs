//! GLSL program loading

use super::device::{GraphicsDevice, GraphicsError, GraphicsResult};
use super::resources::GpuHandle;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Locations of one vertex/fragment pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderPaths {
    /// Vertex shader source file
    pub vertex: PathBuf,
    /// Fragment shader source file
    pub fragment: PathBuf,
}

impl ShaderPaths {
    /// Explicit paths
    pub fn new(vertex: impl Into<PathBuf>, fragment: impl Into<PathBuf>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    /// Find each file in the first directory of `search_dirs` that holds it
    ///
    /// Samples can be started from the workspace root or from their own
    /// crate directory, so several locations are tried. Files that are not
    /// found anywhere resolve to `shaders/<name>` and fail on load.
    pub fn resolve<P: AsRef<Path>>(search_dirs: &[P], vertex: &str, fragment: &str) -> Self {
        let find = |name: &str| {
            search_dirs
                .iter()
                .map(|dir| dir.as_ref().join(name))
                .find(|candidate| candidate.is_file())
                .unwrap_or_else(|| Path::new("shaders").join(name))
        };

        Self {
            vertex: find(vertex),
            fragment: find(fragment),
        }
    }
}

fn read_source(path: &Path) -> GraphicsResult<String> {
    std::fs::read_to_string(path).map_err(|source| GraphicsError::ShaderIo {
        path: path.display().to_string(),
        source,
    })
}

/// Read, compile and link a program
pub fn load_shaders(
    device: &Rc<dyn GraphicsDevice>,
    paths: &ShaderPaths,
) -> GraphicsResult<GpuHandle> {
    log::debug!(
        "Loading shaders {} + {}",
        paths.vertex.display(),
        paths.fragment.display()
    );
    let vertex_src = read_source(&paths.vertex)?;
    let fragment_src = read_source(&paths.fragment)?;
    GpuHandle::program(device, &vertex_src, &fragment_src)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessDevice;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("sample_shaders_{}_{name}", std::process::id()));
        fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    #[test]
    fn test_resolve_prefers_earlier_directories() {
        let first = scratch_dir("first");
        let second = scratch_dir("second");
        fs::write(first.join("a.frag"), "void main() {}").expect("write");
        fs::write(second.join("a.vert"), "void main() {}").expect("write");
        fs::write(second.join("a.frag"), "void main() {}").expect("write");

        let paths = ShaderPaths::resolve(&[&first, &second], "a.vert", "a.frag");
        assert_eq!(paths.vertex, second.join("a.vert"));
        assert_eq!(paths.fragment, first.join("a.frag"));

        let _ = fs::remove_dir_all(first);
        let _ = fs::remove_dir_all(second);
    }

    #[test]
    fn test_missing_file_falls_back_and_fails_to_load() {
        let paths = ShaderPaths::resolve::<PathBuf>(&[], "nope.vert", "nope.frag");
        assert_eq!(paths.vertex, Path::new("shaders").join("nope.vert"));

        let device: Rc<dyn GraphicsDevice> = Rc::new(HeadlessDevice::new());
        let err = load_shaders(&device, &paths).unwrap_err();
        assert!(matches!(err, GraphicsError::ShaderIo { .. }));
    }

    #[test]
    fn test_link_failure_is_reported() {
        let dir = scratch_dir("link");
        fs::write(dir.join("s.vert"), "void main() {}").expect("write");
        fs::write(dir.join("s.frag"), "void main() {}").expect("write");

        let headless = Rc::new(HeadlessDevice::new());
        headless.fail_linking();
        let device: Rc<dyn GraphicsDevice> = headless.clone();

        let paths = ShaderPaths::resolve(&[&dir], "s.vert", "s.frag");
        let err = load_shaders(&device, &paths).unwrap_err();
        assert!(matches!(err, GraphicsError::ProgramLink { .. }));
        assert_eq!(headless.live_resources().total(), 0);

        let _ = fs::remove_dir_all(dir);
    }
}
