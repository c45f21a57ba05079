//! The graphics device seam

use crate::foundation::math::Mat4;
use bitflags::bitflags;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Graphics errors
#[derive(Error, Debug)]
pub enum GraphicsError {
    /// The driver returned no name for a new object
    #[error("Failed to create {0}")]
    ResourceCreation(ResourceKind),

    /// A shader file could not be read
    #[error("Failed to read shader {path}: {source}")]
    ShaderIo {
        /// File that failed
        path: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// A shader stage did not compile
    #[error("{stage} shader compilation failed: {log}")]
    ShaderCompile {
        /// Failing stage
        stage: ShaderStage,
        /// Driver info log
        log: String,
    },

    /// The program did not link
    #[error("Program link failed: {log}")]
    ProgramLink {
        /// Driver info log
        log: String,
    },

    /// Framebuffer completeness check failed
    #[error("Framebuffer incomplete: status 0x{0:x}")]
    IncompleteFramebuffer(u32),

    /// The loader did not provide a required entry point
    #[error("OpenGL entry point {0} did not load")]
    MissingEntryPoint(&'static str),

    /// Mapping a buffer range returned null
    #[error("Failed to map {len} bytes of buffer at offset {offset}")]
    BufferMap {
        /// Byte offset of the range
        offset: usize,
        /// Byte length of the range
        len: usize,
    },
}

/// Result alias for device calls
pub type GraphicsResult<T> = Result<T, GraphicsError>;

/// Kinds of driver objects a sample can own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Vertex array object
    VertexArray,
    /// Buffer object
    Buffer,
    /// Texture object
    Texture,
    /// Framebuffer object
    Framebuffer,
    /// Linked shader program
    Program,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::VertexArray => "vertex array",
            Self::Buffer => "buffer",
            Self::Texture => "texture",
            Self::Framebuffer => "framebuffer",
            Self::Program => "program",
        };
        f.write_str(name)
    }
}

/// Shader pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    /// Vertex stage
    Vertex,
    /// Fragment stage
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

/// Buffer binding points used by the samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferTarget {
    /// Vertex attribute data
    Array,
    /// Storage behind a buffer texture
    Texture,
}

/// Buffer usage hint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Written once
    StaticDraw,
    /// Rewritten every frame
    DynamicDraw,
}

/// Texture binding points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureTarget {
    /// Regular 2D image
    Texture2D,
    /// Texture view over a buffer object
    Buffer,
}

/// Framebuffer binding points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramebufferTarget {
    /// Read and draw
    Both,
    /// Source of blits
    Read,
    /// Destination of draws and blits
    Draw,
}

bitflags! {
    /// Buffers cleared by [`GraphicsDevice::clear`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearMask: u32 {
        /// Color attachment
        const COLOR = 0b01;
        /// Depth attachment
        const DEPTH = 0b10;
    }
}

/// Float vertex attribute layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttrib {
    /// Attribute location
    pub index: u32,
    /// Floats per vertex
    pub components: i32,
    /// Byte stride, 0 for tightly packed
    pub stride: i32,
    /// Byte offset into the bound buffer
    pub offset: usize,
}

impl VertexAttrib {
    /// Tightly packed `vecN` at `index`
    pub const fn packed(index: u32, components: i32) -> Self {
        Self { index, components, stride: 0, offset: 0 }
    }
}

/// Live object bookkeeping shared by the device implementations
#[derive(Debug, Default, Clone)]
pub struct ResourceCounts {
    live: HashMap<ResourceKind, usize>,
}

impl ResourceCounts {
    /// Record a created object
    pub fn acquire(&mut self, kind: ResourceKind) {
        *self.live.entry(kind).or_default() += 1;
    }

    /// Record a deleted object
    pub fn release(&mut self, kind: ResourceKind) {
        match self.live.get_mut(&kind) {
            Some(count) if *count > 0 => *count -= 1,
            _ => log::warn!("Deleted a {kind} that was never counted as live"),
        }
    }

    /// Live objects of one kind
    pub fn live(&self, kind: ResourceKind) -> usize {
        self.live.get(&kind).copied().unwrap_or(0)
    }

    /// Live objects of every kind
    pub fn total(&self) -> usize {
        self.live.values().sum()
    }
}

/// The graphics calls the samples make
///
/// Object names are plain `u32`s, with `0` meaning "unbind" in every
/// `bind_*` call. Implementations use interior mutability for their
/// bookkeeping since the driver itself is global state.
pub trait GraphicsDevice {
    /// Human readable driver version
    fn version(&self) -> String;

    /// Create an empty object of `kind`; programs go through [`Self::create_program`]
    fn create(&self, kind: ResourceKind) -> GraphicsResult<u32>;

    /// Compile and link a program from GLSL sources
    fn create_program(&self, vertex_src: &str, fragment_src: &str) -> GraphicsResult<u32>;

    /// Delete an object created by this device
    fn delete(&self, kind: ResourceKind, id: u32);

    /// Objects created and not yet deleted
    fn live_resources(&self) -> ResourceCounts;

    /// Color used by [`Self::clear`]
    fn set_clear_color(&self, rgba: [f32; 4]);

    /// Clear the bound draw framebuffer
    fn clear(&self, mask: ClearMask);

    /// Set the viewport rectangle
    fn viewport(&self, x: i32, y: i32, width: u32, height: u32);

    /// Bind a vertex array
    fn bind_vertex_array(&self, id: u32);

    /// Bind a buffer
    fn bind_buffer(&self, target: BufferTarget, id: u32);

    /// Allocate and fill the buffer bound at `target`
    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage);

    /// Overwrite a range of the buffer bound at `target` through a write-only mapping
    fn write_buffer(&self, target: BufferTarget, offset: usize, data: &[u8]) -> GraphicsResult<()>;

    /// Describe a float attribute sourced from the bound array buffer
    fn vertex_attrib_pointer(&self, attrib: VertexAttrib);

    /// Enable or disable an attribute array
    fn set_vertex_attrib_enabled(&self, index: u32, enabled: bool);

    /// Make a program current
    fn use_program(&self, id: u32);

    /// Location of a uniform, `None` when the program has no such active uniform
    fn uniform_location(&self, program: u32, name: &str) -> Option<i32>;

    /// Upload a column-major matrix to the current program
    fn uniform_mat4(&self, location: i32, matrix: &Mat4);

    /// Upload an integer (or sampler unit) to the current program
    fn uniform_i32(&self, location: i32, value: i32);

    /// Select the active texture unit
    fn active_texture(&self, unit: u32);

    /// Bind a texture to the active unit
    fn bind_texture(&self, target: TextureTarget, id: u32);

    /// Attach `buffer` as RGBA32F storage to the bound buffer texture
    fn texture_buffer(&self, buffer: u32);

    /// (Re)specify RGBA8 storage for the bound 2D texture
    fn texture_storage_2d(&self, width: u32, height: u32);

    /// Bind a framebuffer
    fn bind_framebuffer(&self, target: FramebufferTarget, id: u32);

    /// Attach a 2D texture as color 0 of the bound framebuffer
    fn framebuffer_color_texture(&self, texture: u32);

    /// Check completeness of the bound framebuffer
    fn check_framebuffer(&self) -> GraphicsResult<()>;

    /// Copy color from the read framebuffer to the draw framebuffer
    fn blit_framebuffer(&self, src_size: (u32, u32), dst_size: (u32, u32));

    /// Non-indexed triangle draw
    fn draw_arrays(&self, first: i32, count: i32);

    /// Instanced non-indexed triangle draw
    fn draw_arrays_instanced(&self, first: i32, count: i32, instances: i32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_kind() {
        let mut counts = ResourceCounts::default();
        counts.acquire(ResourceKind::Buffer);
        counts.acquire(ResourceKind::Buffer);
        counts.acquire(ResourceKind::Program);
        counts.release(ResourceKind::Buffer);

        assert_eq!(counts.live(ResourceKind::Buffer), 1);
        assert_eq!(counts.live(ResourceKind::Program), 1);
        assert_eq!(counts.live(ResourceKind::Texture), 0);
        assert_eq!(counts.total(), 2);
    }

    #[test]
    fn test_release_never_underflows() {
        let mut counts = ResourceCounts::default();
        counts.release(ResourceKind::Framebuffer);
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn test_clear_mask_combines() {
        let mask = ClearMask::COLOR | ClearMask::DEPTH;
        assert!(mask.contains(ClearMask::COLOR));
        assert!(mask.contains(ClearMask::DEPTH));
    }
}
