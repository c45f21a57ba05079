//! GPU access for the samples
//!
//! Content modules never touch the `gl` crate directly. They go through
//! [`GraphicsDevice`], which keeps the unsafe driver calls in one place and
//! lets the headless backend record the same calls in tests.

pub mod device;
pub mod gl_device;
pub mod resources;
pub mod shader;

pub use device::{
    BufferTarget, BufferUsage, ClearMask, FramebufferTarget, GraphicsDevice, GraphicsError,
    GraphicsResult, ResourceCounts, ResourceKind, ShaderStage, TextureTarget, VertexAttrib,
};
pub use gl_device::GlDevice;
pub use resources::GpuHandle;
pub use shader::{load_shaders, ShaderPaths};
