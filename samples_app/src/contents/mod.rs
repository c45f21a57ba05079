//! One content module per sample

pub mod framebuffer;
pub mod hello;
pub mod instancing;
pub mod mesh;
pub mod transform;
pub mod transform3d;
pub mod triangle;

pub use framebuffer::FramebufferSample;
pub use hello::HelloSample;
pub use instancing::{InstancingSample, INSTANCE_COUNT};
pub use mesh::{TriangleMesh, TRIANGLE_VERTICES};
pub use transform::TransformSample;
pub use transform3d::Transform3dSample;
pub use triangle::TriangleSample;

/// Background shared by the drawing samples
pub const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.3, 0.0];
