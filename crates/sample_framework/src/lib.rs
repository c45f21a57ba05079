//! # Sample Framework
//!
//! The shared shell behind a set of small OpenGL samples: one GLFW window
//! with a core-profile context, an `init → run → destroy` lifecycle, and a
//! four-hook [`ContentModule`] trait that each sample implements.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sample_framework::prelude::*;
//!
//! struct Clear;
//!
//! impl ContentModule for Clear {
//!     fn allocate(&mut self, ctx: &SampleContext) -> Result<(), SampleError> {
//!         ctx.device.set_clear_color([0.0, 0.0, 0.3, 0.0]);
//!         Ok(())
//!     }
//!
//!     fn release(&mut self) {}
//!
//!     fn update(&mut self, _ctx: &SampleContext, _dt: f32) -> Result<(), SampleError> {
//!         Ok(())
//!     }
//!
//!     fn render(&mut self, ctx: &SampleContext) -> Result<(), SampleError> {
//!         ctx.device.clear(ClearMask::COLOR);
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), SampleError> {
//!     let mut sample = Sample::new(SampleConfig::default(), Box::new(GlfwPlatform), Clear)
//!         .with_shutdown(install_interrupt_handler()?);
//!     sample.init()?;
//!     sample.run()?;
//!     sample.destroy();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod foundation;
pub mod gpu;
pub mod headless;
pub mod shutdown;
pub mod window;

mod application;
mod sample;

pub use application::{ContentModule, SampleContext, SampleError};
pub use sample::{ExitReason, Sample, SampleState};

/// Common imports for sample authors
pub mod prelude {
    pub use crate::{
        config::{Config, SampleConfig, WindowConfig},
        foundation::{
            math::{Camera, Mat4, Point3, Transform, Vec3},
            time::Timer,
        },
        gpu::{
            load_shaders, BufferTarget, BufferUsage, ClearMask, FramebufferTarget, GpuHandle,
            GraphicsDevice, ResourceKind, ShaderPaths, TextureTarget, VertexAttrib,
        },
        shutdown::{install_interrupt_handler, ShutdownSignal},
        window::{GlfwPlatform, Platform},
        ContentModule, ExitReason, Sample, SampleContext, SampleError, SampleState,
    };
}
