//! Content module trait and sample-level errors

use crate::config::ConfigError;
use crate::gpu::{GraphicsDevice, GraphicsError};
use crate::shutdown::ShutdownError;
use crate::window::WindowError;
use std::rc::Rc;
use thiserror::Error;

/// Demo-specific half of a sample
///
/// Implement this trait to create a sample. The lifecycle calls the hooks in
/// a fixed order: `allocate` once, then `update` and `render` once per frame,
/// then `release` once. Keep GPU objects in [`crate::gpu::GpuHandle`] fields
/// so that `release` is just dropping them.
pub trait ContentModule {
    /// Create GPU objects
    ///
    /// Called once after the window and context exist. On error the
    /// lifecycle calls [`ContentModule::release`] and closes the window.
    fn allocate(&mut self, ctx: &SampleContext) -> Result<(), SampleError>;

    /// Drop every GPU object created by `allocate`
    fn release(&mut self);

    /// Advance per-frame state
    ///
    /// # Arguments
    /// * `ctx` - Device and current framebuffer size
    /// * `delta_time` - Time since last frame in seconds, 0 on the first frame
    fn update(&mut self, ctx: &SampleContext, delta_time: f32) -> Result<(), SampleError>;

    /// Issue this frame's draw calls
    fn render(&mut self, ctx: &SampleContext) -> Result<(), SampleError>;
}

/// What the hooks get to see of the running sample
#[derive(Clone)]
pub struct SampleContext {
    /// Device of the sample's window
    pub device: Rc<dyn GraphicsDevice>,
    /// Framebuffer width in pixels
    pub width: u32,
    /// Framebuffer height in pixels
    pub height: u32,
}

impl SampleContext {
    /// Width over height, with a zero height treated as 1
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Sample-level errors
#[derive(Error, Debug)]
pub enum SampleError {
    /// Window or context creation failed
    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    /// A graphics call failed
    #[error("Graphics error: {0}")]
    Graphics(#[from] GraphicsError),

    /// Configuration could not be loaded or is invalid
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The interrupt handler could not be installed
    #[error("Shutdown hook error: {0}")]
    Shutdown(#[from] ShutdownError),

    /// A lifecycle call arrived in the wrong state
    #[error("Cannot {operation} a sample that is {state:?}")]
    InvalidState {
        /// Rejected call
        operation: &'static str,
        /// State at the time of the call
        state: crate::sample::SampleState,
    },

    /// Content module specific failure
    #[error("Content error: {0}")]
    Content(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessDevice;

    #[test]
    fn test_aspect_ratio_guards_zero_height() {
        let ctx = SampleContext {
            device: Rc::new(HeadlessDevice::new()),
            width: 640,
            height: 0,
        };
        assert_eq!(ctx.aspect_ratio(), 640.0);

        let ctx = SampleContext { height: 480, ..ctx };
        assert!((ctx.aspect_ratio() - 4.0 / 3.0).abs() < f32::EPSILON);
    }
}
