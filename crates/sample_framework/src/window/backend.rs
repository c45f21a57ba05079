//! Backend-agnostic window contract

use crate::config::WindowConfig;
use crate::gpu::GraphicsDevice;
use std::rc::Rc;
use thiserror::Error;

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// The windowing library could not start
    #[error("Windowing system initialization failed: {0}")]
    InitializationFailed(String),

    /// The window or its context could not be created
    #[error("Window creation failed: {0}")]
    CreationFailed(String),
}

/// Result alias for window operations
pub type WindowResult<T> = Result<T, WindowError>;

/// Events the shell reacts to; everything else is dropped by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellEvent {
    /// Framebuffer size changed
    Resized {
        /// New width in pixels
        width: u32,
        /// New height in pixels
        height: u32,
    },
    /// The user asked the window to close
    CloseRequested,
    /// Escape was pressed
    EscapePressed,
}

/// Contract every window backend implements
///
/// Not `Send`: windows and their contexts stay on the thread that made them.
pub trait WindowBackend {
    /// Whether closing was requested by the user or the application
    fn should_close(&self) -> bool;

    /// Request or cancel closing
    fn set_should_close(&mut self, should_close: bool);

    /// Present the finished frame
    fn swap_buffers(&mut self);

    /// Drain pending events
    fn poll_events(&mut self) -> Vec<ShellEvent>;

    /// Current drawable size in pixels
    fn framebuffer_size(&self) -> (u32, u32);

    /// Device bound to this window's context, `None` once closed
    fn device(&self) -> Option<Rc<dyn GraphicsDevice>>;

    /// Destroy the window and its context
    ///
    /// [`crate::window::WindowShell`] calls this at most once.
    fn close(&mut self);
}

/// Factory for windows, chosen once per sample
pub trait Platform {
    /// Create a window and make its context current
    fn open_window(&self, config: &WindowConfig) -> WindowResult<Box<dyn WindowBackend>>;
}
