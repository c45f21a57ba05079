//! Window management subsystem
//!
//! The window subsystem follows a layered architecture:
//!
//! ```text
//! ┌─────────────────────────────────┐
//! │     Sample lifecycle            │
//! └─────────────┬───────────────────┘
//!               │ Uses
//!        ┌──────▼──────┐
//!        │ WindowShell │ ← Owning handle (handle.rs)
//!        └──────┬──────┘
//!               │ Uses
//!      ┌────────▼────────┐
//!      │ WindowBackend   │ ← Backend contract (backend.rs)
//!      └────────┬────────┘
//!               │ Implemented by
//!   ┌───────────▼───────────┐
//!   │ GlfwWindow            │ ← GLFW + OpenGL (glfw_window.rs)
//!   │ HeadlessWindow        │ ← Scripted, for tests (crate::headless)
//!   └───────────────────────┘
//! ```

pub mod backend;
pub mod glfw_window;
pub mod handle;

pub use backend::{Platform, ShellEvent, WindowBackend, WindowError, WindowResult};
pub use glfw_window::{GlfwPlatform, GlfwWindow};
pub use handle::WindowShell;
