//! GLFW window with an OpenGL core-profile context

use super::backend::{Platform, ShellEvent, WindowBackend, WindowError, WindowResult};
use crate::config::WindowConfig;
use crate::gpu::{GlDevice, GraphicsDevice};
use glfw::{Action, Context, Key, WindowEvent};
use std::rc::Rc;

/// Opens [`GlfwWindow`]s
#[derive(Debug, Default, Clone, Copy)]
pub struct GlfwPlatform;

impl Platform for GlfwPlatform {
    fn open_window(&self, config: &WindowConfig) -> WindowResult<Box<dyn WindowBackend>> {
        Ok(Box::new(GlfwWindow::new(config)?))
    }
}

struct Inner {
    // Dropped first: the device must not outlive the context it loaded from
    device: Rc<GlDevice>,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, WindowEvent)>,
    glfw: glfw::Glfw,
}

/// GLFW window wrapper; the context is current on the creating thread
pub struct GlfwWindow {
    inner: Option<Inner>,
}

impl GlfwWindow {
    /// Create the window, make its context current and load GL
    pub fn new(config: &WindowConfig) -> WindowResult<Self> {
        let mut glfw = glfw::init(|error, description| {
            log::error!("GLFW error {error:?}: {description}");
        })
        .map_err(|e| WindowError::InitializationFailed(format!("{e:?}")))?;

        let (major, minor) = config.gl_version;
        let samples = (config.samples > 0).then_some(config.samples);
        glfw.window_hint(glfw::WindowHint::Samples(samples));
        glfw.window_hint(glfw::WindowHint::ContextVersion(major, minor));
        glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));
        glfw.window_hint(glfw::WindowHint::OpenGlProfile(glfw::OpenGlProfileHint::Core));
        glfw.window_hint(glfw::WindowHint::Resizable(config.resizable));

        let (mut window, events) = glfw
            .create_window(config.width, config.height, &config.title, glfw::WindowMode::Windowed)
            .ok_or_else(|| {
                WindowError::CreationFailed(format!(
                    "{}x{} window with an OpenGL {major}.{minor} core context",
                    config.width, config.height
                ))
            })?;

        window.make_current();
        glfw.set_swap_interval(if config.vsync {
            glfw::SwapInterval::Sync(1)
        } else {
            glfw::SwapInterval::None
        });

        window.set_key_polling(true);
        window.set_close_polling(true);
        window.set_framebuffer_size_polling(true);

        let device = GlDevice::load_with(|symbol| window.get_proc_address(symbol) as *const _)
            .map_err(|e| WindowError::CreationFailed(e.to_string()))?;
        let device = Rc::new(device);
        device.set_clear_color([0.0, 0.0, 0.0, 0.0]);

        Ok(Self {
            inner: Some(Inner {
                device,
                window,
                events,
                glfw,
            }),
        })
    }
}

impl WindowBackend for GlfwWindow {
    fn should_close(&self) -> bool {
        self.inner.as_ref().map_or(true, |inner| inner.window.should_close())
    }

    fn set_should_close(&mut self, should_close: bool) {
        if let Some(inner) = self.inner.as_mut() {
            inner.window.set_should_close(should_close);
        }
    }

    fn swap_buffers(&mut self) {
        if let Some(inner) = self.inner.as_mut() {
            inner.window.swap_buffers();
        }
    }

    fn poll_events(&mut self) -> Vec<ShellEvent> {
        let Some(inner) = self.inner.as_mut() else {
            return Vec::new();
        };

        inner.glfw.poll_events();
        glfw::flush_messages(&inner.events)
            .filter_map(|(_, event)| match event {
                WindowEvent::FramebufferSize(width, height) => Some(ShellEvent::Resized {
                    width: u32::try_from(width).unwrap_or(0),
                    height: u32::try_from(height).unwrap_or(0),
                }),
                WindowEvent::Close => Some(ShellEvent::CloseRequested),
                WindowEvent::Key(Key::Escape, _, Action::Press, _) => {
                    Some(ShellEvent::EscapePressed)
                }
                _ => None,
            })
            .collect()
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        self.inner.as_ref().map_or((0, 0), |inner| {
            let (width, height) = inner.window.get_framebuffer_size();
            (u32::try_from(width).unwrap_or(0), u32::try_from(height).unwrap_or(0))
        })
    }

    fn device(&self) -> Option<Rc<dyn GraphicsDevice>> {
        self.inner
            .as_ref()
            .map(|inner| Rc::clone(&inner.device) as Rc<dyn GraphicsDevice>)
    }

    fn close(&mut self) {
        if let Some(inner) = self.inner.take() {
            if Rc::strong_count(&inner.device) > 1 {
                log::warn!("GL device still referenced while its context is destroyed");
            }
            // Window is destroyed before the last Glfw handle terminates the library
            drop(inner);
        }
    }
}

impl Drop for GlfwWindow {
    fn drop(&mut self) {
        self.close();
    }
}
