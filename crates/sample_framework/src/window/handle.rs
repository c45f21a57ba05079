//! Owning window handle used by the sample lifecycle

use super::backend::{Platform, ShellEvent, WindowBackend, WindowResult};
use crate::config::WindowConfig;
use crate::gpu::GraphicsDevice;
use std::rc::Rc;

/// The OS window and its graphics context
///
/// Closing is idempotent: the backend is taken out on the first
/// [`WindowShell::close`] and every later call does nothing. Dropping an
/// open shell closes it.
pub struct WindowShell {
    backend: Option<Box<dyn WindowBackend>>,
    title: String,
    width: u32,
    height: u32,
    track_resize: bool,
}

impl WindowShell {
    /// Open a window through `platform`
    pub fn open(platform: &dyn Platform, config: &WindowConfig) -> WindowResult<Self> {
        let backend = platform.open_window(config)?;
        let (width, height) = backend.framebuffer_size();
        let driver = backend
            .device()
            .map_or_else(|| "unknown".to_string(), |device| device.version());
        log::info!("Opened \"{}\" ({width}x{height}), driver {driver}", config.title);

        Ok(Self {
            backend: Some(backend),
            title: config.title.clone(),
            width,
            height,
            track_resize: config.resizable,
        })
    }

    /// Present the finished frame, then drain the event queue
    pub fn poll_and_swap(&mut self) {
        let Some(backend) = self.backend.as_mut() else {
            return;
        };

        backend.swap_buffers();
        for event in backend.poll_events() {
            match event {
                ShellEvent::Resized { width, height } if self.track_resize => {
                    log::debug!("Window resized to {width}x{height}");
                    self.width = width;
                    self.height = height;
                }
                ShellEvent::Resized { .. } => {}
                ShellEvent::CloseRequested | ShellEvent::EscapePressed => {
                    backend.set_should_close(true);
                }
            }
        }
    }

    /// True once closing was requested or the window is gone
    pub fn should_close(&self) -> bool {
        self.backend.as_ref().map_or(true, |backend| backend.should_close())
    }

    /// Ask the window to close at the end of the current frame
    pub fn request_close(&mut self) {
        if let Some(backend) = self.backend.as_mut() {
            backend.set_should_close(true);
        }
    }

    /// Release the window and its context
    pub fn close(&mut self) {
        let Some(mut backend) = self.backend.take() else {
            return;
        };

        let leaked = backend
            .device()
            .map_or(0, |device| device.live_resources().total());
        if leaked > 0 {
            log::warn!("Closing \"{}\" with {leaked} GPU objects still alive", self.title);
        }
        backend.close();
        log::info!("Closed \"{}\"", self.title);
    }

    /// Whether [`Self::close`] has not run yet
    pub fn is_open(&self) -> bool {
        self.backend.is_some()
    }

    /// Device of the open window
    pub fn device(&self) -> Option<Rc<dyn GraphicsDevice>> {
        self.backend.as_ref().and_then(|backend| backend.device())
    }

    /// Drawable size as last reported
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Drop for WindowShell {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessPlatform;

    fn resizable() -> WindowConfig {
        WindowConfig {
            resizable: true,
            ..WindowConfig::default()
        }
    }

    #[test]
    fn test_close_is_idempotent() {
        let platform = HeadlessPlatform::new();
        let mut shell = WindowShell::open(&platform, &WindowConfig::default()).expect("open");
        assert!(shell.is_open());

        shell.close();
        shell.close();
        drop(shell);

        assert_eq!(platform.stats().opened(), 1);
        assert_eq!(platform.stats().closed(), 1);
    }

    #[test]
    fn test_open_failure_is_reported() {
        let platform = HeadlessPlatform::new().failing_to_open();
        assert!(WindowShell::open(&platform, &WindowConfig::default()).is_err());
        assert_eq!(platform.stats().closed(), 0);
    }

    #[test]
    fn test_resize_updates_size_when_resizable() {
        let resized = ShellEvent::Resized { width: 800, height: 600 };
        let platform = HeadlessPlatform::new().with_event_at(1, resized);
        let mut shell = WindowShell::open(&platform, &resizable()).expect("open");
        assert_eq!(shell.size(), (640, 480));

        shell.poll_and_swap();
        assert_eq!(shell.size(), (800, 600));
    }

    #[test]
    fn test_resize_ignored_for_fixed_window() {
        let resized = ShellEvent::Resized { width: 800, height: 600 };
        let platform = HeadlessPlatform::new().with_event_at(1, resized);
        let mut shell = WindowShell::open(&platform, &WindowConfig::default()).expect("open");

        shell.poll_and_swap();
        assert_eq!(shell.size(), (640, 480));
    }

    #[test]
    fn test_escape_requests_close() {
        let platform = HeadlessPlatform::new().with_event_at(2, ShellEvent::EscapePressed);
        let mut shell = WindowShell::open(&platform, &WindowConfig::default()).expect("open");

        shell.poll_and_swap();
        assert!(!shell.should_close());
        shell.poll_and_swap();
        assert!(shell.should_close());
        assert_eq!(platform.stats().swaps(), 2);
    }

    #[test]
    fn test_request_close_keeps_window_open() {
        let platform = HeadlessPlatform::new();
        let mut shell = WindowShell::open(&platform, &WindowConfig::default()).expect("open");

        shell.request_close();
        assert!(shell.should_close());
        assert!(shell.is_open());
        assert_eq!(platform.stats().closed(), 0);
    }

    #[test]
    fn test_closed_shell_reports_should_close() {
        let platform = HeadlessPlatform::new();
        let mut shell = WindowShell::open(&platform, &WindowConfig::default()).expect("open");
        shell.close();

        assert!(shell.should_close());
        assert!(shell.device().is_none());
        shell.poll_and_swap();
        assert_eq!(platform.stats().swaps(), 0);
    }
}
