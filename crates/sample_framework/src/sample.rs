//! Sample lifecycle
//!
//! ```text
//! Uninitialized ──init()──▶ Initialized ──run()──▶ Running
//!       │                        │                    │
//!       └──────── destroy() ─────┴──── destroy() ─────┴──▶ Destroyed
//! ```
//!
//! `init` opens the window and then allocates content; `run` loops
//! update → render → present until the window closes or a shutdown is
//! requested; `destroy` releases content and closes the window. `destroy`
//! is idempotent and also runs on drop.

use crate::application::{ContentModule, SampleContext, SampleError};
use crate::config::SampleConfig;
use crate::foundation::time::Timer;
use crate::shutdown::ShutdownSignal;
use crate::window::{Platform, WindowShell};

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleState {
    /// Nothing opened yet, or `init` failed
    Uninitialized,
    /// Window open and content allocated
    Initialized,
    /// `run` has started
    Running,
    /// Torn down; terminal
    Destroyed,
}

/// Why `run` returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The window was asked to close
    WindowClosed,
    /// The shutdown signal was raised
    Interrupted,
}

/// A window plus one content module
pub struct Sample<C: ContentModule> {
    config: SampleConfig,
    platform: Box<dyn Platform>,
    shutdown: ShutdownSignal,
    content: C,
    shell: Option<WindowShell>,
    context: Option<SampleContext>,
    state: SampleState,
    allocated: bool,
    timer: Timer,
}

impl<C: ContentModule> Sample<C> {
    /// Create an uninitialized sample
    pub fn new(config: SampleConfig, platform: Box<dyn Platform>, content: C) -> Self {
        Self {
            config,
            platform,
            shutdown: ShutdownSignal::new(),
            content,
            shell: None,
            context: None,
            state: SampleState::Uninitialized,
            allocated: false,
            timer: Timer::new(),
        }
    }

    /// Stop the render loop when `shutdown` is raised
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: ShutdownSignal) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Open the window, then allocate content
    pub fn init(&mut self) -> Result<(), SampleError> {
        if self.state != SampleState::Uninitialized {
            return Err(SampleError::InvalidState {
                operation: "init",
                state: self.state,
            });
        }
        self.config.validate()?;

        let shell = WindowShell::open(self.platform.as_ref(), &self.config.window)?;
        let (width, height) = shell.size();
        let Some(device) = shell.device() else {
            return Err(SampleError::Content("window opened without a device".to_string()));
        };
        let context = SampleContext { device, width, height };
        self.shell = Some(shell);

        if let Err(err) = self.content.allocate(&context) {
            log::error!("Content allocation failed: {err}");
            self.content.release();
            drop(context);
            self.close_shell();
            return Err(err);
        }

        self.allocated = true;
        self.context = Some(context);
        self.state = SampleState::Initialized;
        log::info!("Sample \"{}\" initialized", self.config.window.title);
        Ok(())
    }

    /// Loop until the window closes or shutdown is requested
    pub fn run(&mut self) -> Result<ExitReason, SampleError> {
        if self.state != SampleState::Initialized {
            return Err(SampleError::InvalidState {
                operation: "run",
                state: self.state,
            });
        }
        let (Some(shell), Some(context)) = (self.shell.as_mut(), self.context.as_mut()) else {
            return Err(SampleError::Content("initialized sample lost its window".to_string()));
        };
        self.state = SampleState::Running;
        log::info!("Starting main loop...");

        let reason = loop {
            if self.shutdown.is_requested() {
                shell.request_close();
                break ExitReason::Interrupted;
            }
            if shell.should_close() {
                break ExitReason::WindowClosed;
            }

            let delta_time = self.timer.tick();
            self.content.update(context, delta_time)?;
            self.content.render(context)?;

            shell.poll_and_swap();
            (context.width, context.height) = shell.size();
        };

        log::info!(
            "Main loop finished after {} frames ({:.1} fps): {reason:?}",
            self.timer.frame_count(),
            self.timer.average_fps()
        );
        Ok(reason)
    }

    /// Release content and close the window; safe in every state
    pub fn destroy(&mut self) {
        if self.state == SampleState::Destroyed {
            return;
        }
        if self.allocated {
            self.content.release();
            self.allocated = false;
        }
        self.context = None;
        self.close_shell();
        self.state = SampleState::Destroyed;
        log::info!("Sample \"{}\" destroyed", self.config.window.title);
    }

    /// Current lifecycle state
    pub const fn state(&self) -> SampleState {
        self.state
    }

    /// The content module
    pub const fn content(&self) -> &C {
        &self.content
    }

    /// Frames rendered so far
    pub const fn frames(&self) -> u64 {
        self.timer.frame_count()
    }

    fn close_shell(&mut self) {
        if let Some(mut shell) = self.shell.take() {
            shell.close();
        }
    }
}

impl<C: ContentModule> Drop for Sample<C> {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::{GpuHandle, GraphicsDevice, ResourceKind};
    use crate::headless::HeadlessPlatform;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Journal of hook calls shared with the test body
    type Journal = Rc<RefCell<Vec<String>>>;

    #[derive(Default)]
    struct Recorder {
        journal: Journal,
        deltas: Rc<RefCell<Vec<f32>>>,
        buffer: Option<GpuHandle>,
        fail_allocate: bool,
        interrupt_on_frame: Option<(usize, ShutdownSignal)>,
    }

    impl ContentModule for Recorder {
        fn allocate(&mut self, ctx: &SampleContext) -> Result<(), SampleError> {
            self.journal.borrow_mut().push("allocate".into());
            self.buffer = Some(GpuHandle::new(&ctx.device, ResourceKind::Buffer)?);
            if self.fail_allocate {
                return Err(SampleError::Content("recorder refused".into()));
            }
            Ok(())
        }

        fn release(&mut self) {
            self.journal.borrow_mut().push("release".into());
            self.buffer = None;
        }

        fn update(&mut self, _ctx: &SampleContext, delta_time: f32) -> Result<(), SampleError> {
            self.journal.borrow_mut().push("update".into());
            self.deltas.borrow_mut().push(delta_time);
            if let Some((frame, signal)) = &self.interrupt_on_frame {
                if self.deltas.borrow().len() == *frame {
                    signal.request();
                }
            }
            Ok(())
        }

        fn render(&mut self, ctx: &SampleContext) -> Result<(), SampleError> {
            self.journal.borrow_mut().push("render".into());
            ctx.device.draw_arrays(0, 3);
            Ok(())
        }
    }

    fn count(journal: &Journal, hook: &str) -> usize {
        journal.borrow().iter().filter(|entry| *entry == hook).count()
    }

    #[test]
    fn test_full_lifecycle_until_window_closes() {
        let platform = HeadlessPlatform::new().close_after_frames(3);
        let (device, stats) = (platform.device(), platform.stats());
        let recorder = Recorder::default();
        let journal = recorder.journal.clone();

        let mut sample = Sample::new(SampleConfig::default(), Box::new(platform), recorder);
        sample.init().expect("init");
        assert_eq!(sample.state(), SampleState::Initialized);

        assert_eq!(sample.run().expect("run"), ExitReason::WindowClosed);
        assert_eq!(sample.state(), SampleState::Running);
        assert_eq!(sample.frames(), 3);

        sample.destroy();
        assert_eq!(sample.state(), SampleState::Destroyed);
        assert_eq!(
            *journal.borrow(),
            ["allocate", "update", "render", "update", "render", "update", "render", "release"]
        );
        assert_eq!(stats.swaps(), 3);
        assert_eq!(stats.closed(), 1);
        assert_eq!(device.live_resources().total(), 0);
    }

    #[test]
    fn test_window_failure_skips_allocate() {
        let platform = HeadlessPlatform::new().failing_to_open();
        let stats = platform.stats();
        let recorder = Recorder::default();
        let journal = recorder.journal.clone();

        let mut sample = Sample::new(SampleConfig::default(), Box::new(platform), recorder);
        assert!(matches!(sample.init(), Err(SampleError::Window(_))));
        assert_eq!(sample.state(), SampleState::Uninitialized);

        sample.destroy();
        sample.destroy();
        assert!(journal.borrow().is_empty());
        assert_eq!(stats.closed(), 0);
    }

    #[test]
    fn test_allocate_failure_cleans_up() {
        let platform = HeadlessPlatform::new();
        let (device, stats) = (platform.device(), platform.stats());
        let recorder = Recorder {
            fail_allocate: true,
            ..Recorder::default()
        };
        let journal = recorder.journal.clone();

        let mut sample = Sample::new(SampleConfig::default(), Box::new(platform), recorder);
        assert!(sample.init().is_err());
        assert_eq!(sample.state(), SampleState::Uninitialized);
        assert_eq!(stats.closed(), 1);
        assert_eq!(device.live_resources().total(), 0);

        drop(sample);
        assert_eq!(count(&journal, "release"), 1);
        assert_eq!(stats.closed(), 1);
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let platform = HeadlessPlatform::new();
        let stats = platform.stats();
        let recorder = Recorder::default();
        let journal = recorder.journal.clone();

        let mut sample = Sample::new(SampleConfig::default(), Box::new(platform), recorder);
        sample.init().expect("init");
        sample.destroy();
        sample.destroy();
        drop(sample);

        assert_eq!(count(&journal, "release"), 1);
        assert_eq!(stats.opened(), 1);
        assert_eq!(stats.closed(), 1);
    }

    #[test]
    fn test_deltas_start_at_zero_and_never_go_negative() {
        let platform = HeadlessPlatform::new().close_after_frames(20);
        let recorder = Recorder::default();
        let deltas = recorder.deltas.clone();

        let mut sample = Sample::new(SampleConfig::default(), Box::new(platform), recorder);
        sample.init().expect("init");
        sample.run().expect("run");

        let deltas = deltas.borrow();
        assert_eq!(deltas.len(), 20);
        assert_eq!(deltas[0], 0.0);
        assert!(deltas.iter().all(|dt| *dt >= 0.0));
    }

    #[test]
    fn test_interrupt_and_close_tear_down_alike() {
        fn teardown(interrupt: bool) -> (ExitReason, Vec<String>, u32, usize) {
            let platform = HeadlessPlatform::new().close_after_frames(4);
            let (device, stats) = (platform.device(), platform.stats());
            let signal = ShutdownSignal::new();
            let recorder = Recorder {
                interrupt_on_frame: interrupt.then(|| (2, signal.clone())),
                ..Recorder::default()
            };
            let journal = recorder.journal.clone();

            let mut sample = Sample::new(SampleConfig::default(), Box::new(platform), recorder)
                .with_shutdown(signal);
            sample.init().expect("init");
            let reason = sample.run().expect("run");
            sample.destroy();

            let hooks: Vec<String> = journal
                .borrow()
                .iter()
                .filter(|entry| *entry == "allocate" || *entry == "release")
                .cloned()
                .collect();
            (reason, hooks, stats.closed(), device.live_resources().total())
        }

        let (closed_reason, closed_hooks, closed_windows, closed_live) = teardown(false);
        let (interrupt_reason, interrupt_hooks, interrupt_windows, interrupt_live) = teardown(true);

        assert_eq!(closed_reason, ExitReason::WindowClosed);
        assert_eq!(interrupt_reason, ExitReason::Interrupted);
        assert_eq!(closed_hooks, interrupt_hooks);
        assert_eq!(closed_windows, interrupt_windows);
        assert_eq!(closed_live, 0);
        assert_eq!(interrupt_live, 0);
    }

    #[test]
    fn test_out_of_order_calls_are_rejected() {
        let platform = Box::new(HeadlessPlatform::new());
        let mut sample = Sample::new(SampleConfig::default(), platform, Recorder::default());
        assert!(matches!(sample.run(), Err(SampleError::InvalidState { operation: "run", .. })));

        sample.init().expect("init");
        assert!(matches!(sample.init(), Err(SampleError::InvalidState { operation: "init", .. })));

        sample.destroy();
        assert!(matches!(sample.run(), Err(SampleError::InvalidState { .. })));
    }

    #[test]
    fn test_invalid_config_never_opens_a_window() {
        let platform = HeadlessPlatform::new();
        let stats = platform.stats();
        let mut config = SampleConfig::default();
        config.window.width = 0;

        let mut sample = Sample::new(config, Box::new(platform), Recorder::default());
        assert!(matches!(sample.init(), Err(SampleError::Config(_))));
        assert_eq!(stats.opened(), 0);
    }
}
