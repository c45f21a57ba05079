//! Process-wide interrupt handling
//!
//! One Ctrl-C handler per process flips a shared [`ShutdownSignal`]. The
//! render loop checks the signal once per frame and leaves through the same
//! teardown as a normal window close; the handler itself never touches the
//! window or the GPU.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use thiserror::Error;

/// Interrupt handler errors
#[derive(Error, Debug)]
pub enum ShutdownError {
    /// The OS handler could not be registered
    #[error("Cannot catch interrupt signal: {0}")]
    Install(#[from] ctrlc::Error),
}

/// Shared "please stop" flag
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    requested: Arc<AtomicBool>,
}

impl ShutdownSignal {
    /// A fresh signal not connected to any OS handler
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every holder of this signal to stop
    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    /// Whether a stop was requested
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

static INTERRUPT: OnceLock<ShutdownSignal> = OnceLock::new();

/// Install the Ctrl-C handler once and return the signal it raises
///
/// Later calls return the same signal without registering again.
pub fn install_interrupt_handler() -> Result<ShutdownSignal, ShutdownError> {
    if let Some(signal) = INTERRUPT.get() {
        return Ok(signal.clone());
    }

    let signal = ShutdownSignal::new();
    let handler_signal = signal.clone();
    ctrlc::set_handler(move || {
        log::info!("interrupted!");
        handler_signal.request();
    })?;

    Ok(INTERRUPT.get_or_init(|| signal).clone())
}
