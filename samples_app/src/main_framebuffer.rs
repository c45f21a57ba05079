//! Offscreen render target blitted to the window

use sample_framework::foundation::logging::{self, LevelFilter};
use sample_framework::ExitReason;
use samples_app::contents::FramebufferSample;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init(LevelFilter::Info);
    log::info!("Starting framebuffer sample");

    match samples_app::launch(FramebufferSample::config(), FramebufferSample::default())? {
        ExitReason::WindowClosed => log::info!("Window closed, exiting"),
        ExitReason::Interrupted => log::info!("Interrupted, exiting"),
    }
    Ok(())
}
