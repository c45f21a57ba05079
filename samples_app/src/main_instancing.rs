//! Four instanced triangles fed from a buffer texture

use sample_framework::foundation::logging::{self, LevelFilter};
use sample_framework::ExitReason;
use samples_app::contents::InstancingSample;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init(LevelFilter::Info);
    log::info!("Starting instancing sample");

    match samples_app::launch(InstancingSample::config(), InstancingSample::default())? {
        ExitReason::WindowClosed => log::info!("Window closed, exiting"),
        ExitReason::Interrupted => log::info!("Interrupted, exiting"),
    }
    Ok(())
}
