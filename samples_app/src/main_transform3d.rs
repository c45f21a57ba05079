//! Triangle turning under a perspective camera

use sample_framework::foundation::logging::{self, LevelFilter};
use sample_framework::ExitReason;
use samples_app::contents::Transform3dSample;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init(LevelFilter::Info);
    log::info!("Starting 3D transform sample");

    match samples_app::launch(Transform3dSample::config(), Transform3dSample::default())? {
        ExitReason::WindowClosed => log::info!("Window closed, exiting"),
        ExitReason::Interrupted => log::info!("Interrupted, exiting"),
    }
    Ok(())
}
