//! Triangle spinning in the screen plane

use sample_framework::foundation::logging::{self, LevelFilter};
use sample_framework::ExitReason;
use samples_app::contents::TransformSample;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init(LevelFilter::Info);
    log::info!("Starting transform sample");

    match samples_app::launch(TransformSample::config(), TransformSample::default())? {
        ExitReason::WindowClosed => log::info!("Window closed, exiting"),
        ExitReason::Interrupted => log::info!("Interrupted, exiting"),
    }
    Ok(())
}
