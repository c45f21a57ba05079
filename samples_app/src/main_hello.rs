//! Empty window with a core-profile context

use sample_framework::foundation::logging::{self, LevelFilter};
use sample_framework::ExitReason;
use samples_app::contents::HelloSample;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init(LevelFilter::Info);
    log::info!("Starting hello sample");

    match samples_app::launch(HelloSample::config(), HelloSample::default())? {
        ExitReason::WindowClosed => log::info!("Window closed, exiting"),
        ExitReason::Interrupted => log::info!("Interrupted, exiting"),
    }
    Ok(())
}
