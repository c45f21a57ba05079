//! Window-only sample: no GPU objects, no drawing

use sample_framework::prelude::*;

/// Opens a window and does nothing else
#[derive(Debug, Default)]
pub struct HelloSample;

impl HelloSample {
    /// Window settings for this sample
    pub fn config() -> SampleConfig {
        SampleConfig::titled("Hello World")
    }
}

impl ContentModule for HelloSample {
    fn allocate(&mut self, _ctx: &SampleContext) -> Result<(), SampleError> {
        Ok(())
    }

    fn release(&mut self) {}

    fn update(&mut self, _ctx: &SampleContext, _delta_time: f32) -> Result<(), SampleError> {
        Ok(())
    }

    fn render(&mut self, _ctx: &SampleContext) -> Result<(), SampleError> {
        Ok(())
    }
}
