//! A single static triangle

use super::{TriangleMesh, CLEAR_COLOR};
use crate::shader_paths;
use sample_framework::prelude::*;

/// Clears the window and draws one red triangle
#[derive(Debug, Default)]
pub struct TriangleSample {
    mesh: Option<TriangleMesh>,
    program: Option<GpuHandle>,
}

impl TriangleSample {
    /// Window settings for this sample
    pub fn config() -> SampleConfig {
        SampleConfig::titled("Triangle")
    }
}

impl ContentModule for TriangleSample {
    fn allocate(&mut self, ctx: &SampleContext) -> Result<(), SampleError> {
        ctx.device.set_clear_color(CLEAR_COLOR);
        let paths = shader_paths("triangle.vert", "triangle.frag");
        self.program = Some(load_shaders(&ctx.device, &paths)?);
        self.mesh = Some(TriangleMesh::upload(&ctx.device)?);
        Ok(())
    }

    fn release(&mut self) {
        self.mesh = None;
        self.program = None;
    }

    fn update(&mut self, _ctx: &SampleContext, _delta_time: f32) -> Result<(), SampleError> {
        Ok(())
    }

    fn render(&mut self, ctx: &SampleContext) -> Result<(), SampleError> {
        let (Some(mesh), Some(program)) = (&self.mesh, &self.program) else {
            return Err(SampleError::Content("triangle sample rendered before allocate".into()));
        };
        let device = ctx.device.as_ref();

        device.viewport(0, 0, ctx.width, ctx.height);
        device.clear(ClearMask::COLOR);
        device.use_program(program.id());
        mesh.draw(device);
        device.use_program(0);
        Ok(())
    }
}
