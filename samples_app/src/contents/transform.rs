//! A triangle spinning in the screen plane

use super::{TriangleMesh, CLEAR_COLOR};
use crate::shader_paths;
use sample_framework::prelude::*;

/// Rotates a half-size triangle about Z, one radian per second
#[derive(Debug, Default)]
pub struct TransformSample {
    mesh: Option<TriangleMesh>,
    program: Option<GpuHandle>,
    model_location: Option<i32>,
    elapsed: f32,
}

impl TransformSample {
    /// Window settings for this sample
    pub fn config() -> SampleConfig {
        SampleConfig::titled("Transform")
    }

    /// Model matrix after `elapsed` seconds
    pub fn model_matrix(elapsed: f32) -> Mat4 {
        Transform::default()
            .with_axis_angle(&Vec3::z_axis(), elapsed)
            .with_scale(Vec3::new(0.5, 0.5, 1.0))
            .to_matrix()
    }

    /// Seconds accumulated by `update`
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

impl ContentModule for TransformSample {
    fn allocate(&mut self, ctx: &SampleContext) -> Result<(), SampleError> {
        ctx.device.set_clear_color(CLEAR_COLOR);
        let program = load_shaders(&ctx.device, &shader_paths("transform.vert", "transform.frag"))?;
        self.model_location = ctx.device.uniform_location(program.id(), "M");
        if self.model_location.is_none() {
            log::warn!("transform program has no active uniform M");
        }
        self.program = Some(program);
        self.mesh = Some(TriangleMesh::upload(&ctx.device)?);
        self.elapsed = 0.0;
        Ok(())
    }

    fn release(&mut self) {
        self.mesh = None;
        self.program = None;
        self.model_location = None;
    }

    fn update(&mut self, ctx: &SampleContext, delta_time: f32) -> Result<(), SampleError> {
        if let (Some(program), Some(location)) = (&self.program, self.model_location) {
            ctx.device.use_program(program.id());
            ctx.device.uniform_mat4(location, &Self::model_matrix(self.elapsed));
            ctx.device.use_program(0);
        }
        self.elapsed += delta_time;
        Ok(())
    }

    fn render(&mut self, ctx: &SampleContext) -> Result<(), SampleError> {
        let (Some(mesh), Some(program)) = (&self.mesh, &self.program) else {
            return Err(SampleError::Content("transform sample rendered before allocate".into()));
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
