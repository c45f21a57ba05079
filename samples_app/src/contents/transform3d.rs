//! A triangle turning about Y, seen through a perspective camera

use super::{TriangleMesh, CLEAR_COLOR};
use crate::shader_paths;
use sample_framework::prelude::*;

/// Model-view-projection sample
#[derive(Debug)]
pub struct Transform3dSample {
    camera: Camera,
    mesh: Option<TriangleMesh>,
    program: Option<GpuHandle>,
    mvp_location: Option<i32>,
    elapsed: f32,
}

impl Default for Transform3dSample {
    fn default() -> Self {
        Self {
            camera: Camera::looking_at_origin(Point3::new(4.0, 3.0, 3.0)),
            mesh: None,
            program: None,
            mvp_location: None,
            elapsed: 0.0,
        }
    }
}

impl Transform3dSample {
    /// Window settings for this sample
    pub fn config() -> SampleConfig {
        SampleConfig::titled("Transform 3D")
    }

    /// `P * V * M` after `elapsed` seconds
    pub fn mvp(&self, elapsed: f32, aspect: f32) -> Mat4 {
        let model = Transform::default()
            .with_axis_angle(&Vec3::y_axis(), elapsed)
            .to_matrix();
        self.camera.view_projection(aspect) * model
    }

    fn upload(&self, ctx: &SampleContext) {
        if let (Some(program), Some(location)) = (&self.program, self.mvp_location) {
            ctx.device.use_program(program.id());
            ctx.device.uniform_mat4(location, &self.mvp(self.elapsed, ctx.aspect_ratio()));
            ctx.device.use_program(0);
        }
    }
}

impl ContentModule for Transform3dSample {
    fn allocate(&mut self, ctx: &SampleContext) -> Result<(), SampleError> {
        ctx.device.set_clear_color(CLEAR_COLOR);
        self.mesh = Some(TriangleMesh::upload(&ctx.device)?);
        let program = load_shaders(&ctx.device, &shader_paths("mvp.vert", "mvp.frag"))?;
        self.mvp_location = ctx.device.uniform_location(program.id(), "MVP");
        self.program = Some(program);

        self.elapsed = 0.0;
        self.upload(ctx);
        Ok(())
    }

    fn release(&mut self) {
        self.mesh = None;
        self.program = None;
        self.mvp_location = None;
    }

    fn update(&mut self, ctx: &SampleContext, delta_time: f32) -> Result<(), SampleError> {
        self.upload(ctx);
        self.elapsed += delta_time;
        Ok(())
    }

    fn render(&mut self, ctx: &SampleContext) -> Result<(), SampleError> {
        let (Some(mesh), Some(program)) = (&self.mesh, &self.program) else {
            return Err(SampleError::Content("3D transform sample rendered before allocate".into()));
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
