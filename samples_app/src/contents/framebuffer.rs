//! Render to an offscreen color texture, then blit it to the window

use super::{TriangleMesh, CLEAR_COLOR};
use crate::shader_paths;
use sample_framework::gpu::GraphicsResult;
use sample_framework::prelude::*;
use std::rc::Rc;

/// Offscreen pass into a framebuffer object followed by a full-window blit
///
/// The color texture tracks the window size; it is re-specified on the
/// first update after a resize.
#[derive(Debug)]
pub struct FramebufferSample {
    camera: Camera,
    mesh: Option<TriangleMesh>,
    program: Option<GpuHandle>,
    color: Option<GpuHandle>,
    framebuffer: Option<GpuHandle>,
    target_size: (u32, u32),
    mvp_location: Option<i32>,
    elapsed: f32,
}

impl Default for FramebufferSample {
    fn default() -> Self {
        Self {
            camera: Camera::looking_at_origin(Point3::new(4.0, 3.0, 3.0)),
            mesh: None,
            program: None,
            color: None,
            framebuffer: None,
            target_size: (0, 0),
            mvp_location: None,
            elapsed: 0.0,
        }
    }
}

impl FramebufferSample {
    /// Window settings for this sample
    ///
    /// The window is resizable and single-sampled: blitting a single-sample
    /// framebuffer into a multisampled window is `GL_INVALID_OPERATION`.
    pub fn config() -> SampleConfig {
        let mut config = SampleConfig::titled("Framebuffer Object");
        config.window.resizable = true;
        config.window.samples = 0;
        config
    }

    /// Size of the offscreen color target
    pub const fn target_size(&self) -> (u32, u32) {
        self.target_size
    }

    fn create_target(
        device: &Rc<dyn GraphicsDevice>,
        (width, height): (u32, u32),
    ) -> GraphicsResult<(GpuHandle, GpuHandle)> {
        let color = GpuHandle::new(device, ResourceKind::Texture)?;
        device.bind_texture(TextureTarget::Texture2D, color.id());
        device.texture_storage_2d(width.max(1), height.max(1));
        device.bind_texture(TextureTarget::Texture2D, 0);

        let framebuffer = GpuHandle::new(device, ResourceKind::Framebuffer)?;
        device.bind_framebuffer(FramebufferTarget::Both, framebuffer.id());
        device.framebuffer_color_texture(color.id());
        let complete = device.check_framebuffer();
        device.bind_framebuffer(FramebufferTarget::Both, 0);
        complete?;

        Ok((color, framebuffer))
    }
}

impl ContentModule for FramebufferSample {
    fn allocate(&mut self, ctx: &SampleContext) -> Result<(), SampleError> {
        ctx.device.set_clear_color(CLEAR_COLOR);
        let program = load_shaders(&ctx.device, &shader_paths("mvp.vert", "mvp.frag"))?;
        let mesh = TriangleMesh::upload(&ctx.device)?;
        let (color, framebuffer) = Self::create_target(&ctx.device, (ctx.width, ctx.height))?;

        self.mvp_location = ctx.device.uniform_location(program.id(), "MVP");
        self.program = Some(program);
        self.mesh = Some(mesh);
        self.color = Some(color);
        self.framebuffer = Some(framebuffer);
        self.target_size = (ctx.width, ctx.height);
        self.elapsed = 0.0;
        Ok(())
    }

    fn release(&mut self) {
        self.framebuffer = None;
        self.color = None;
        self.mesh = None;
        self.program = None;
        self.mvp_location = None;
    }

    fn update(&mut self, ctx: &SampleContext, delta_time: f32) -> Result<(), SampleError> {
        let size = (ctx.width, ctx.height);
        if size != self.target_size {
            if let Some(color) = &self.color {
                log::debug!("Resizing offscreen target to {}x{}", size.0, size.1);
                ctx.device.bind_texture(TextureTarget::Texture2D, color.id());
                ctx.device.texture_storage_2d(size.0.max(1), size.1.max(1));
                ctx.device.bind_texture(TextureTarget::Texture2D, 0);
                self.target_size = size;
            }
        }

        if let (Some(program), Some(location)) = (&self.program, self.mvp_location) {
            let model = Transform::default()
                .with_axis_angle(&Vec3::y_axis(), self.elapsed)
                .to_matrix();
            let mvp = self.camera.view_projection(ctx.aspect_ratio()) * model;
            ctx.device.use_program(program.id());
            ctx.device.uniform_mat4(location, &mvp);
            ctx.device.use_program(0);
        }

        self.elapsed += delta_time;
        Ok(())
    }

    fn render(&mut self, ctx: &SampleContext) -> Result<(), SampleError> {
        let (Some(mesh), Some(program), Some(framebuffer)) =
            (&self.mesh, &self.program, &self.framebuffer)
        else {
            return Err(SampleError::Content("framebuffer sample rendered before allocate".into()));
        };
        let device = ctx.device.as_ref();
        let (target_width, target_height) = self.target_size;

        // Offscreen pass
        device.bind_framebuffer(FramebufferTarget::Both, framebuffer.id());
        device.viewport(0, 0, target_width, target_height);
        device.clear(ClearMask::COLOR);
        device.use_program(program.id());
        mesh.draw(device);
        device.use_program(0);
        device.bind_framebuffer(FramebufferTarget::Both, 0);

        // Onscreen pass
        device.bind_framebuffer(FramebufferTarget::Read, framebuffer.id());
        device.bind_framebuffer(FramebufferTarget::Draw, 0);
        device.viewport(0, 0, ctx.width, ctx.height);
        device.clear(ClearMask::COLOR);
        device.blit_framebuffer(self.target_size, (ctx.width, ctx.height));
        device.bind_framebuffer(FramebufferTarget::Read, 0);
        Ok(())
    }
}
