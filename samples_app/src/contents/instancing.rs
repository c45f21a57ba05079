//! Four triangles from one draw call, transforms streamed through a buffer texture

use super::{TriangleMesh, CLEAR_COLOR};
use crate::shader_paths;
use sample_framework::prelude::*;

/// Instances drawn per frame
pub const INSTANCE_COUNT: usize = 4;

const FLOATS_PER_MATRIX: usize = 16;
const TRANSFORM_UNIT: u32 = 0;

/// Instanced drawing with per-instance model matrices in a texture buffer
///
/// The transform buffer holds [`INSTANCE_COUNT`] column-major matrices and is
/// rewritten through a mapped range every frame; the vertex shader fetches
/// its matrix with `texelFetch(Ms, gl_InstanceID * 4 + column)`.
#[derive(Debug)]
pub struct InstancingSample {
    camera: Camera,
    mesh: Option<TriangleMesh>,
    program: Option<GpuHandle>,
    transforms: Option<GpuHandle>,
    transform_texture: Option<GpuHandle>,
    vp_location: Option<i32>,
    ms_location: Option<i32>,
    elapsed: f32,
}

impl Default for InstancingSample {
    fn default() -> Self {
        Self {
            camera: Camera::looking_at_origin(Point3::new(3.0, 4.0, 10.0)),
            mesh: None,
            program: None,
            transforms: None,
            transform_texture: None,
            vp_location: None,
            ms_location: None,
            elapsed: 0.0,
        }
    }
}

impl InstancingSample {
    /// Window settings for this sample
    pub fn config() -> SampleConfig {
        SampleConfig::titled("Instancing")
    }

    /// Model matrices after `elapsed` seconds: instance `i` sits at `(0, i, 0)`
    pub fn instance_matrices(elapsed: f32) -> [Mat4; INSTANCE_COUNT] {
        std::array::from_fn(|i| {
            Transform::from_position(Vec3::new(0.0, i as f32, 0.0))
                .with_axis_angle(&Vec3::y_axis(), elapsed)
                .to_matrix()
        })
    }

    fn transform_bytes(elapsed: f32) -> Vec<u8> {
        let floats: Vec<f32> = Self::instance_matrices(elapsed)
            .iter()
            .flat_map(|m| m.as_slice().iter().copied())
            .collect();
        debug_assert_eq!(floats.len(), INSTANCE_COUNT * FLOATS_PER_MATRIX);
        bytemuck::cast_slice(&floats).to_vec()
    }
}

impl ContentModule for InstancingSample {
    fn allocate(&mut self, ctx: &SampleContext) -> Result<(), SampleError> {
        let device = &ctx.device;
        device.set_clear_color(CLEAR_COLOR);

        let program = load_shaders(device, &shader_paths("instancing.vert", "instancing.frag"))?;
        let mesh = TriangleMesh::upload(device)?;

        let transforms = GpuHandle::new(device, ResourceKind::Buffer)?;
        device.bind_buffer(BufferTarget::Texture, transforms.id());
        let initial = Self::transform_bytes(0.0);
        device.buffer_data(BufferTarget::Texture, &initial, BufferUsage::DynamicDraw);
        device.bind_buffer(BufferTarget::Texture, 0);

        let transform_texture = GpuHandle::new(device, ResourceKind::Texture)?;
        device.bind_texture(TextureTarget::Buffer, transform_texture.id());
        device.texture_buffer(transforms.id());
        device.bind_texture(TextureTarget::Buffer, 0);

        self.vp_location = device.uniform_location(program.id(), "VP");
        self.ms_location = device.uniform_location(program.id(), "Ms");

        self.program = Some(program);
        self.mesh = Some(mesh);
        self.transforms = Some(transforms);
        self.transform_texture = Some(transform_texture);
        self.elapsed = 0.0;
        Ok(())
    }

    fn release(&mut self) {
        // Texture view first, then the buffer it reads from
        self.transform_texture = None;
        self.transforms = None;
        self.mesh = None;
        self.program = None;
        self.vp_location = None;
        self.ms_location = None;
    }

    fn update(&mut self, ctx: &SampleContext, delta_time: f32) -> Result<(), SampleError> {
        let (Some(transforms), Some(program)) = (&self.transforms, &self.program) else {
            return Err(SampleError::Content("instancing sample updated before allocate".into()));
        };
        let device = &ctx.device;

        device.bind_buffer(BufferTarget::Texture, transforms.id());
        let bytes = Self::transform_bytes(self.elapsed);
        let written = device.write_buffer(BufferTarget::Texture, 0, &bytes);
        device.bind_buffer(BufferTarget::Texture, 0);
        written?;

        let view_projection = self.camera.view_projection(ctx.aspect_ratio());
        device.use_program(program.id());
        if let Some(location) = self.ms_location {
            device.uniform_i32(location, TRANSFORM_UNIT as i32);
        }
        if let Some(location) = self.vp_location {
            device.uniform_mat4(location, &view_projection);
        }
        device.use_program(0);

        self.elapsed += delta_time;
        Ok(())
    }

    fn render(&mut self, ctx: &SampleContext) -> Result<(), SampleError> {
        let (Some(mesh), Some(program), Some(texture)) =
            (&self.mesh, &self.program, &self.transform_texture)
        else {
            return Err(SampleError::Content("instancing sample rendered before allocate".into()));
        };
        let device = ctx.device.as_ref();

        device.viewport(0, 0, ctx.width, ctx.height);
        device.clear(ClearMask::COLOR);
        device.use_program(program.id());
        device.active_texture(TRANSFORM_UNIT);
        device.bind_texture(TextureTarget::Buffer, texture.id());
        mesh.draw_instanced(device, INSTANCE_COUNT as i32);
        device.bind_texture(TextureTarget::Buffer, 0);
        device.use_program(0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_instances_stack_along_y() {
        let matrices = InstancingSample::instance_matrices(0.0);
        for (i, matrix) in matrices.iter().enumerate() {
            assert_relative_eq!(matrix[(1, 3)], i as f32);
            assert_relative_eq!(matrix[(0, 0)], 1.0);
        }
    }

    #[test]
    fn test_rotation_keeps_translation() {
        let matrices = InstancingSample::instance_matrices(1.3);
        assert_relative_eq!(matrices[2][(1, 3)], 2.0);
        assert_relative_eq!(matrices[2][(0, 0)], 1.3_f32.cos(), epsilon = 1e-6);
    }

    #[test]
    fn test_transform_bytes_cover_every_instance() {
        let bytes = InstancingSample::transform_bytes(0.5);
        assert_eq!(bytes.len(), INSTANCE_COUNT * FLOATS_PER_MATRIX * 4);
    }
}
