//! The one triangle every drawing sample uploads

use sample_framework::gpu::GraphicsResult;
use sample_framework::prelude::*;
use std::rc::Rc;

/// Positions of a single triangle in clip space
pub const TRIANGLE_VERTICES: [f32; 9] = [
    -1.0, -1.0, 0.0, //
    1.0, -1.0, 0.0, //
    0.0, 1.0, 0.0,
];

const POSITION: u32 = 0;

/// Vertex array plus its position buffer
#[derive(Debug)]
pub struct TriangleMesh {
    vao: GpuHandle,
    // Kept alive for the vertex array that sources from it
    _vbo: GpuHandle,
}

impl TriangleMesh {
    /// Upload [`TRIANGLE_VERTICES`] into a fresh vertex array
    pub fn upload(device: &Rc<dyn GraphicsDevice>) -> GraphicsResult<Self> {
        let vao = GpuHandle::new(device, ResourceKind::VertexArray)?;
        let vbo = GpuHandle::new(device, ResourceKind::Buffer)?;

        device.bind_vertex_array(vao.id());
        device.bind_buffer(BufferTarget::Array, vbo.id());
        device.buffer_data(
            BufferTarget::Array,
            bytemuck::cast_slice(&TRIANGLE_VERTICES),
            BufferUsage::StaticDraw,
        );
        device.vertex_attrib_pointer(VertexAttrib::packed(POSITION, 3));
        device.bind_vertex_array(0);
        device.bind_buffer(BufferTarget::Array, 0);

        Ok(Self { vao, _vbo: vbo })
    }

    /// Draw the triangle once
    pub fn draw(&self, device: &dyn GraphicsDevice) {
        self.with_bound(device, || device.draw_arrays(0, 3));
    }

    /// Draw `instances` copies of the triangle
    pub fn draw_instanced(&self, device: &dyn GraphicsDevice, instances: i32) {
        self.with_bound(device, || device.draw_arrays_instanced(0, 3, instances));
    }

    fn with_bound(&self, device: &dyn GraphicsDevice, draw: impl FnOnce()) {
        device.bind_vertex_array(self.vao.id());
        device.set_vertex_attrib_enabled(POSITION, true);
        draw();
        device.set_vertex_attrib_enabled(POSITION, false);
        device.bind_vertex_array(0);
    }
}
