//! OpenGL implementation of [`GraphicsDevice`]
//!
//! Every driver call in the workspace lives in this file. The device is only
//! valid while the context it was created for is current on this thread,
//! which [`crate::window::GlfwWindow`] guarantees by creating it right after
//! `make_current` and dropping it before the window.

#![allow(unsafe_code)]

use super::device::{
    BufferTarget, BufferUsage, ClearMask, FramebufferTarget, GraphicsDevice, GraphicsError,
    GraphicsResult, ResourceCounts, ResourceKind, ShaderStage, TextureTarget, VertexAttrib,
};
use crate::foundation::math::Mat4;
use gl::types::{GLchar, GLenum, GLint, GLsizei, GLsizeiptr, GLuint};
use std::cell::RefCell;
use std::ffi::{c_void, CStr, CString};
use std::ptr;

/// OpenGL device over the `gl` crate function pointers
pub struct GlDevice {
    counts: RefCell<ResourceCounts>,
}

impl GlDevice {
    /// Load function pointers through `loader` for the current context
    ///
    /// Fails when an entry point the samples need beyond GL 2.x is missing,
    /// which is what a context older than 3.x or a broken loader looks like.
    pub fn load_with<F>(loader: F) -> GraphicsResult<Self>
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);

        let required = [
            ("glGenVertexArrays", gl::GenVertexArrays::is_loaded()),
            ("glMapBufferRange", gl::MapBufferRange::is_loaded()),
            ("glTexBuffer", gl::TexBuffer::is_loaded()),
            ("glBlitFramebuffer", gl::BlitFramebuffer::is_loaded()),
            ("glDrawArraysInstanced", gl::DrawArraysInstanced::is_loaded()),
        ];
        if let Some(name) = required.iter().find_map(|&(name, loaded)| (!loaded).then_some(name)) {
            return Err(GraphicsError::MissingEntryPoint(name));
        }

        Ok(Self {
            counts: RefCell::new(ResourceCounts::default()),
        })
    }

    fn compile_stage(stage: ShaderStage, source: &str) -> GraphicsResult<GLuint> {
        let source = CString::new(source).map_err(|_| GraphicsError::ShaderCompile {
            stage,
            log: "source contains an interior NUL byte".to_string(),
        })?;
        let kind = match stage {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        };

        unsafe {
            let id = gl::CreateShader(kind);
            gl::ShaderSource(id, 1, &source.as_ptr(), ptr::null());
            gl::CompileShader(id);

            let mut status = GLint::from(gl::FALSE);
            gl::GetShaderiv(id, gl::COMPILE_STATUS, &mut status);
            if status == GLint::from(gl::TRUE) {
                return Ok(id);
            }

            let mut len = 0;
            gl::GetShaderiv(id, gl::INFO_LOG_LENGTH, &mut len);
            let mut log = vec![0_u8; usize::try_from(len).unwrap_or(0).max(1)];
            gl::GetShaderInfoLog(id, len, ptr::null_mut(), log.as_mut_ptr().cast::<GLchar>());
            gl::DeleteShader(id);
            Err(GraphicsError::ShaderCompile {
                stage,
                log: info_log_to_string(&log),
            })
        }
    }

    fn record(&self, kind: ResourceKind) {
        self.counts.borrow_mut().acquire(kind);
        log::trace!("Created {kind}");
    }
}

fn info_log_to_string(log: &[u8]) -> String {
    let end = log.iter().position(|&b| b == 0).unwrap_or(log.len());
    String::from_utf8_lossy(&log[..end]).trim_end().to_string()
}

const fn buffer_target(target: BufferTarget) -> GLenum {
    match target {
        BufferTarget::Array => gl::ARRAY_BUFFER,
        BufferTarget::Texture => gl::TEXTURE_BUFFER,
    }
}

const fn texture_target(target: TextureTarget) -> GLenum {
    match target {
        TextureTarget::Texture2D => gl::TEXTURE_2D,
        TextureTarget::Buffer => gl::TEXTURE_BUFFER,
    }
}

const fn framebuffer_target(target: FramebufferTarget) -> GLenum {
    match target {
        FramebufferTarget::Both => gl::FRAMEBUFFER,
        FramebufferTarget::Read => gl::READ_FRAMEBUFFER,
        FramebufferTarget::Draw => gl::DRAW_FRAMEBUFFER,
    }
}

fn gl_size(value: u32) -> GLsizei {
    GLsizei::try_from(value).unwrap_or(GLsizei::MAX)
}

impl GraphicsDevice for GlDevice {
    fn version(&self) -> String {
        unsafe {
            let raw = gl::GetString(gl::VERSION);
            if raw.is_null() {
                return "unknown".to_string();
            }
            CStr::from_ptr(raw.cast()).to_string_lossy().into_owned()
        }
    }

    fn create(&self, kind: ResourceKind) -> GraphicsResult<u32> {
        let mut id: GLuint = 0;
        unsafe {
            match kind {
                ResourceKind::VertexArray => gl::GenVertexArrays(1, &mut id),
                ResourceKind::Buffer => gl::GenBuffers(1, &mut id),
                ResourceKind::Texture => gl::GenTextures(1, &mut id),
                ResourceKind::Framebuffer => gl::GenFramebuffers(1, &mut id),
                ResourceKind::Program => id = gl::CreateProgram(),
            }
        }
        if id == 0 {
            return Err(GraphicsError::ResourceCreation(kind));
        }
        self.record(kind);
        Ok(id)
    }

    fn create_program(&self, vertex_src: &str, fragment_src: &str) -> GraphicsResult<u32> {
        let vertex = Self::compile_stage(ShaderStage::Vertex, vertex_src)?;
        let fragment = match Self::compile_stage(ShaderStage::Fragment, fragment_src) {
            Ok(id) => id,
            Err(err) => {
                unsafe { gl::DeleteShader(vertex) };
                return Err(err);
            }
        };

        unsafe {
            let program = gl::CreateProgram();
            gl::AttachShader(program, vertex);
            gl::AttachShader(program, fragment);
            gl::LinkProgram(program);

            gl::DetachShader(program, vertex);
            gl::DetachShader(program, fragment);
            gl::DeleteShader(vertex);
            gl::DeleteShader(fragment);

            let mut status = GLint::from(gl::FALSE);
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut status);
            if status != GLint::from(gl::TRUE) {
                let mut len = 0;
                gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
                let mut log = vec![0_u8; usize::try_from(len).unwrap_or(0).max(1)];
                let buffer = log.as_mut_ptr().cast::<GLchar>();
                gl::GetProgramInfoLog(program, len, ptr::null_mut(), buffer);
                gl::DeleteProgram(program);
                return Err(GraphicsError::ProgramLink {
                    log: info_log_to_string(&log),
                });
            }

            self.record(ResourceKind::Program);
            Ok(program)
        }
    }

    fn delete(&self, kind: ResourceKind, id: u32) {
        unsafe {
            match kind {
                ResourceKind::VertexArray => gl::DeleteVertexArrays(1, &id),
                ResourceKind::Buffer => gl::DeleteBuffers(1, &id),
                ResourceKind::Texture => gl::DeleteTextures(1, &id),
                ResourceKind::Framebuffer => gl::DeleteFramebuffers(1, &id),
                ResourceKind::Program => gl::DeleteProgram(id),
            }
        }
        self.counts.borrow_mut().release(kind);
        log::trace!("Deleted {kind} {id}");
    }

    fn live_resources(&self) -> ResourceCounts {
        self.counts.borrow().clone()
    }

    fn set_clear_color(&self, [r, g, b, a]: [f32; 4]) {
        unsafe { gl::ClearColor(r, g, b, a) };
    }

    fn clear(&self, mask: ClearMask) {
        let mut bits = 0;
        if mask.contains(ClearMask::COLOR) {
            bits |= gl::COLOR_BUFFER_BIT;
        }
        if mask.contains(ClearMask::DEPTH) {
            bits |= gl::DEPTH_BUFFER_BIT;
        }
        unsafe { gl::Clear(bits) };
    }

    fn viewport(&self, x: i32, y: i32, width: u32, height: u32) {
        unsafe { gl::Viewport(x, y, gl_size(width), gl_size(height)) };
    }

    fn bind_vertex_array(&self, id: u32) {
        unsafe { gl::BindVertexArray(id) };
    }

    fn bind_buffer(&self, target: BufferTarget, id: u32) {
        unsafe { gl::BindBuffer(buffer_target(target), id) };
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        let usage = match usage {
            BufferUsage::StaticDraw => gl::STATIC_DRAW,
            BufferUsage::DynamicDraw => gl::DYNAMIC_DRAW,
        };
        unsafe {
            gl::BufferData(
                buffer_target(target),
                data.len() as GLsizeiptr,
                data.as_ptr().cast::<c_void>(),
                usage,
            );
        }
    }

    fn write_buffer(&self, target: BufferTarget, offset: usize, data: &[u8]) -> GraphicsResult<()> {
        let target = buffer_target(target);
        unsafe {
            let mapped = gl::MapBufferRange(
                target,
                offset as isize,
                data.len() as GLsizeiptr,
                gl::MAP_WRITE_BIT,
            );
            if mapped.is_null() {
                return Err(GraphicsError::BufferMap { offset, len: data.len() });
            }
            ptr::copy_nonoverlapping(data.as_ptr(), mapped.cast::<u8>(), data.len());
            gl::UnmapBuffer(target);
        }
        Ok(())
    }

    fn vertex_attrib_pointer(&self, attrib: VertexAttrib) {
        unsafe {
            gl::VertexAttribPointer(
                attrib.index,
                attrib.components,
                gl::FLOAT,
                gl::FALSE,
                attrib.stride,
                attrib.offset as *const c_void,
            );
        }
    }

    fn set_vertex_attrib_enabled(&self, index: u32, enabled: bool) {
        unsafe {
            if enabled {
                gl::EnableVertexAttribArray(index);
            } else {
                gl::DisableVertexAttribArray(index);
            }
        }
    }

    fn use_program(&self, id: u32) {
        unsafe { gl::UseProgram(id) };
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<i32> {
        let name = CString::new(name).ok()?;
        let location = unsafe { gl::GetUniformLocation(program, name.as_ptr()) };
        (location >= 0).then_some(location)
    }

    fn uniform_mat4(&self, location: i32, matrix: &Mat4) {
        unsafe { gl::UniformMatrix4fv(location, 1, gl::FALSE, matrix.as_ptr()) };
    }

    fn uniform_i32(&self, location: i32, value: i32) {
        unsafe { gl::Uniform1i(location, value) };
    }

    fn active_texture(&self, unit: u32) {
        unsafe { gl::ActiveTexture(gl::TEXTURE0 + unit) };
    }

    fn bind_texture(&self, target: TextureTarget, id: u32) {
        unsafe { gl::BindTexture(texture_target(target), id) };
    }

    fn texture_buffer(&self, buffer: u32) {
        unsafe { gl::TexBuffer(gl::TEXTURE_BUFFER, gl::RGBA32F, buffer) };
    }

    fn texture_storage_2d(&self, width: u32, height: u32) {
        unsafe {
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                gl::RGBA8 as GLint,
                gl_size(width),
                gl_size(height),
                0,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                ptr::null(),
            );
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, gl::LINEAR as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR as GLint);
        }
    }

    fn bind_framebuffer(&self, target: FramebufferTarget, id: u32) {
        unsafe { gl::BindFramebuffer(framebuffer_target(target), id) };
    }

    fn framebuffer_color_texture(&self, texture: u32) {
        unsafe {
            gl::FramebufferTexture2D(
                gl::FRAMEBUFFER,
                gl::COLOR_ATTACHMENT0,
                gl::TEXTURE_2D,
                texture,
                0,
            );
        }
    }

    fn check_framebuffer(&self) -> GraphicsResult<()> {
        let status = unsafe { gl::CheckFramebufferStatus(gl::FRAMEBUFFER) };
        if status == gl::FRAMEBUFFER_COMPLETE {
            Ok(())
        } else {
            Err(GraphicsError::IncompleteFramebuffer(status))
        }
    }

    fn blit_framebuffer(&self, (src_w, src_h): (u32, u32), (dst_w, dst_h): (u32, u32)) {
        unsafe {
            gl::BlitFramebuffer(
                0,
                0,
                gl_size(src_w),
                gl_size(src_h),
                0,
                0,
                gl_size(dst_w),
                gl_size(dst_h),
                gl::COLOR_BUFFER_BIT,
                gl::LINEAR,
            );
        }
    }

    fn draw_arrays(&self, first: i32, count: i32) {
        unsafe { gl::DrawArrays(gl::TRIANGLES, first, count) };
    }

    fn draw_arrays_instanced(&self, first: i32, count: i32, instances: i32) {
        unsafe { gl::DrawArraysInstanced(gl::TRIANGLES, first, count, instances) };
    }
}
