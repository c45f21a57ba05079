//! Display-free window and device backends
//!
//! [`HeadlessPlatform`] opens [`HeadlessWindow`]s that close themselves
//! after a scripted number of frames, and [`HeadlessDevice`] records every
//! graphics call as a [`DeviceCommand`] while counting live objects. Tests
//! keep an `Rc` to both and inspect them after the sample is gone.

use crate::config::WindowConfig;
use crate::foundation::math::Mat4;
use crate::gpu::{
    BufferTarget, BufferUsage, ClearMask, FramebufferTarget, GraphicsDevice, GraphicsError,
    GraphicsResult, ResourceCounts, ResourceKind, TextureTarget, VertexAttrib,
};
use crate::window::{Platform, ShellEvent, WindowBackend, WindowError, WindowResult};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// One recorded device call
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    /// Object created
    Create {
        /// Kind
        kind: ResourceKind,
        /// Assigned name
        id: u32,
    },
    /// Object deleted
    Delete {
        /// Kind
        kind: ResourceKind,
        /// Name
        id: u32,
    },
    /// Clear color set
    ClearColor([f32; 4]),
    /// Bound framebuffer cleared
    Clear(ClearMask),
    /// Viewport set
    Viewport {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },
    /// Vertex array bound
    BindVertexArray(u32),
    /// Buffer bound
    BindBuffer {
        /// Binding point
        target: BufferTarget,
        /// Name
        id: u32,
    },
    /// Buffer storage specified
    BufferData {
        /// Binding point
        target: BufferTarget,
        /// Size in bytes
        len: usize,
        /// Usage hint
        usage: BufferUsage,
    },
    /// Mapped write
    WriteBuffer {
        /// Binding point
        target: BufferTarget,
        /// Byte offset
        offset: usize,
        /// Bytes written
        data: Vec<u8>,
    },
    /// Attribute layout
    VertexAttribPointer(VertexAttrib),
    /// Attribute array toggled
    VertexAttribEnabled {
        /// Location
        index: u32,
        /// New state
        enabled: bool,
    },
    /// Program made current
    UseProgram(u32),
    /// Matrix uniform upload
    UniformMat4 {
        /// Location
        location: i32,
        /// Value
        matrix: Mat4,
    },
    /// Integer uniform upload
    UniformI32 {
        /// Location
        location: i32,
        /// Value
        value: i32,
    },
    /// Texture unit selected
    ActiveTexture(u32),
    /// Texture bound
    BindTexture {
        /// Binding point
        target: TextureTarget,
        /// Name
        id: u32,
    },
    /// Buffer attached to the bound buffer texture
    TextureBuffer(u32),
    /// 2D storage specified
    TextureStorage2D {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },
    /// Framebuffer bound
    BindFramebuffer {
        /// Binding point
        target: FramebufferTarget,
        /// Name, 0 for the window
        id: u32,
    },
    /// Color attachment set
    FramebufferColorTexture(u32),
    /// Blit issued
    BlitFramebuffer {
        /// Source size
        src: (u32, u32),
        /// Destination size
        dst: (u32, u32),
    },
    /// Non-instanced draw
    DrawArrays {
        /// First vertex
        first: i32,
        /// Vertex count
        count: i32,
    },
    /// Instanced draw
    DrawArraysInstanced {
        /// First vertex
        first: i32,
        /// Vertex count
        count: i32,
        /// Instance count
        instances: i32,
    },
    /// Frame presented by the window
    Present,
}

impl DeviceCommand {
    /// Whether this is a draw call
    pub const fn is_draw(&self) -> bool {
        matches!(self, Self::DrawArrays { .. } | Self::DrawArraysInstanced { .. })
    }
}

/// `GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT`
const INCOMPLETE_ATTACHMENT: u32 = 0x8CD6;

/// Recording [`GraphicsDevice`]
///
/// Besides recording, it tracks the bound draw framebuffer and the sample
/// count of the window it belongs to, so blits a driver would reject show
/// up in [`HeadlessDevice::invalid_operations`].
#[derive(Debug)]
pub struct HeadlessDevice {
    commands: RefCell<Vec<DeviceCommand>>,
    counts: RefCell<ResourceCounts>,
    uniforms: RefCell<HashMap<(u32, String), i32>>,
    next_id: Cell<u32>,
    fail_kind: Cell<Option<ResourceKind>>,
    fail_link: Cell<bool>,
    fail_map: Cell<bool>,
    fail_framebuffer: Cell<bool>,
    window_samples: Cell<u32>,
    draw_framebuffer: Cell<u32>,
    invalid_operations: RefCell<Vec<String>>,
}

impl Default for HeadlessDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDevice {
    /// Empty device; names start at 1
    pub fn new() -> Self {
        Self {
            commands: RefCell::new(Vec::new()),
            counts: RefCell::new(ResourceCounts::default()),
            uniforms: RefCell::new(HashMap::new()),
            next_id: Cell::new(1),
            fail_kind: Cell::new(None),
            fail_link: Cell::new(false),
            fail_map: Cell::new(false),
            fail_framebuffer: Cell::new(false),
            window_samples: Cell::new(0),
            draw_framebuffer: Cell::new(0),
            invalid_operations: RefCell::new(Vec::new()),
        }
    }

    /// Make every later `create(kind)` fail
    pub fn fail_creating(&self, kind: ResourceKind) {
        self.fail_kind.set(Some(kind));
    }

    /// Make every later program link fail
    pub fn fail_linking(&self) {
        self.fail_link.set(true);
    }

    /// Make every later mapped write fail
    pub fn fail_mapping(&self) {
        self.fail_map.set(true);
    }

    /// Make every later completeness check report a missing attachment
    pub fn fail_framebuffer_check(&self) {
        self.fail_framebuffer.set(true);
    }

    /// Calls a real driver would reject with `GL_INVALID_OPERATION`
    pub fn invalid_operations(&self) -> Vec<String> {
        self.invalid_operations.borrow().clone()
    }

    /// Snapshot of the recorded calls
    pub fn commands(&self) -> Vec<DeviceCommand> {
        self.commands.borrow().clone()
    }

    /// Number of draw calls recorded so far
    pub fn draw_calls(&self) -> usize {
        self.commands.borrow().iter().filter(|c| c.is_draw()).count()
    }

    fn push(&self, command: DeviceCommand) {
        self.commands.borrow_mut().push(command);
    }

    fn allocate_id(&self, kind: ResourceKind) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.counts.borrow_mut().acquire(kind);
        self.push(DeviceCommand::Create { kind, id });
        id
    }
}

impl GraphicsDevice for HeadlessDevice {
    fn version(&self) -> String {
        "headless".to_string()
    }

    fn create(&self, kind: ResourceKind) -> GraphicsResult<u32> {
        if self.fail_kind.get() == Some(kind) {
            return Err(GraphicsError::ResourceCreation(kind));
        }
        Ok(self.allocate_id(kind))
    }

    fn create_program(&self, vertex_src: &str, fragment_src: &str) -> GraphicsResult<u32> {
        if self.fail_link.get() || vertex_src.trim().is_empty() || fragment_src.trim().is_empty() {
            return Err(GraphicsError::ProgramLink {
                log: "headless link rejected".to_string(),
            });
        }
        Ok(self.allocate_id(ResourceKind::Program))
    }

    fn delete(&self, kind: ResourceKind, id: u32) {
        self.counts.borrow_mut().release(kind);
        self.push(DeviceCommand::Delete { kind, id });
    }

    fn live_resources(&self) -> ResourceCounts {
        self.counts.borrow().clone()
    }

    fn set_clear_color(&self, rgba: [f32; 4]) {
        self.push(DeviceCommand::ClearColor(rgba));
    }

    fn clear(&self, mask: ClearMask) {
        self.push(DeviceCommand::Clear(mask));
    }

    fn viewport(&self, _x: i32, _y: i32, width: u32, height: u32) {
        self.push(DeviceCommand::Viewport { width, height });
    }

    fn bind_vertex_array(&self, id: u32) {
        self.push(DeviceCommand::BindVertexArray(id));
    }

    fn bind_buffer(&self, target: BufferTarget, id: u32) {
        self.push(DeviceCommand::BindBuffer { target, id });
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        self.push(DeviceCommand::BufferData {
            target,
            len: data.len(),
            usage,
        });
    }

    fn write_buffer(&self, target: BufferTarget, offset: usize, data: &[u8]) -> GraphicsResult<()> {
        if self.fail_map.get() {
            return Err(GraphicsError::BufferMap { offset, len: data.len() });
        }
        self.push(DeviceCommand::WriteBuffer {
            target,
            offset,
            data: data.to_vec(),
        });
        Ok(())
    }

    fn vertex_attrib_pointer(&self, attrib: VertexAttrib) {
        self.push(DeviceCommand::VertexAttribPointer(attrib));
    }

    fn set_vertex_attrib_enabled(&self, index: u32, enabled: bool) {
        self.push(DeviceCommand::VertexAttribEnabled { index, enabled });
    }

    fn use_program(&self, id: u32) {
        self.push(DeviceCommand::UseProgram(id));
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<i32> {
        let mut uniforms = self.uniforms.borrow_mut();
        let next = uniforms.len() as i32;
        Some(*uniforms.entry((program, name.to_string())).or_insert(next))
    }

    fn uniform_mat4(&self, location: i32, matrix: &Mat4) {
        self.push(DeviceCommand::UniformMat4 {
            location,
            matrix: *matrix,
        });
    }

    fn uniform_i32(&self, location: i32, value: i32) {
        self.push(DeviceCommand::UniformI32 { location, value });
    }

    fn active_texture(&self, unit: u32) {
        self.push(DeviceCommand::ActiveTexture(unit));
    }

    fn bind_texture(&self, target: TextureTarget, id: u32) {
        self.push(DeviceCommand::BindTexture { target, id });
    }

    fn texture_buffer(&self, buffer: u32) {
        self.push(DeviceCommand::TextureBuffer(buffer));
    }

    fn texture_storage_2d(&self, width: u32, height: u32) {
        self.push(DeviceCommand::TextureStorage2D { width, height });
    }

    fn bind_framebuffer(&self, target: FramebufferTarget, id: u32) {
        if matches!(target, FramebufferTarget::Both | FramebufferTarget::Draw) {
            self.draw_framebuffer.set(id);
        }
        self.push(DeviceCommand::BindFramebuffer { target, id });
    }

    fn framebuffer_color_texture(&self, texture: u32) {
        self.push(DeviceCommand::FramebufferColorTexture(texture));
    }

    fn check_framebuffer(&self) -> GraphicsResult<()> {
        if self.fail_framebuffer.get() {
            return Err(GraphicsError::IncompleteFramebuffer(INCOMPLETE_ATTACHMENT));
        }
        Ok(())
    }

    fn blit_framebuffer(&self, src: (u32, u32), dst: (u32, u32)) {
        let samples = self.window_samples.get();
        if self.draw_framebuffer.get() == 0 && samples > 0 {
            self.invalid_operations
                .borrow_mut()
                .push(format!("blit into a {samples}x multisampled window framebuffer"));
        }
        self.push(DeviceCommand::BlitFramebuffer { src, dst });
    }

    fn draw_arrays(&self, first: i32, count: i32) {
        self.push(DeviceCommand::DrawArrays { first, count });
    }

    fn draw_arrays_instanced(&self, first: i32, count: i32, instances: i32) {
        self.push(DeviceCommand::DrawArraysInstanced {
            first,
            count,
            instances,
        });
    }
}

/// Counters shared between a platform and the windows it opened
#[derive(Debug, Default)]
pub struct WindowStats {
    opened: Cell<u32>,
    closed: Cell<u32>,
    swaps: Cell<u64>,
    polls: Cell<u64>,
}

impl WindowStats {
    /// Windows opened
    pub fn opened(&self) -> u32 {
        self.opened.get()
    }

    /// Backend close calls
    pub fn closed(&self) -> u32 {
        self.closed.get()
    }

    /// Frames presented
    pub fn swaps(&self) -> u64 {
        self.swaps.get()
    }

    /// Event polls
    pub fn polls(&self) -> u64 {
        self.polls.get()
    }
}

/// Opens [`HeadlessWindow`]s sharing one [`HeadlessDevice`]
pub struct HeadlessPlatform {
    device: Rc<HeadlessDevice>,
    stats: Rc<WindowStats>,
    close_after: Option<u64>,
    events: Vec<(u64, ShellEvent)>,
    fail_open: bool,
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessPlatform {
    /// Platform whose windows stay open until asked to close
    pub fn new() -> Self {
        Self {
            device: Rc::new(HeadlessDevice::new()),
            stats: Rc::new(WindowStats::default()),
            close_after: None,
            events: Vec::new(),
            fail_open: false,
        }
    }

    /// Deliver a close request on poll number `frames`
    #[must_use]
    pub const fn close_after_frames(mut self, frames: u64) -> Self {
        self.close_after = Some(frames);
        self
    }

    /// Deliver `event` on poll number `poll` (1-based)
    #[must_use]
    pub fn with_event_at(mut self, poll: u64, event: ShellEvent) -> Self {
        self.events.push((poll, event));
        self
    }

    /// Make window creation fail
    #[must_use]
    pub const fn failing_to_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// The shared device
    pub fn device(&self) -> Rc<HeadlessDevice> {
        Rc::clone(&self.device)
    }

    /// The shared counters
    pub fn stats(&self) -> Rc<WindowStats> {
        Rc::clone(&self.stats)
    }
}

impl Platform for HeadlessPlatform {
    fn open_window(&self, config: &WindowConfig) -> WindowResult<Box<dyn WindowBackend>> {
        if self.fail_open {
            return Err(WindowError::CreationFailed("headless platform refused".to_string()));
        }
        self.stats.opened.set(self.stats.opened.get() + 1);
        self.device.window_samples.set(config.samples);

        Ok(Box::new(HeadlessWindow {
            device: Some(Rc::clone(&self.device)),
            stats: Rc::clone(&self.stats),
            close_after: self.close_after,
            events: self.events.clone(),
            size: (config.width, config.height),
            should_close: false,
        }))
    }
}

/// Scripted window
pub struct HeadlessWindow {
    device: Option<Rc<HeadlessDevice>>,
    stats: Rc<WindowStats>,
    close_after: Option<u64>,
    events: Vec<(u64, ShellEvent)>,
    size: (u32, u32),
    should_close: bool,
}

impl WindowBackend for HeadlessWindow {
    fn should_close(&self) -> bool {
        self.should_close
    }

    fn set_should_close(&mut self, should_close: bool) {
        self.should_close = should_close;
    }

    fn swap_buffers(&mut self) {
        self.stats.swaps.set(self.stats.swaps.get() + 1);
        if let Some(device) = &self.device {
            device.push(DeviceCommand::Present);
        }
    }

    fn poll_events(&mut self) -> Vec<ShellEvent> {
        let poll = self.stats.polls.get() + 1;
        self.stats.polls.set(poll);

        let mut delivered: Vec<ShellEvent> = self
            .events
            .iter()
            .filter(|(at, _)| *at == poll)
            .map(|(_, event)| *event)
            .collect();
        for event in &delivered {
            if let ShellEvent::Resized { width, height } = *event {
                self.size = (width, height);
            }
        }
        if self.close_after.is_some_and(|frames| poll >= frames) {
            delivered.push(ShellEvent::CloseRequested);
        }
        delivered
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        self.size
    }

    fn device(&self) -> Option<Rc<dyn GraphicsDevice>> {
        self.device
            .as_ref()
            .map(|device| Rc::clone(device) as Rc<dyn GraphicsDevice>)
    }

    fn close(&mut self) {
        if self.device.take().is_some() {
            self.stats.closed.set(self.stats.closed.get() + 1);
        }
    }
}
