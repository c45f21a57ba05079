//! Scoped GPU object ownership
//!
//! A [`GpuHandle`] deletes its object when dropped. Content modules keep
//! their handles in `Option` fields and release them by setting the fields
//! to `None`; an early `?` inside `allocate` drops whatever was already
//! created on the way out.

use super::device::{GraphicsDevice, GraphicsResult, ResourceKind};
use std::fmt;
use std::rc::Rc;

/// Owned driver object
pub struct GpuHandle {
    device: Rc<dyn GraphicsDevice>,
    kind: ResourceKind,
    id: u32,
}

impl GpuHandle {
    /// Create an empty object of `kind`
    pub fn new(device: &Rc<dyn GraphicsDevice>, kind: ResourceKind) -> GraphicsResult<Self> {
        let id = device.create(kind)?;
        log::debug!("Allocated {kind} {id}");
        Ok(Self {
            device: Rc::clone(device),
            kind,
            id,
        })
    }

    /// Compile and link a program from sources
    pub fn program(
        device: &Rc<dyn GraphicsDevice>,
        vertex_src: &str,
        fragment_src: &str,
    ) -> GraphicsResult<Self> {
        let id = device.create_program(vertex_src, fragment_src)?;
        log::debug!("Linked program {id}");
        Ok(Self {
            device: Rc::clone(device),
            kind: ResourceKind::Program,
            id,
        })
    }

    /// Driver name of the object
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Object kind
    pub const fn kind(&self) -> ResourceKind {
        self.kind
    }
}

impl fmt::Debug for GpuHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GpuHandle")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .finish()
    }
}

impl Drop for GpuHandle {
    fn drop(&mut self) {
        self.device.delete(self.kind, self.id);
    }
}
