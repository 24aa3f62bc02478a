//! Context-scoped mutable state shared between the renderer and the
//! resource objects it creates.
//!
//! The "currently bound" trackers live here instead of in per-type statics:
//! exactly one tracker set exists per live context, and it is torn down with
//! the context. Everything is single-threaded by construction (`Rc`, no
//! locking); the underlying graphics context is not thread-safe and this
//! crate does not pretend otherwise.

use std::cell::{RefCell, RefMut};
use std::rc::Rc;

use crate::device::Device;

pub(crate) struct ContextShared {
    pub device: Box<dyn Device>,
    /// Id of the frame buffer currently bound; 0 is the default back buffer.
    pub bound_frame_buffer: u32,
    /// Id of the texture currently attached as color target 0, for
    /// single-target dynamic rebinding. 0 when unknown.
    pub bound_color_target: u32,
    /// Id of the shader program currently in use; 0 when none.
    pub bound_shader: u32,
}

/// A cheaply clonable handle onto the device and the binding trackers.
/// Created once by `Renderer::new` and handed to every resource object.
#[derive(Clone)]
pub struct Context {
    shared: Rc<RefCell<ContextShared>>,
}

impl Context {
    pub(crate) fn new(device: Box<dyn Device>) -> Self {
        Context {
            shared: Rc::new(RefCell::new(ContextShared {
                device,
                bound_frame_buffer: 0,
                bound_color_target: 0,
                bound_shader: 0,
            })),
        }
    }

    pub(crate) fn shared(&self) -> RefMut<ContextShared> {
        self.shared.borrow_mut()
    }
}
