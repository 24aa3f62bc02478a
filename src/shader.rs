//! Shader program objects.
//!
//! A `Shader` wraps one compiled and linked program. Name lookups against
//! the driver are expensive, so resolved uniform and attribute locations
//! are cached on first use and reused afterwards.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use cgmath::{Vector2, Vector3, Vector4};

use crate::context::Context;
use crate::errors::Result;

/// The "not found" location. `set_uniform` treats it as a safe no-op so
/// callers can probe for optional uniforms without branching.
pub const INVALID_LOCATION: i32 = -1;

/// A uniform value that can be uploaded to the program currently in use.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum UniformVariable {
    I32(i32),
    F32(f32),
    Vector2f([f32; 2]),
    Vector3f([f32; 3]),
    Vector4f([f32; 4]),
}

impl From<i32> for UniformVariable {
    fn from(v: i32) -> Self {
        UniformVariable::I32(v)
    }
}

impl From<f32> for UniformVariable {
    fn from(v: f32) -> Self {
        UniformVariable::F32(v)
    }
}

impl From<[f32; 2]> for UniformVariable {
    fn from(v: [f32; 2]) -> Self {
        UniformVariable::Vector2f(v)
    }
}

impl From<[f32; 3]> for UniformVariable {
    fn from(v: [f32; 3]) -> Self {
        UniformVariable::Vector3f(v)
    }
}

impl From<[f32; 4]> for UniformVariable {
    fn from(v: [f32; 4]) -> Self {
        UniformVariable::Vector4f(v)
    }
}

impl From<Vector2<f32>> for UniformVariable {
    fn from(v: Vector2<f32>) -> Self {
        UniformVariable::Vector2f(v.into())
    }
}

impl From<Vector3<f32>> for UniformVariable {
    fn from(v: Vector3<f32>) -> Self {
        UniformVariable::Vector3f(v.into())
    }
}

impl From<Vector4<f32>> for UniformVariable {
    fn from(v: Vector4<f32>) -> Self {
        UniformVariable::Vector4f(v.into())
    }
}

/// A compiled shader program instance.
pub struct Shader {
    ctx: Context,
    id: u32,
    uniforms: RefCell<HashMap<String, i32>>,
    attributes: RefCell<HashMap<String, i32>>,
}

impl Shader {
    /// Compiles and links a program from vertex and fragment sources.
    pub fn compile(ctx: &Context, vs: &str, fs: &str) -> Result<Rc<Self>> {
        let id = ctx.shared().device.create_program(vs, fs)?;
        debug!("Created shader program {}.", id);

        Ok(Rc::new(Shader {
            ctx: ctx.clone(),
            id,
            uniforms: RefCell::new(HashMap::new()),
            attributes: RefCell::new(HashMap::new()),
        }))
    }

    /// Native program id.
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Makes this program current, skipping the native call when it
    /// already is.
    pub fn bind(&self) -> Result<()> {
        let mut shared = self.ctx.shared();
        if shared.bound_shader == self.id {
            trace!("Ignoring redundant shader bind ({}).", self.id);
            return Ok(());
        }

        shared.device.bind_program(self.id)?;
        shared.bound_shader = self.id;
        Ok(())
    }

    /// Location of the named uniform, or `INVALID_LOCATION` when the
    /// program does not declare it. Cached after the first lookup.
    pub fn uniform(&self, name: &str) -> Result<i32> {
        if let Some(&location) = self.uniforms.borrow().get(name) {
            return Ok(location);
        }

        let location = self.ctx.shared().device.uniform_location(self.id, name)?;
        self.uniforms.borrow_mut().insert(name.into(), location);
        Ok(location)
    }

    /// Location of the named vertex attribute, or `INVALID_LOCATION` when
    /// the program does not declare it. Cached after the first lookup.
    pub fn attribute(&self, name: &str) -> Result<i32> {
        if let Some(&location) = self.attributes.borrow().get(name) {
            return Ok(location);
        }

        let location = self.ctx.shared().device.attribute_location(self.id, name)?;
        self.attributes.borrow_mut().insert(name.into(), location);
        Ok(location)
    }

    /// Uploads a uniform value. A no-op when `location` is
    /// `INVALID_LOCATION`. The program must be bound.
    pub fn set_uniform<V: Into<UniformVariable>>(&self, location: i32, value: V) -> Result<()> {
        if location == INVALID_LOCATION {
            trace!("Ignoring uniform upload to unresolved location.");
            return Ok(());
        }

        self.ctx.shared().device.set_uniform(location, value.into())
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        let mut shared = self.ctx.shared();
        // A deleted program stays in use natively until the next
        // `UseProgram`; clearing the tracker is enough to force the next
        // `bind` to issue one.
        if shared.bound_shader == self.id {
            shared.bound_shader = 0;
        }

        if let Err(err) = shared.device.delete_program(self.id) {
            warn!("Failed to release shader program {}: {}", self.id, err);
        }
    }
}
