//! A `Device` without a GPU behind it.
//!
//! Every call is recorded into a shared `CommandLog` so the state-cache and
//! resource-lifecycle invariants can be asserted on without a live GL
//! context. Object ids are handed out from a single counter starting at 1,
//! uniform and attribute names resolve against tables registered up front.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use cgmath::Vector2;

use crate::color::Color;
use crate::errors::Result;
use crate::geometry::Primitive;
use crate::shader::UniformVariable;
use crate::state::{BlendEquation, BlendFactor, CullMode};
use crate::texture::TextureFormat;
use crate::vertex::AttributeType;

use super::{BufferTarget, Capability, Device};

/// One recorded native call. Data payloads are reduced to their lengths so
/// commands stay cheaply comparable.
#[derive(Debug, PartialEq, Clone)]
pub enum Command {
    SetCapability(Capability, bool),
    SetBlendFunc(BlendFactor, BlendFactor),
    SetBlendEquation(BlendEquation),
    SetCullFace(CullMode),
    SetClearColor(Color),
    Clear(bool, bool, bool),
    SetViewport(i32, i32, i32, i32),
    CreateVertexArray(u32),
    BindVertexArray(u32),
    DeleteVertexArray(u32),
    CreateBuffer(u32),
    BindBuffer(BufferTarget, u32),
    UploadStaticBuffer(BufferTarget, usize),
    DeleteBuffer(u32),
    SetVertexAttribute {
        index: u32,
        size: u32,
        ty: AttributeType,
        normalized: bool,
        stride: u32,
        offset: u32,
    },
    CreateFrameBuffer(u32),
    BindFrameBuffer(u32),
    DeleteFrameBuffer(u32),
    AttachColorTarget(usize, u32),
    AttachDepthTarget(u32),
    CreateTexture(u32),
    DeleteTexture(u32),
    CreateProgram(u32),
    BindProgram(u32),
    DeleteProgram(u32),
    SetUniform(i32, UniformVariable),
    DrawElements(Primitive, u32, u32),
}

/// Shared view of the calls a `HeadlessDevice` has issued.
#[derive(Debug, Clone, Default)]
pub struct CommandLog {
    inner: Rc<RefCell<Vec<Command>>>,
}

impl CommandLog {
    pub fn clear(&self) {
        self.inner.borrow_mut().clear();
    }

    pub fn take(&self) -> Vec<Command> {
        self.inner.borrow_mut().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    pub fn contains(&self, command: &Command) -> bool {
        self.inner.borrow().iter().any(|v| v == command)
    }

    /// Number of recorded commands matching `f`.
    pub fn count<F: Fn(&Command) -> bool>(&self, f: F) -> usize {
        self.inner.borrow().iter().filter(|v| f(v)).count()
    }

    /// The last recorded command matching `f`, if any.
    pub fn last<F: Fn(&Command) -> bool>(&self, f: F) -> Option<Command> {
        self.inner.borrow().iter().rev().find(|v| f(v)).cloned()
    }

    fn push(&self, command: Command) {
        self.inner.borrow_mut().push(command);
    }
}

/// A recording `Device` implementation for tests and CI environments
/// without a graphics driver.
pub struct HeadlessDevice {
    commands: CommandLog,
    next_id: u32,
    uniforms: HashMap<String, i32>,
    attributes: HashMap<String, i32>,
}

impl HeadlessDevice {
    pub fn new() -> Self {
        HeadlessDevice {
            commands: CommandLog::default(),
            next_id: 1,
            uniforms: HashMap::new(),
            attributes: HashMap::new(),
        }
    }

    /// A handle onto the command log, kept alive independently of the
    /// device once it moves into a renderer.
    pub fn commands(&self) -> CommandLog {
        self.commands.clone()
    }

    /// Registers a uniform name that `uniform_location` will resolve.
    /// Unregistered names resolve to -1, like a driver would report.
    pub fn define_uniform(&mut self, name: &str, location: i32) {
        self.uniforms.insert(name.into(), location);
    }

    /// Registers an attribute name that `attribute_location` will resolve.
    pub fn define_attribute(&mut self, name: &str, location: i32) {
        self.attributes.insert(name.into(), location);
    }

    fn allocate(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Default for HeadlessDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for HeadlessDevice {
    fn set_capability(&mut self, capability: Capability, enable: bool) -> Result<()> {
        self.commands.push(Command::SetCapability(capability, enable));
        Ok(())
    }

    fn set_blend_func(&mut self, src: BlendFactor, dst: BlendFactor) -> Result<()> {
        self.commands.push(Command::SetBlendFunc(src, dst));
        Ok(())
    }

    fn set_blend_equation(&mut self, equation: BlendEquation) -> Result<()> {
        self.commands.push(Command::SetBlendEquation(equation));
        Ok(())
    }

    fn set_cull_face(&mut self, cull: CullMode) -> Result<()> {
        self.commands.push(Command::SetCullFace(cull));
        Ok(())
    }

    fn set_clear_color(&mut self, color: Color) -> Result<()> {
        self.commands.push(Command::SetClearColor(color));
        Ok(())
    }

    fn clear(&mut self, color: bool, depth: bool, stencil: bool) -> Result<()> {
        self.commands.push(Command::Clear(color, depth, stencil));
        Ok(())
    }

    fn set_viewport(&mut self, x: i32, y: i32, width: i32, height: i32) -> Result<()> {
        self.commands.push(Command::SetViewport(x, y, width, height));
        Ok(())
    }

    fn create_vertex_array(&mut self) -> Result<u32> {
        let id = self.allocate();
        self.commands.push(Command::CreateVertexArray(id));
        Ok(id)
    }

    fn bind_vertex_array(&mut self, id: u32) -> Result<()> {
        self.commands.push(Command::BindVertexArray(id));
        Ok(())
    }

    fn delete_vertex_array(&mut self, id: u32) -> Result<()> {
        self.commands.push(Command::DeleteVertexArray(id));
        Ok(())
    }

    fn create_buffer(&mut self) -> Result<u32> {
        let id = self.allocate();
        self.commands.push(Command::CreateBuffer(id));
        Ok(id)
    }

    fn bind_buffer(&mut self, target: BufferTarget, id: u32) -> Result<()> {
        self.commands.push(Command::BindBuffer(target, id));
        Ok(())
    }

    fn upload_static_buffer(&mut self, target: BufferTarget, data: &[u8]) -> Result<()> {
        self.commands
            .push(Command::UploadStaticBuffer(target, data.len()));
        Ok(())
    }

    fn delete_buffer(&mut self, id: u32) -> Result<()> {
        self.commands.push(Command::DeleteBuffer(id));
        Ok(())
    }

    fn set_vertex_attribute(
        &mut self,
        index: u32,
        size: u32,
        ty: AttributeType,
        normalized: bool,
        stride: u32,
        offset: u32,
    ) -> Result<()> {
        self.commands.push(Command::SetVertexAttribute {
            index,
            size,
            ty,
            normalized,
            stride,
            offset,
        });
        Ok(())
    }

    fn create_frame_buffer(&mut self) -> Result<u32> {
        let id = self.allocate();
        self.commands.push(Command::CreateFrameBuffer(id));
        Ok(id)
    }

    fn bind_frame_buffer(&mut self, id: u32) -> Result<()> {
        self.commands.push(Command::BindFrameBuffer(id));
        Ok(())
    }

    fn delete_frame_buffer(&mut self, id: u32) -> Result<()> {
        self.commands.push(Command::DeleteFrameBuffer(id));
        Ok(())
    }

    fn attach_color_target(&mut self, index: usize, texture: u32) -> Result<()> {
        self.commands.push(Command::AttachColorTarget(index, texture));
        Ok(())
    }

    fn attach_depth_target(&mut self, texture: u32) -> Result<()> {
        self.commands.push(Command::AttachDepthTarget(texture));
        Ok(())
    }

    fn check_frame_buffer(&mut self) -> Result<()> {
        Ok(())
    }

    fn create_texture(&mut self, _: Vector2<u32>, _: TextureFormat) -> Result<u32> {
        let id = self.allocate();
        self.commands.push(Command::CreateTexture(id));
        Ok(id)
    }

    fn delete_texture(&mut self, id: u32) -> Result<()> {
        self.commands.push(Command::DeleteTexture(id));
        Ok(())
    }

    fn create_program(&mut self, _: &str, _: &str) -> Result<u32> {
        let id = self.allocate();
        self.commands.push(Command::CreateProgram(id));
        Ok(id)
    }

    fn bind_program(&mut self, id: u32) -> Result<()> {
        self.commands.push(Command::BindProgram(id));
        Ok(())
    }

    fn delete_program(&mut self, id: u32) -> Result<()> {
        self.commands.push(Command::DeleteProgram(id));
        Ok(())
    }

    fn uniform_location(&mut self, _: u32, name: &str) -> Result<i32> {
        Ok(self.uniforms.get(name).cloned().unwrap_or(-1))
    }

    fn attribute_location(&mut self, _: u32, name: &str) -> Result<i32> {
        Ok(self.attributes.get(name).cloned().unwrap_or(-1))
    }

    fn set_uniform(&mut self, location: i32, variable: UniformVariable) -> Result<()> {
        self.commands.push(Command::SetUniform(location, variable));
        Ok(())
    }

    fn draw_elements(&mut self, primitive: Primitive, count: u32, start: u32) -> Result<()> {
        self.commands
            .push(Command::DrawElements(primitive, count, start));
        Ok(())
    }
}
