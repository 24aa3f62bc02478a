//! The native drawing API boundary.
//!
//! Every native call the crate issues goes through the `Device` trait, so
//! the whole render-state cache and resource lifecycle can be exercised
//! against the recording `HeadlessDevice` without a live GL context. The
//! real implementation lives in `device::gl`.

pub mod gl;
pub mod headless;

use cgmath::Vector2;

use crate::color::Color;
use crate::errors::Result;
use crate::geometry::Primitive;
use crate::shader::UniformVariable;
use crate::state::{BlendEquation, BlendFactor, CullMode};
use crate::texture::TextureFormat;
use crate::vertex::AttributeType;

/// A native pipeline capability that can be enabled or disabled.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Capability {
    Blend,
    DepthTest,
    CullFace,
}

/// Buffer binding points used by static geometry.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BufferTarget {
    Vertex,
    Index,
}

/// The low-level drawing interface. Object identity is a plain `u32`, with
/// 0 reserved for "nothing" (the default frame buffer, the unbound program).
///
/// Implementations translate each abstract enum into the corresponding
/// native token and must reject nothing silently: a native error surfaces
/// as `Err`, never as a partially applied call.
pub trait Device {
    fn set_capability(&mut self, capability: Capability, enable: bool) -> Result<()>;
    fn set_blend_func(&mut self, src: BlendFactor, dst: BlendFactor) -> Result<()>;
    fn set_blend_equation(&mut self, equation: BlendEquation) -> Result<()>;
    /// Selects the culled face set. Callers disable `Capability::CullFace`
    /// instead of passing `CullMode::Nothing`.
    fn set_cull_face(&mut self, cull: CullMode) -> Result<()>;
    fn set_clear_color(&mut self, color: Color) -> Result<()>;
    fn clear(&mut self, color: bool, depth: bool, stencil: bool) -> Result<()>;
    fn set_viewport(&mut self, x: i32, y: i32, width: i32, height: i32) -> Result<()>;

    fn create_vertex_array(&mut self) -> Result<u32>;
    fn bind_vertex_array(&mut self, id: u32) -> Result<()>;
    fn delete_vertex_array(&mut self, id: u32) -> Result<()>;

    fn create_buffer(&mut self) -> Result<u32>;
    fn bind_buffer(&mut self, target: BufferTarget, id: u32) -> Result<()>;
    /// Uploads `data` into the buffer currently bound to `target` as
    /// immutable storage.
    fn upload_static_buffer(&mut self, target: BufferTarget, data: &[u8]) -> Result<()>;
    fn delete_buffer(&mut self, id: u32) -> Result<()>;
    /// Configures and enables one attribute binding of the vertex array
    /// currently bound.
    fn set_vertex_attribute(
        &mut self,
        index: u32,
        size: u32,
        ty: AttributeType,
        normalized: bool,
        stride: u32,
        offset: u32,
    ) -> Result<()>;

    fn create_frame_buffer(&mut self) -> Result<u32>;
    fn bind_frame_buffer(&mut self, id: u32) -> Result<()>;
    fn delete_frame_buffer(&mut self, id: u32) -> Result<()>;
    /// Attaches `texture` as color attachment `index` of the frame buffer
    /// currently bound.
    fn attach_color_target(&mut self, index: usize, texture: u32) -> Result<()>;
    fn attach_depth_target(&mut self, texture: u32) -> Result<()>;
    /// Verifies that the frame buffer currently bound is complete.
    fn check_frame_buffer(&mut self) -> Result<()>;

    fn create_texture(&mut self, dimensions: Vector2<u32>, format: TextureFormat) -> Result<u32>;
    fn delete_texture(&mut self, id: u32) -> Result<()>;

    fn create_program(&mut self, vs: &str, fs: &str) -> Result<u32>;
    fn bind_program(&mut self, id: u32) -> Result<()>;
    fn delete_program(&mut self, id: u32) -> Result<()>;
    /// Location of the named uniform, or -1 if the program does not declare
    /// it.
    fn uniform_location(&mut self, program: u32, name: &str) -> Result<i32>;
    /// Location of the named vertex attribute, or -1 if the program does
    /// not declare it.
    fn attribute_location(&mut self, program: u32, name: &str) -> Result<i32>;
    fn set_uniform(&mut self, location: i32, variable: UniformVariable) -> Result<()>;

    /// Issues an indexed draw against the geometry, program and frame
    /// buffer currently bound. `start` is an offset in indices.
    fn draw_elements(&mut self, primitive: Primitive, count: u32, start: u32) -> Result<()>;
}
