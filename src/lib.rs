//! A thin object-oriented shim over an OpenGL context.
//!
//! `glint` manages the mutable state of one rendering context, uploads and
//! binds GPU-side resources (vertex/index buffers, frame buffers, shader
//! programs) and issues indexed draw calls. Its centerpiece is a render
//! state cache that elides redundant state transitions: on a typical frame
//! almost no pipeline state changes, so almost no driver calls are made.
//!
//! The windowing/event loop, texture file loading and math types are
//! external collaborators. The window layer creates a context, loads the
//! GL function pointers, constructs one [`renderer::Renderer`] over a
//! [`device::gl::GlDevice`] and swaps buffers once per frame; everything
//! between those two points goes through this crate.
//!
//! All of it is strictly single-threaded: every operation must run on the
//! thread owning the graphics context, and exactly one context per process
//! is assumed.

#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

pub mod color;
pub mod context;
pub mod errors;
pub mod device;
pub mod framebuffer;
pub mod geometry;
pub mod renderer;
pub mod shader;
pub mod state;
pub mod texture;
pub mod vertex;

/// Maximum number of attributes in a vertex layout.
pub const MAX_VERTEX_ATTRIBUTES: usize = 12;
/// Maximum number of color targets attached to a frame buffer.
pub const MAX_COLOR_TARGETS: usize = 8;

pub mod prelude {
    pub use crate::color::Color;
    pub use crate::context::Context;
    pub use crate::device::Device;
    pub use crate::errors::{Error, Result};
    pub use crate::framebuffer::FrameBuffer;
    pub use crate::geometry::{Primitive, StaticGeometry};
    pub use crate::renderer::{Renderer, COLOR_BUFFER, DEPTH_BUFFER, STENCIL_BUFFER};
    pub use crate::shader::{Shader, UniformVariable, INVALID_LOCATION};
    pub use crate::state::{BlendEquation, BlendFactor, CullMode, StateSlot};
    pub use crate::texture::{Texture, TextureFormat};
    pub use crate::vertex::{AttributeType, VertexAttribute, VertexLayout, VertexList};
}
